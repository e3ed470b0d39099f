use log::trace;

use exp::exp::build;
use exp::{
    Exp, Filter, FlatMap, FreeVars, HasType, HashSet, Lambda, MakeMap, Map, Substitutable,
    Substitution, TypeTag, Var,
};
use printer::Print;
use verify::{Oracle, OracleError};

use crate::build::Build;
use crate::cache::Cache;
use crate::result::SynthError;

/// Rewrite every lambda to use the first free pool binder of its
/// parameter type. Lambdas whose parameter is already a pool binder, or
/// whose parameter type has no pool binder at all, pass through
/// unchanged. This collapses alpha-equivalent lambdas to structural
/// equality, which is what makes the seen table's structural key work.
pub fn fixup_binders(e: &Exp, pool: &[Var]) -> Result<Exp, SynthError> {
    match e {
        Exp::Lambda(l) => Ok(fixup_lambda(l, pool)?.into()),
        Exp::Filter(f) => Ok(Filter {
            exp: Box::new(fixup_binders(&f.exp, pool)?),
            pred: fixup_lambda(&f.pred, pool)?,
        }
        .into()),
        Exp::Map(m) => Ok(Map {
            exp: Box::new(fixup_binders(&m.exp, pool)?),
            f: fixup_lambda(&m.f, pool)?,
        }
        .into()),
        Exp::FlatMap(m) => Ok(FlatMap {
            exp: Box::new(fixup_binders(&m.exp, pool)?),
            f: fixup_lambda(&m.f, pool)?,
        }
        .into()),
        Exp::MakeMap(m) => Ok(MakeMap {
            exp: Box::new(fixup_binders(&m.exp, pool)?),
            key: fixup_lambda(&m.key, pool)?,
            value: fixup_lambda(&m.value, pool)?,
        }
        .into()),
        _ => {
            let mut out = e.clone();
            for i in 0..e.num_children() {
                if let Some(child) = e.child(i) {
                    let fixed = fixup_binders(child, pool)?;
                    if let Some(next) = out.with_child(i, fixed) {
                        out = next;
                    }
                }
            }
            Ok(out)
        }
    }
}

fn fixup_lambda(l: &Lambda, pool: &[Var]) -> Result<Lambda, SynthError> {
    let body = fixup_binders(&l.body, pool)?;
    if pool.contains(&l.param) {
        return Ok(Lambda::new(l.param.clone(), body));
    }
    if !pool.iter().any(|b| b.typ == l.param.typ) {
        return Ok(Lambda::new(l.param.clone(), body));
    }
    let fvs = body.free_vars();
    let replacement = pool
        .iter()
        .find(|b| b.typ == l.param.typ && !fvs.contains(b))
        .ok_or_else(|| SynthError::BinderPoolExhausted {
            typ: l.param.typ.print_to_string(None),
        })?;
    let mut by = Substitution::default();
    by.insert(l.param.id.clone(), build::var(replacement));
    Ok(Lambda::new(replacement.clone(), body.subst(&by)))
}

/// Whether `v` is provably irrelevant to `target`: renaming it in both
/// the assumptions and the target can never change the target's value.
pub fn can_elim_var(
    target: &Exp,
    assumptions: &Exp,
    v: &Var,
    oracle: &dyn Oracle,
) -> Result<bool, OracleError> {
    let mut taken: HashSet<String> = target.free_vars().into_iter().map(|w| w.id).collect();
    taken.extend(assumptions.free_vars().into_iter().map(|w| w.id));
    let fresh = Var::fresh(&v.id, v.typ.clone(), &taken);

    let mut by = Substitution::default();
    by.insert(v.id.clone(), build::var(&fresh));

    let phi = build::implies(
        build::and(assumptions.clone(), assumptions.subst(&by)),
        build::equal(target.clone(), target.subst(&by)),
    );
    oracle.valid(&phi)
}

/// The builder adapter chain: binder canonicalization followed by the
/// semantic filters. Fatal grammar inconsistencies are yielded as
/// errors; everything else that fails a check is silently dropped (or
/// conservatively dropped when the oracle cannot decide).
pub struct CheckedBuilder<'a> {
    inner: &'a dyn Build,
    binders: Vec<Var>,
    assumptions: Exp,
    oracle: &'a dyn Oracle,
}

impl<'a> CheckedBuilder<'a> {
    pub fn new(
        inner: &'a dyn Build,
        binders: Vec<Var>,
        assumptions: Exp,
        oracle: &'a dyn Oracle,
    ) -> CheckedBuilder<'a> {
        CheckedBuilder { inner, binders, assumptions, oracle }
    }

    pub fn build(&self, cache: &Cache, size: usize) -> Vec<Result<Exp, SynthError>> {
        let mut out = Vec::new();
        for raw in self.inner.build(cache, size) {
            let e = match fixup_binders(&raw, &self.binders) {
                Ok(e) => e,
                Err(err) => {
                    trace!("unable to rename binders in {}: {err}", raw.print_to_string(None));
                    continue;
                }
            };

            if size > 1 {
                if let Exp::BinOp(b) = &e {
                    if b.op.is_commutative() && b.rhs < b.lhs {
                        trace!(
                            "rejecting symmetric use of commutative operator: {}",
                            e.print_to_string(None)
                        );
                        continue;
                    }
                }
            }

            // set-typed candidates must have provably distinct elements;
            // anything else means the caller's grammar is incoherent
            if e.typ().tag() == TypeTag::Set {
                let phi =
                    build::implies(self.assumptions.clone(), build::unique(e.clone()));
                match self.oracle.valid(&phi) {
                    Ok(true) => {}
                    Ok(false) | Err(_) => {
                        out.push(Err(SynthError::InconsistentGrammar {
                            exp: e.print_to_string(None),
                        }));
                        return out;
                    }
                }
            }

            if let Exp::UnOp(u) = &e {
                if u.op == exp::UnaryOp::The && !self.the_is_legal(&u.exp) {
                    continue;
                }
            }

            if let Exp::Filter(f) = &e {
                // filters must do something; a no-op filter would only
                // distort cardinality estimates
                let differs = build::and(
                    self.assumptions.clone(),
                    build::not(build::equal(e.clone(), (*f.exp).clone())),
                );
                match self.oracle.satisfiable(&differs) {
                    Ok(true) => {}
                    Ok(false) | Err(_) => {
                        trace!("rejecting no-op filter: {}", e.print_to_string(None));
                        continue;
                    }
                }
            }

            out.push(Ok(e));
        }
        out
    }

    /// `the(xs)` is legal when `|xs| <= 1` always holds and both
    /// `|xs| = 0` and `|xs| = 1` are reachable.
    fn the_is_legal(&self, xs: &Exp) -> bool {
        let len = build::len(xs.clone());
        let at_most_one =
            build::implies(self.assumptions.clone(), build::le(len.clone(), build::num(1)));
        match self.oracle.valid(&at_most_one) {
            Ok(true) => {}
            _ => {
                trace!("rejecting the({}): could have more than one element",
                    xs.print_to_string(None));
                return false;
            }
        }
        for n in [0, 1] {
            let reachable = build::and(
                self.assumptions.clone(),
                build::equal(len.clone(), build::num(n)),
            );
            match self.oracle.satisfiable(&reachable) {
                Ok(true) => {}
                _ => {
                    trace!(
                        "rejecting the({}): |xs| = {n} is unreachable",
                        xs.print_to_string(None)
                    );
                    return false;
                }
            }
        }
        true
    }
}

/// Drops candidates mentioning provably irrelevant variables; they
/// cannot improve any sub-expression of the target.
pub struct VarElimBuilder<'a> {
    inner: CheckedBuilder<'a>,
    illegal_vars: Vec<Var>,
}

impl<'a> VarElimBuilder<'a> {
    pub fn new(inner: CheckedBuilder<'a>, illegal_vars: Vec<Var>) -> VarElimBuilder<'a> {
        VarElimBuilder { inner, illegal_vars }
    }

    pub fn build(&self, cache: &Cache, size: usize) -> Vec<Result<Exp, SynthError>> {
        self.inner
            .build(cache, size)
            .into_iter()
            .filter(|item| match item {
                Ok(e) => {
                    let legal =
                        !e.free_vars().iter().any(|v| self.illegal_vars.contains(v));
                    if !legal {
                        trace!("contains eliminated vars: {}", e.print_to_string(None));
                    }
                    legal
                }
                Err(_) => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp::Type;
    use exp::exp::build::*;
    use verify::ExhaustiveOracle;

    #[test]
    fn fixup_rewrites_foreign_binders_to_the_pool() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let pool = vec![Var::new("b", Type::Int)];
        let foreign = Var::new("q", Type::Int);

        let e = filter(var(&xs), lam(foreign.clone(), equal(var(&foreign), num(1))));
        let fixed = fixup_binders(&e, &pool).unwrap();
        let expected = filter(var(&xs), lam(pool[0].clone(), equal(var(&pool[0]), num(1))));
        assert_eq!(fixed, expected);
    }

    #[test]
    fn fixup_is_idempotent() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let pool = vec![Var::new("b", Type::Int)];
        let foreign = Var::new("q", Type::Int);

        let e = filter(var(&xs), lam(foreign.clone(), equal(var(&foreign), num(1))));
        let once = fixup_binders(&e, &pool).unwrap();
        let twice = fixup_binders(&once, &pool).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn fixup_leaves_unpooled_types_alone() {
        let xs = Var::new("xs", Type::bag(Type::Bool));
        let pool = vec![Var::new("b", Type::Int)];
        let foreign = Var::new("q", Type::Bool);

        let e = filter(var(&xs), lam(foreign.clone(), var(&foreign)));
        assert_eq!(fixup_binders(&e, &pool).unwrap(), e);
    }

    #[test]
    fn irrelevant_variables_are_detected() {
        let oracle = ExhaustiveOracle::default();
        let x = Var::new("x", Type::Int);
        let y = Var::new("y", Type::Int);
        let target = var(&y);
        let assumptions = bool_lit(true);
        assert!(can_elim_var(&target, &assumptions, &x, &oracle).unwrap());
        assert!(!can_elim_var(&target, &assumptions, &y, &oracle).unwrap());
    }
}
