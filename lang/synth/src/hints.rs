use exp::exp::build;
use exp::{
    Exp, FreeVars, HasType, Hole, Substitutable, Substitution, Type, Var, alpha_equivalent,
};

/// Turn every sub-expression of a query into a reusable template by
/// replacing its out-of-scope variables with typed holes. Hole names are
/// canonical (order of first appearance), and templates are deduplicated
/// up to alpha-equivalence. The boolean literals are always included.
pub fn harvest_roots(e: &Exp, bound: &[Var]) -> Vec<Exp> {
    let mut out = vec![build::bool_lit(true), build::bool_lit(false)];
    for sub in e.sub_exps() {
        let free = sub.free_vars();
        let mut ordered: Vec<Var> = Vec::new();
        for node in sub.sub_exps() {
            if let Exp::Variable(v) = node {
                if free.contains(&v.var)
                    && !bound.contains(&v.var)
                    && !ordered.contains(&v.var)
                {
                    ordered.push(v.var.clone());
                }
            }
        }
        let mut by = Substitution::default();
        for (i, v) in ordered.iter().enumerate() {
            by.insert(v.id.clone(), build::hole(format!("h{i}"), v.typ.clone()));
        }
        let template = sub.subst(&by);
        if !out.iter().any(|root| alpha_equivalent(root, &template)) {
            out.push(template);
        }
    }
    out
}

/// Propose representation-shaped hints for bag-typed state variables.
///
/// For every root template with exactly one hole of the element type,
/// the hole becomes a binder and the template a projection `p`; each
/// bag-typed state variable `sv` then contributes `make_map(sv, p, id)`
/// (when the pool has a binder of the bag type for the identity value
/// lambda), `map(sv, p)`, and `filter(sv, p)` for boolean projections.
pub fn guess_hints(state: &[Var], roots: &[Exp], binders: &[Var]) -> Vec<Exp> {
    let mut out: Vec<Exp> = state.iter().map(build::var).collect();
    for sv in state {
        let Type::Bag(elem) = &sv.typ else { continue };
        for root in roots {
            // plugging a binder into a template that itself binds would
            // capture it
            if contains_lambda(root) {
                continue;
            }
            let holes = collect_holes(root);
            let [hole] = holes[..] else { continue };
            if hole.typ != **elem {
                continue;
            }
            let Some(binder) = binders.iter().find(|b| b.typ == **elem) else { continue };
            let mut by = Substitution::default();
            by.insert(hole.name.clone(), build::var(binder));
            let proj = build::lam(binder.clone(), root.subst(&by));

            if let Some(group) = binders.iter().find(|g| g.typ == sv.typ) {
                out.push(build::make_map(
                    build::var(sv),
                    proj.clone(),
                    build::lam(group.clone(), build::var(group)),
                ));
            }
            out.push(build::map(build::var(sv), proj.clone()));
            if proj.body.typ() == Type::Bool {
                out.push(build::filter(build::var(sv), proj));
            }
        }
    }
    out
}

fn contains_lambda(e: &Exp) -> bool {
    e.sub_exps().iter().any(|sub| !sub.own_lambdas().is_empty())
}

fn collect_holes(e: &Exp) -> Vec<&Hole> {
    e.sub_exps()
        .into_iter()
        .filter_map(|sub| match sub {
            Exp::Hole(h) => Some(h),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp::exp::build::*;

    #[test]
    fn roots_carve_out_of_scope_vars_into_holes() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let k = Var::new("k", Type::Int);
        let b = Var::new("b", Type::Int);
        let target = filter(var(&xs), lam(b.clone(), equal(var(&b), var(&k))));

        let roots = harvest_roots(&target, &[xs.clone()]);
        // the comparison becomes a two-hole template: binder and argument
        assert!(roots.iter().any(|r| {
            *r == equal(hole("h0", Type::Int), hole("h1", Type::Int))
        }));
        // the state variable itself is not carved
        assert!(roots.contains(&var(&xs)));
    }

    #[test]
    fn roots_are_deduplicated_up_to_renaming() {
        let x = Var::new("x", Type::Int);
        let y = Var::new("y", Type::Int);
        let target = add(add(var(&x), num(1)), add(var(&y), num(1)));

        let roots = harvest_roots(&target, &[]);
        let carved: Vec<&Exp> =
            roots.iter().filter(|r| **r == add(hole("h0", Type::Int), num(1))).collect();
        assert_eq!(carved.len(), 1);
    }

    #[test]
    fn guessed_hints_include_groupings_and_filters() {
        let t = Type::Int;
        let xs = Var::new("xs", Type::bag(t.clone()));
        let b = Var::new("b", t.clone());
        let g = Var::new("g", Type::bag(t.clone()));

        let roots = vec![hole("h0", t.clone()), equal(hole("h0", t.clone()), num(0))];
        let hints = guess_hints(&[xs.clone()], &roots, &[b.clone(), g.clone()]);

        assert!(hints.contains(&var(&xs)));
        assert!(hints.contains(&make_map(
            var(&xs),
            lam(b.clone(), var(&b)),
            lam(g.clone(), var(&g)),
        )));
        assert!(hints.contains(&filter(var(&xs), lam(b.clone(), equal(var(&b), num(0))))));
    }
}
