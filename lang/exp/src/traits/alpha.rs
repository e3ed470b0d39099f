use crate::{Exp, Lambda};

/// Structural equality up to consistent renaming of lambda binders.
///
/// With a shared binder pool and canonicalized lambdas this coincides
/// with `==`; it is still needed when comparing expressions that carry
/// binders from different origins (e.g. harvested root templates).
pub fn alpha_equivalent(lhs: &Exp, rhs: &Exp) -> bool {
    alpha_eq(lhs, rhs, &mut Vec::new())
}

fn alpha_eq(lhs: &Exp, rhs: &Exp, pairs: &mut Vec<(String, String)>) -> bool {
    match (lhs, rhs) {
        (Exp::Num(a), Exp::Num(b)) => a == b,
        (Exp::Bool(a), Exp::Bool(b)) => a == b,
        (Exp::Variable(a), Exp::Variable(b)) => {
            if a.var.typ != b.var.typ {
                return false;
            }
            // The innermost pairing for either name decides.
            for (x, y) in pairs.iter().rev() {
                let l_hit = *x == a.var.id;
                let r_hit = *y == b.var.id;
                if l_hit || r_hit {
                    return l_hit && r_hit;
                }
            }
            a.var.id == b.var.id
        }
        (Exp::Lambda(a), Exp::Lambda(b)) => alpha_lambda(a, b, pairs),
        (Exp::UnOp(a), Exp::UnOp(b)) => a.op == b.op && alpha_eq(&a.exp, &b.exp, pairs),
        (Exp::BinOp(a), Exp::BinOp(b)) => {
            a.op == b.op && alpha_eq(&a.lhs, &b.lhs, pairs) && alpha_eq(&a.rhs, &b.rhs, pairs)
        }
        (Exp::Cond(a), Exp::Cond(b)) => {
            alpha_eq(&a.cond, &b.cond, pairs)
                && alpha_eq(&a.then_branch, &b.then_branch, pairs)
                && alpha_eq(&a.else_branch, &b.else_branch, pairs)
        }
        (Exp::EmptyBag(a), Exp::EmptyBag(b)) => a.typ == b.typ,
        (Exp::Singleton(a), Exp::Singleton(b)) => alpha_eq(&a.exp, &b.exp, pairs),
        (Exp::Filter(a), Exp::Filter(b)) => {
            alpha_eq(&a.exp, &b.exp, pairs) && alpha_lambda(&a.pred, &b.pred, pairs)
        }
        (Exp::Map(a), Exp::Map(b)) => {
            alpha_eq(&a.exp, &b.exp, pairs) && alpha_lambda(&a.f, &b.f, pairs)
        }
        (Exp::FlatMap(a), Exp::FlatMap(b)) => {
            alpha_eq(&a.exp, &b.exp, pairs) && alpha_lambda(&a.f, &b.f, pairs)
        }
        (Exp::MakeMap(a), Exp::MakeMap(b)) => {
            alpha_eq(&a.exp, &b.exp, pairs)
                && alpha_lambda(&a.key, &b.key, pairs)
                && alpha_lambda(&a.value, &b.value, pairs)
        }
        (Exp::MapGet(a), Exp::MapGet(b)) => {
            alpha_eq(&a.map, &b.map, pairs) && alpha_eq(&a.key, &b.key, pairs)
        }
        (Exp::Tuple(a), Exp::Tuple(b)) => {
            a.exps.len() == b.exps.len()
                && a.exps.iter().zip(&b.exps).all(|(x, y)| alpha_eq(x, y, pairs))
        }
        (Exp::TupleGet(a), Exp::TupleGet(b)) => {
            a.index == b.index && alpha_eq(&a.exp, &b.exp, pairs)
        }
        (Exp::Field(a), Exp::Field(b)) => {
            a.field == b.field && a.typ == b.typ && alpha_eq(&a.exp, &b.exp, pairs)
        }
        (Exp::Hole(a), Exp::Hole(b)) => a == b,
        _ => false,
    }
}

fn alpha_lambda(a: &Lambda, b: &Lambda, pairs: &mut Vec<(String, String)>) -> bool {
    if a.param.typ != b.param.typ {
        return false;
    }
    pairs.push((a.param.id.clone(), b.param.id.clone()));
    let eq = alpha_eq(&a.body, &b.body, pairs);
    pairs.pop();
    eq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exp::build::*;
    use crate::{Type, Var};

    #[test]
    fn renamed_binders_are_alpha_equivalent() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let a = Var::new("a", Type::Int);
        let b = Var::new("b", Type::Int);
        let l = filter(var(&xs), lam(a.clone(), equal(var(&a), num(1))));
        let r = filter(var(&xs), lam(b.clone(), equal(var(&b), num(1))));
        assert!(alpha_equivalent(&l, &r));
        assert_ne!(l, r);
    }

    #[test]
    fn free_variables_must_match_exactly() {
        let a = Var::new("a", Type::Int);
        let b = Var::new("b", Type::Int);
        assert!(!alpha_equivalent(&var(&a), &var(&b)));
        assert!(alpha_equivalent(&var(&a), &var(&a)));
    }

    #[test]
    fn shadowing_is_respected() {
        let a = Var::new("a", Type::Int);
        let b = Var::new("b", Type::Int);
        // \a -> \a -> a   vs   \a -> \b -> a
        let l: Exp = lam(a.clone(), Exp::Lambda(lam(a.clone(), var(&a)))).into();
        let r: Exp = lam(a.clone(), Exp::Lambda(lam(b.clone(), var(&a)))).into();
        assert!(!alpha_equivalent(&l, &r));
    }
}
