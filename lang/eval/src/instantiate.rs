use exp::{Type, Value, Var, mkval};

use crate::env::Env;

/// Concrete values of type `desired` reachable inside `value`, outermost
/// first. Collections are searched recursively; scalar values only match
/// exactly.
pub fn values_of_type(value: &Value, value_type: &Type, desired: &Type) -> Vec<Value> {
    let mut out = Vec::new();
    collect(value, value_type, desired, &mut out);
    out
}

fn collect(value: &Value, value_type: &Type, desired: &Type, out: &mut Vec<Value>) {
    if value_type == desired {
        out.push(value.clone());
        return;
    }
    if let (Some(elem_type), Some(elems)) = (value_type.elem(), value.elems()) {
        for x in elems {
            collect(x, elem_type, desired, out);
        }
    }
}

/// Expand `examples` so that every binder is bound: for each example and
/// each collection-valued variable, one derived example per distinct
/// element of the binder's type, falling back to `mkval` when nothing
/// matches. Repeated once per binder left-to-right, so the example set
/// grows multiplicatively in the number of binders.
pub fn instantiate_examples(examples: &[Env], vars: &[Var], binders: &[Var]) -> Vec<Env> {
    let mut examples = examples.to_vec();
    for binder in binders {
        examples = instantiate_one(&examples, vars, binder);
    }
    examples
}

fn instantiate_one(examples: &[Env], vars: &[Var], binder: &Var) -> Vec<Env> {
    let mut out = Vec::new();
    for ex in examples {
        let mut found = false;
        if ex.get(&binder.id).is_some() {
            out.push(ex.clone());
            found = true;
        }
        for v in vars {
            let Some(value) = ex.get(&v.id) else { continue };
            let mut seen: Vec<Value> = Vec::new();
            for candidate in values_of_type(value, &v.typ, &binder.typ) {
                if seen.contains(&candidate) {
                    continue;
                }
                seen.push(candidate.clone());
                let mut derived = ex.clone();
                derived.bind(binder.id.clone(), candidate);
                out.push(derived);
                found = true;
            }
        }
        if !found {
            let mut fallback = ex.clone();
            fallback.bind(binder.id.clone(), mkval(&binder.typ));
            out.push(fallback);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_bag(ns: &[i64]) -> Value {
        Value::bag(ns.iter().map(|n| Value::Int(*n)).collect())
    }

    #[test]
    fn binders_are_bound_to_collection_elements() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let b = Var::new("b", Type::Int);
        let mut ex = Env::new();
        ex.bind("xs", int_bag(&[1, 2, 2]));

        let out = instantiate_examples(&[ex], &[xs.clone()], &[b.clone()]);
        // two distinct elements
        assert_eq!(out.len(), 2);
        assert!(out.iter().any(|e| e.get("b") == Some(&Value::Int(1))));
        assert!(out.iter().any(|e| e.get("b") == Some(&Value::Int(2))));
    }

    #[test]
    fn fallback_binds_mkval() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let b = Var::new("b", Type::Bool);
        let mut ex = Env::new();
        ex.bind("xs", int_bag(&[1]));

        let out = instantiate_examples(&[ex], &[xs.clone()], &[b.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("b"), Some(&Value::Bool(false)));
    }

    #[test]
    fn instantiation_is_multiplicative_per_binder() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let a = Var::new("a", Type::Int);
        let b = Var::new("b", Type::Int);
        let mut ex = Env::new();
        ex.bind("xs", int_bag(&[1, 2]));

        let out = instantiate_examples(&[ex], &[xs.clone()], &[a.clone(), b.clone()]);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn nested_collections_are_searched() {
        let v = Value::bag(vec![int_bag(&[1]), int_bag(&[2, 3])]);
        let t = Type::bag(Type::bag(Type::Int));
        let found = values_of_type(&v, &t, &Type::Int);
        assert_eq!(found.len(), 3);
    }
}
