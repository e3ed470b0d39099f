use exp::{Exp, HasType, Type, Value};

use crate::env::Env;
use crate::eval::Eval;
use crate::result::EvalError;

/// The observational signature of an expression on the current example
/// set: its type together with one concrete value per example.
///
/// Expressions with equal fingerprints are treated as equivalent for
/// pruning; the verifier is consulted before any such equivalence becomes
/// a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub typ: Type,
    pub values: Vec<Value>,
}

pub fn fingerprint(e: &Exp, examples: &[Env]) -> Result<Fingerprint, EvalError> {
    let values = examples.iter().map(|ex| e.eval(ex)).collect::<Result<Vec<_>, _>>()?;
    Ok(Fingerprint { typ: e.typ(), values })
}

impl Fingerprint {
    /// Whether the two fingerprints agree on every example where `mask`
    /// is true. Types must agree everywhere.
    pub fn agrees_with(&self, other: &Fingerprint, mask: &[bool]) -> bool {
        self.typ == other.typ
            && self.values.len() == other.values.len()
            && mask.len() == self.values.len()
            && mask
                .iter()
                .zip(self.values.iter().zip(&other.values))
                .all(|(incl, (l, r))| !incl || l == r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp::Var;
    use exp::exp::build::*;

    #[test]
    fn equivalent_expressions_share_a_fingerprint() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let b = Var::new("b", Type::Int);
        let mut ex = Env::new();
        ex.bind("xs", Value::bag(vec![Value::Int(1), Value::Int(2)]));
        let examples = vec![ex];

        let noop = filter(var(&xs), lam(b.clone(), bool_lit(true)));
        assert_eq!(
            fingerprint(&noop, &examples).unwrap(),
            fingerprint(&var(&xs), &examples).unwrap()
        );
    }

    #[test]
    fn masked_positions_are_ignored() {
        let a = Fingerprint { typ: Type::Int, values: vec![Value::Int(1), Value::Int(2)] };
        let b = Fingerprint { typ: Type::Int, values: vec![Value::Int(1), Value::Int(9)] };
        assert!(a.agrees_with(&b, &[true, false]));
        assert!(!a.agrees_with(&b, &[true, true]));
    }

    #[test]
    fn type_mismatch_never_agrees() {
        let a = Fingerprint { typ: Type::Int, values: vec![] };
        let b = Fingerprint { typ: Type::Bool, values: vec![] };
        assert!(!a.agrees_with(&b, &[]));
    }
}
