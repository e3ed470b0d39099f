use crate::Type;

/// Computes the type annotation of a node.
///
/// Callers are expected to hand over well-typed expressions; on an
/// ill-typed node the annotation of the offending operand is passed
/// through and the mismatch surfaces during evaluation.
pub trait HasType {
    fn typ(&self) -> Type;
}

impl<T: HasType> HasType for Box<T> {
    fn typ(&self) -> Type {
        self.as_ref().typ()
    }
}
