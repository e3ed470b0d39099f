use crate::{Exp, HashMap};

/// A mapping from variable names to replacement expressions.
pub type Substitution = HashMap<String, Exp>;

/// Substitution of free variables. Binders shadow: a lambda whose
/// parameter is mentioned in the substitution drops that entry for its
/// body. No capture-avoiding renaming is performed; callers substitute
/// either fresh variables or pool binders checked to be absent from the
/// body.
pub trait Substitutable {
    type Result;

    fn subst(&self, by: &Substitution) -> Self::Result;
}

impl<T: Substitutable> Substitutable for Box<T> {
    type Result = Box<T::Result>;

    fn subst(&self, by: &Substitution) -> Self::Result {
        Box::new(self.as_ref().subst(by))
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    type Result = Vec<T::Result>;

    fn subst(&self, by: &Substitution) -> Self::Result {
        self.iter().map(|x| x.subst(by)).collect()
    }
}
