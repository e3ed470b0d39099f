use crate::{HashSet, Var};

pub trait FreeVars {
    /// Helper to compute the set of free variables by mutably adding them
    /// to `fvs`. `bound` is the stack of binder names in scope.
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>);

    /// Set of variables that occur free in the expression.
    fn free_vars(&self) -> HashSet<Var> {
        let mut fvs: HashSet<Var> = HashSet::default();
        self.free_vars_mut(&mut Vec::new(), &mut fvs);
        fvs
    }

    /// Free variables in a deterministic order.
    fn free_vars_sorted(&self) -> Vec<Var> {
        let mut fvs: Vec<Var> = self.free_vars().into_iter().collect();
        fvs.sort();
        fvs
    }
}

impl<T: FreeVars> FreeVars for Box<T> {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.as_ref().free_vars_mut(bound, fvs)
    }
}

impl<T: FreeVars> FreeVars for Vec<T> {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        for x in self {
            x.free_vars_mut(bound, fvs)
        }
    }
}

impl<T: FreeVars> FreeVars for Option<T> {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        if let Some(x) = self {
            x.free_vars_mut(bound, fvs)
        }
    }
}
