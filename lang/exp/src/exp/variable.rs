use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

/// A reference to a state variable, query argument or binder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    pub var: Var,
}

impl From<Variable> for Exp {
    fn from(e: Variable) -> Exp {
        Exp::Variable(e)
    }
}

impl HasType for Variable {
    fn typ(&self) -> Type {
        self.var.typ.clone()
    }
}

impl FreeVars for Variable {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        if !bound.iter().any(|id| *id == self.var.id) {
            fvs.insert(self.var.clone());
        }
    }
}

impl Substitutable for Variable {
    type Result = Exp;

    fn subst(&self, by: &Substitution) -> Exp {
        match by.get(&self.var.id) {
            Some(e) => e.clone(),
            None => self.clone().into(),
        }
    }
}

impl Print for Variable {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        self.var.print_prec(cfg, alloc, prec)
    }
}
