use pretty::DocAllocator;
use printer::tokens::{FALSE, TRUE};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

/// An integer literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Num {
    pub val: i64,
}

impl From<Num> for Exp {
    fn from(e: Num) -> Exp {
        Exp::Num(e)
    }
}

impl HasType for Num {
    fn typ(&self) -> Type {
        Type::Int
    }
}

impl FreeVars for Num {
    fn free_vars_mut(&self, _bound: &mut Vec<String>, _fvs: &mut HashSet<Var>) {}
}

impl Substitutable for Num {
    type Result = Num;

    fn subst(&self, _by: &Substitution) -> Num {
        self.clone()
    }
}

impl Print for Num {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.text(self.val.to_string())
    }
}

/// A boolean literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bool {
    pub val: bool,
}

impl From<Bool> for Exp {
    fn from(e: Bool) -> Exp {
        Exp::Bool(e)
    }
}

impl HasType for Bool {
    fn typ(&self) -> Type {
        Type::Bool
    }
}

impl FreeVars for Bool {
    fn free_vars_mut(&self, _bound: &mut Vec<String>, _fvs: &mut HashSet<Var>) {}
}

impl Substitutable for Bool {
    type Result = Bool;

    fn subst(&self, _by: &Substitution) -> Bool {
        self.clone()
    }
}

impl Print for Bool {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.text(if self.val { TRUE } else { FALSE })
    }
}
