use pretty::DocAllocator;
use printer::tokens::{ELSE, IF, THEN};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg, parens_if};

use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

/// A conditional. The condition is the path-assumption of the branches
/// during fragment enumeration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cond {
    pub cond: Box<Exp>,
    pub then_branch: Box<Exp>,
    pub else_branch: Box<Exp>,
}

impl From<Cond> for Exp {
    fn from(e: Cond) -> Exp {
        Exp::Cond(e)
    }
}

impl HasType for Cond {
    fn typ(&self) -> Type {
        self.then_branch.typ()
    }
}

impl FreeVars for Cond {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.cond.free_vars_mut(bound, fvs);
        self.then_branch.free_vars_mut(bound, fvs);
        self.else_branch.free_vars_mut(bound, fvs);
    }
}

impl Substitutable for Cond {
    type Result = Cond;

    fn subst(&self, by: &Substitution) -> Cond {
        Cond {
            cond: self.cond.subst(by),
            then_branch: self.then_branch.subst(by),
            else_branch: self.else_branch.subst(by),
        }
    }
}

impl Print for Cond {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let doc = alloc
            .text(IF)
            .append(alloc.space())
            .append(self.cond.print(cfg, alloc))
            .append(alloc.space())
            .append(alloc.text(THEN))
            .append(alloc.space())
            .append(self.then_branch.print(cfg, alloc))
            .append(alloc.space())
            .append(alloc.text(ELSE))
            .append(alloc.space())
            .append(self.else_branch.print(cfg, alloc));
        parens_if(prec > 0, doc)
    }
}
