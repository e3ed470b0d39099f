use pretty::DocAllocator;
use printer::tokens::DOT;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg, print_comma_separated};

use crate::exp::prec;
use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tuple {
    pub exps: Vec<Exp>,
}

impl From<Tuple> for Exp {
    fn from(e: Tuple) -> Exp {
        Exp::Tuple(e)
    }
}

impl HasType for Tuple {
    fn typ(&self) -> Type {
        Type::Tuple(self.exps.iter().map(|e| e.typ()).collect())
    }
}

impl FreeVars for Tuple {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exps.free_vars_mut(bound, fvs)
    }
}

impl Substitutable for Tuple {
    type Result = Tuple;

    fn subst(&self, by: &Substitution) -> Tuple {
        Tuple { exps: self.exps.subst(by) }
    }
}

impl Print for Tuple {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        print_comma_separated(&self.exps, cfg, alloc).parens()
    }
}

/// Projection of a tuple component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TupleGet {
    pub exp: Box<Exp>,
    pub index: usize,
}

impl From<TupleGet> for Exp {
    fn from(e: TupleGet) -> Exp {
        Exp::TupleGet(e)
    }
}

impl HasType for TupleGet {
    fn typ(&self) -> Type {
        match self.exp.typ() {
            Type::Tuple(ts) if self.index < ts.len() => ts[self.index].clone(),
            t => t,
        }
    }
}

impl FreeVars for TupleGet {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exp.free_vars_mut(bound, fvs)
    }
}

impl Substitutable for TupleGet {
    type Result = TupleGet;

    fn subst(&self, by: &Substitution) -> TupleGet {
        TupleGet { exp: self.exp.subst(by), index: self.index }
    }
}

impl Print for TupleGet {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.exp
            .print_prec(cfg, alloc, prec::POSTFIX)
            .append(alloc.text(DOT))
            .append(alloc.text(self.index.to_string()))
    }
}
