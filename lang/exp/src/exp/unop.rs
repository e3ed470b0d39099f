use pretty::DocAllocator;
use printer::tokens::{DISTINCT, LEN, MINUS, NOT, SUM, THE, UNIQUE};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg, parens_if};

use crate::exp::prec;
use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    /// Sum of a bag of integers; the empty bag sums to zero.
    Sum,
    /// Cardinality of a bag or set.
    Len,
    /// The one element of a 0- or 1-element bag; the type's zero value
    /// when the bag is empty.
    The,
    /// The set of distinct elements of a bag.
    Distinct,
    /// Whether all elements of a bag are distinct.
    Unique,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnOp {
    pub op: UnaryOp,
    pub exp: Box<Exp>,
}

impl From<UnOp> for Exp {
    fn from(e: UnOp) -> Exp {
        Exp::UnOp(e)
    }
}

impl HasType for UnOp {
    fn typ(&self) -> Type {
        match self.op {
            UnaryOp::Not | UnaryOp::Unique => Type::Bool,
            UnaryOp::Neg | UnaryOp::Sum | UnaryOp::Len => Type::Int,
            UnaryOp::The => match self.exp.typ() {
                Type::Bag(t) | Type::Set(t) => *t,
                t => t,
            },
            UnaryOp::Distinct => match self.exp.typ() {
                Type::Bag(t) | Type::Set(t) => Type::Set(t),
                t => t,
            },
        }
    }
}

impl FreeVars for UnOp {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exp.free_vars_mut(bound, fvs)
    }
}

impl Substitutable for UnOp {
    type Result = UnOp;

    fn subst(&self, by: &Substitution) -> UnOp {
        UnOp { op: self.op, exp: self.exp.subst(by) }
    }
}

impl Print for UnOp {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self.op {
            UnaryOp::Not => {
                let doc = alloc
                    .text(NOT)
                    .append(alloc.space())
                    .append(self.exp.print_prec(cfg, alloc, prec::NOT));
                parens_if(prec > prec::NOT, doc)
            }
            UnaryOp::Neg => {
                let doc = alloc.text(MINUS).append(self.exp.print_prec(cfg, alloc, prec::PREFIX));
                parens_if(prec > prec::PREFIX, doc)
            }
            UnaryOp::Sum => alloc.text(SUM).append(self.exp.print(cfg, alloc).parens()),
            UnaryOp::Len => alloc.text(LEN).append(self.exp.print(cfg, alloc).parens()),
            UnaryOp::The => alloc.text(THE).append(self.exp.print(cfg, alloc).parens()),
            UnaryOp::Distinct => alloc.text(DISTINCT).append(self.exp.print(cfg, alloc).parens()),
            UnaryOp::Unique => alloc.text(UNIQUE).append(self.exp.print(cfg, alloc).parens()),
        }
    }
}
