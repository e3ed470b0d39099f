use pretty::DocAllocator;
use printer::tokens::{AND, EQ, GE, GT, IN, LE, LT, MINUS, OR, PLUS, SLASH};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg, parens_if};

use crate::exp::prec;
use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BinaryOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    /// Integer addition, or bag/set union on collections.
    Add,
    Sub,
    /// Integer division; division by zero yields zero.
    Div,
    And,
    Or,
    /// Collection membership.
    In,
}

impl BinaryOp {
    /// The commutative operators whose operand order is canonicalized by
    /// the builder adapters.
    pub fn is_commutative(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::And | BinaryOp::Or | BinaryOp::Add)
    }

    pub fn token(&self) -> &'static str {
        match self {
            BinaryOp::Eq => EQ,
            BinaryOp::Lt => LT,
            BinaryOp::Le => LE,
            BinaryOp::Gt => GT,
            BinaryOp::Ge => GE,
            BinaryOp::Add => PLUS,
            BinaryOp::Sub => MINUS,
            BinaryOp::Div => SLASH,
            BinaryOp::And => AND,
            BinaryOp::Or => OR,
            BinaryOp::In => IN,
        }
    }

    fn prec(&self) -> Precedence {
        match self {
            BinaryOp::Or => prec::OR,
            BinaryOp::And => prec::AND,
            BinaryOp::Eq
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::In => prec::CMP,
            BinaryOp::Add | BinaryOp::Sub => prec::ADD,
            BinaryOp::Div => prec::MUL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinOp {
    pub op: BinaryOp,
    pub lhs: Box<Exp>,
    pub rhs: Box<Exp>,
}

impl From<BinOp> for Exp {
    fn from(e: BinOp) -> Exp {
        Exp::BinOp(e)
    }
}

impl HasType for BinOp {
    fn typ(&self) -> Type {
        match self.op {
            BinaryOp::Eq
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::And
            | BinaryOp::Or
            | BinaryOp::In => Type::Bool,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Div => self.lhs.typ(),
        }
    }
}

impl FreeVars for BinOp {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.lhs.free_vars_mut(bound, fvs);
        self.rhs.free_vars_mut(bound, fvs);
    }
}

impl Substitutable for BinOp {
    type Result = BinOp;

    fn subst(&self, by: &Substitution) -> BinOp {
        BinOp { op: self.op, lhs: self.lhs.subst(by), rhs: self.rhs.subst(by) }
    }
}

impl Print for BinOp {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let own = self.op.prec();
        let doc = self
            .lhs
            .print_prec(cfg, alloc, own)
            .append(alloc.space())
            .append(alloc.text(self.op.token()))
            .append(alloc.space())
            .append(self.rhs.print_prec(cfg, alloc, own + 1));
        parens_if(prec > own, doc)
    }
}
