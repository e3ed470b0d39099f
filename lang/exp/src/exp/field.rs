use pretty::DocAllocator;
use printer::tokens::DOT;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::exp::prec;
use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

/// Projection of a record field. The field type is stored because the
/// record declaration is not available to the expression tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Field {
    pub exp: Box<Exp>,
    pub field: String,
    pub typ: Type,
}

impl From<Field> for Exp {
    fn from(e: Field) -> Exp {
        Exp::Field(e)
    }
}

impl HasType for Field {
    fn typ(&self) -> Type {
        self.typ.clone()
    }
}

impl FreeVars for Field {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exp.free_vars_mut(bound, fvs)
    }
}

impl Substitutable for Field {
    type Result = Field;

    fn subst(&self, by: &Substitution) -> Field {
        Field { exp: self.exp.subst(by), field: self.field.clone(), typ: self.typ.clone() }
    }
}

impl Print for Field {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.exp
            .print_prec(cfg, alloc, prec::POSTFIX)
            .append(alloc.text(DOT))
            .append(alloc.text(&self.field))
    }
}
