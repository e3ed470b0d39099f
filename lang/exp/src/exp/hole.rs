use pretty::DocAllocator;
use printer::tokens::QUESTION;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

/// A typed placeholder for an unknown expression. Upstream passes use
/// holes to communicate sketchy candidates; holes never evaluate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hole {
    pub name: String,
    pub typ: Type,
}

impl From<Hole> for Exp {
    fn from(e: Hole) -> Exp {
        Exp::Hole(e)
    }
}

impl HasType for Hole {
    fn typ(&self) -> Type {
        self.typ.clone()
    }
}

impl FreeVars for Hole {
    fn free_vars_mut(&self, _bound: &mut Vec<String>, _fvs: &mut HashSet<Var>) {}
}

impl Substitutable for Hole {
    type Result = Exp;

    /// Holes are substitutable by name, so a pass that carved a hole can
    /// plug it again.
    fn subst(&self, by: &Substitution) -> Exp {
        match by.get(&self.name) {
            Some(e) => e.clone(),
            None => self.clone().into(),
        }
    }
}

impl Print for Hole {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.text(QUESTION).append(alloc.text(&self.name))
    }
}
