use pretty::DocAllocator;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::{HashSet, Type};

/// A named variable together with its type.
///
/// The same representation serves state variables, query arguments and
/// lambda binders; the roles are distinguished by where a `Var` is
/// supplied, not by its shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var {
    pub id: String,
    pub typ: Type,
}

impl Var {
    pub fn new(id: impl Into<String>, typ: Type) -> Var {
        Var { id: id.into(), typ }
    }

    /// A variant of `base` that collides with no name in `taken`.
    /// Priming keeps fresh-name generation deterministic across runs.
    pub fn fresh(base: &str, typ: Type, taken: &HashSet<String>) -> Var {
        let mut id = base.to_owned();
        while taken.contains(&id) {
            id.push('\'');
        }
        Var { id, typ }
    }
}

impl Print for Var {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.text(&self.id)
    }
}
