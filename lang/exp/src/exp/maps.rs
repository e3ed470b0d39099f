use pretty::DocAllocator;
use printer::tokens::{COMMA, GET, MAKE_MAP};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::exp::Lambda;
use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

/// Groups a bag by a key projection.
///
/// The value lambda receives the sub-bag of elements that share a key, so
/// its parameter has the bag type of `exp`, not the element type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MakeMap {
    pub exp: Box<Exp>,
    pub key: Lambda,
    pub value: Lambda,
}

impl From<MakeMap> for Exp {
    fn from(e: MakeMap) -> Exp {
        Exp::MakeMap(e)
    }
}

impl HasType for MakeMap {
    fn typ(&self) -> Type {
        Type::map(self.key.body.typ(), self.value.body.typ())
    }
}

impl FreeVars for MakeMap {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exp.free_vars_mut(bound, fvs);
        self.key.free_vars_mut(bound, fvs);
        self.value.free_vars_mut(bound, fvs);
    }
}

impl Substitutable for MakeMap {
    type Result = MakeMap;

    fn subst(&self, by: &Substitution) -> MakeMap {
        MakeMap { exp: self.exp.subst(by), key: self.key.subst(by), value: self.value.subst(by) }
    }
}

impl Print for MakeMap {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let sep = alloc.text(COMMA).append(alloc.space());
        alloc.text(MAKE_MAP).append(
            self.exp
                .print(cfg, alloc)
                .append(sep.clone())
                .append(self.key.print(cfg, alloc))
                .append(sep)
                .append(self.value.print(cfg, alloc))
                .parens(),
        )
    }
}

/// Map lookup; an absent key yields the zero value of the value type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapGet {
    pub map: Box<Exp>,
    pub key: Box<Exp>,
}

impl From<MapGet> for Exp {
    fn from(e: MapGet) -> Exp {
        Exp::MapGet(e)
    }
}

impl HasType for MapGet {
    fn typ(&self) -> Type {
        match self.map.typ() {
            Type::Map(_, v) => *v,
            t => t,
        }
    }
}

impl FreeVars for MapGet {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.map.free_vars_mut(bound, fvs);
        self.key.free_vars_mut(bound, fvs);
    }
}

impl Substitutable for MapGet {
    type Result = MapGet;

    fn subst(&self, by: &Substitution) -> MapGet {
        MapGet { map: self.map.subst(by), key: self.key.subst(by) }
    }
}

impl Print for MapGet {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.text(GET).append(
            self.map
                .print(cfg, alloc)
                .append(alloc.text(COMMA))
                .append(alloc.space())
                .append(self.key.print(cfg, alloc))
                .parens(),
        )
    }
}
