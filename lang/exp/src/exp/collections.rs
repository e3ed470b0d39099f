use pretty::DocAllocator;
use printer::tokens::{COMMA, FILTER, FLAT_MAP, MAP};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::exp::Lambda;
use crate::traits::{FreeVars, HasType, Substitutable, Substitution};
use crate::typ::Type;
use crate::{Exp, HashSet, Var};

/// The empty bag. It carries its full bag type since nothing else
/// determines the element type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmptyBag {
    pub typ: Type,
}

impl From<EmptyBag> for Exp {
    fn from(e: EmptyBag) -> Exp {
        Exp::EmptyBag(e)
    }
}

impl HasType for EmptyBag {
    fn typ(&self) -> Type {
        self.typ.clone()
    }
}

impl FreeVars for EmptyBag {
    fn free_vars_mut(&self, _bound: &mut Vec<String>, _fvs: &mut HashSet<Var>) {}
}

impl Substitutable for EmptyBag {
    type Result = EmptyBag;

    fn subst(&self, _by: &Substitution) -> EmptyBag {
        self.clone()
    }
}

impl Print for EmptyBag {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.nil().brackets()
    }
}

/// A one-element bag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Singleton {
    pub exp: Box<Exp>,
}

impl From<Singleton> for Exp {
    fn from(e: Singleton) -> Exp {
        Exp::Singleton(e)
    }
}

impl HasType for Singleton {
    fn typ(&self) -> Type {
        Type::bag(self.exp.typ())
    }
}

impl FreeVars for Singleton {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exp.free_vars_mut(bound, fvs)
    }
}

impl Substitutable for Singleton {
    type Result = Singleton;

    fn subst(&self, by: &Substitution) -> Singleton {
        Singleton { exp: self.exp.subst(by) }
    }
}

impl Print for Singleton {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.exp.print(cfg, alloc).brackets()
    }
}

/// Keeps the elements of a collection on which the predicate holds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Filter {
    pub exp: Box<Exp>,
    pub pred: Lambda,
}

impl From<Filter> for Exp {
    fn from(e: Filter) -> Exp {
        Exp::Filter(e)
    }
}

impl HasType for Filter {
    fn typ(&self) -> Type {
        self.exp.typ()
    }
}

impl FreeVars for Filter {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exp.free_vars_mut(bound, fvs);
        self.pred.free_vars_mut(bound, fvs);
    }
}

impl Substitutable for Filter {
    type Result = Filter;

    fn subst(&self, by: &Substitution) -> Filter {
        Filter { exp: self.exp.subst(by), pred: self.pred.subst(by) }
    }
}

impl Print for Filter {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        print_call(FILTER, &self.exp, &self.pred, cfg, alloc)
    }
}

/// Applies a function to every element of a bag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Map {
    pub exp: Box<Exp>,
    pub f: Lambda,
}

impl From<Map> for Exp {
    fn from(e: Map) -> Exp {
        Exp::Map(e)
    }
}

impl HasType for Map {
    fn typ(&self) -> Type {
        Type::bag(self.f.body.typ())
    }
}

impl FreeVars for Map {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exp.free_vars_mut(bound, fvs);
        self.f.free_vars_mut(bound, fvs);
    }
}

impl Substitutable for Map {
    type Result = Map;

    fn subst(&self, by: &Substitution) -> Map {
        Map { exp: self.exp.subst(by), f: self.f.subst(by) }
    }
}

impl Print for Map {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        print_call(MAP, &self.exp, &self.f, cfg, alloc)
    }
}

/// Applies a bag-valued function to every element and flattens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlatMap {
    pub exp: Box<Exp>,
    pub f: Lambda,
}

impl From<FlatMap> for Exp {
    fn from(e: FlatMap) -> Exp {
        Exp::FlatMap(e)
    }
}

impl HasType for FlatMap {
    fn typ(&self) -> Type {
        self.f.body.typ()
    }
}

impl FreeVars for FlatMap {
    fn free_vars_mut(&self, bound: &mut Vec<String>, fvs: &mut HashSet<Var>) {
        self.exp.free_vars_mut(bound, fvs);
        self.f.free_vars_mut(bound, fvs);
    }
}

impl Substitutable for FlatMap {
    type Result = FlatMap;

    fn subst(&self, by: &Substitution) -> FlatMap {
        FlatMap { exp: self.exp.subst(by), f: self.f.subst(by) }
    }
}

impl Print for FlatMap {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        print_call(FLAT_MAP, &self.exp, &self.f, cfg, alloc)
    }
}

fn print_call<'a>(
    name: &'static str,
    exp: &'a Exp,
    f: &'a Lambda,
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
) -> Builder<'a> {
    alloc.text(name).append(
        exp.print(cfg, alloc)
            .append(alloc.text(COMMA))
            .append(alloc.space())
            .append(f.print(cfg, alloc))
            .parens(),
    )
}
