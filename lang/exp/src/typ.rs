use pretty::DocAllocator;
use printer::tokens::COMMA;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg, print_comma_separated};

/// The closed set of types an expression can carry.
///
/// `Bag` is an unordered multiset, `Set` an unordered collection with
/// provably distinct elements, `Handle` an opaque user-defined identity
/// type, and `Record` a named product with labeled fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Int,
    Bool,
    Handle(String),
    Bag(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Tuple(Vec<Type>),
    Record(String, Vec<(String, Type)>),
}

/// The outer type constructor, used as the coarse first level of the
/// expression cache index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    Int,
    Bool,
    Handle,
    Bag,
    Set,
    Map,
    Tuple,
    Record,
}

impl Type {
    pub fn bag(elem: Type) -> Type {
        Type::Bag(Box::new(elem))
    }

    pub fn set(elem: Type) -> Type {
        Type::Set(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            Type::Int => TypeTag::Int,
            Type::Bool => TypeTag::Bool,
            Type::Handle(_) => TypeTag::Handle,
            Type::Bag(_) => TypeTag::Bag,
            Type::Set(_) => TypeTag::Set,
            Type::Map(_, _) => TypeTag::Map,
            Type::Tuple(_) => TypeTag::Tuple,
            Type::Record(_, _) => TypeTag::Record,
        }
    }

    /// The element type of a bag or set.
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Bag(t) | Type::Set(t) => Some(t),
            _ => None,
        }
    }

    /// The key type of a map.
    pub fn key(&self) -> Option<&Type> {
        match self {
            Type::Map(k, _) => Some(k),
            _ => None,
        }
    }

    /// The value type of a map.
    pub fn value(&self) -> Option<&Type> {
        match self {
            Type::Map(_, v) => Some(v),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Type::Bag(_) | Type::Set(_))
    }
}

impl Print for Type {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Type::Int => alloc.text("Int"),
            Type::Bool => alloc.text("Bool"),
            Type::Handle(name) => alloc.text(name),
            Type::Bag(t) => alloc.text("Bag").append(t.print(cfg, alloc).angles()),
            Type::Set(t) => alloc.text("Set").append(t.print(cfg, alloc).angles()),
            Type::Map(k, v) => alloc.text("Map").append(
                k.print(cfg, alloc)
                    .append(alloc.text(COMMA))
                    .append(alloc.space())
                    .append(v.print(cfg, alloc))
                    .angles(),
            ),
            Type::Tuple(ts) => print_comma_separated(ts, cfg, alloc).parens(),
            Type::Record(name, _) => alloc.text(name),
        }
    }
}
