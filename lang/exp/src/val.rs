use pretty::DocAllocator;
use printer::tokens::{ARROW, COLON, COMMA, FALSE, TRUE};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::exp::Lambda;
use crate::typ::Type;

/// A concrete value, shaped by the type lattice.
///
/// Collections are canonicalized on construction (bags and sets sorted,
/// sets deduplicated, maps sorted by key) so that structural equality
/// coincides with the intended unordered semantics. Use the lowercase
/// constructors instead of building the collection variants directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Handle(i64),
    Bag(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    Record(Vec<(String, Value)>),
    /// A bare lambda is not a first-class value; it evaluates to its own
    /// (canonicalized) syntax so that distinct lambdas land in distinct
    /// equivalence classes.
    Lambda(Box<Lambda>),
}

impl Value {
    pub fn bag(mut elems: Vec<Value>) -> Value {
        elems.sort();
        Value::Bag(elems)
    }

    pub fn set(mut elems: Vec<Value>) -> Value {
        elems.sort();
        elems.dedup();
        Value::Set(elems)
    }

    pub fn map(mut entries: Vec<(Value, Value)>) -> Value {
        entries.sort();
        Value::Map(entries)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The elements of a bag or set value.
    pub fn elems(&self) -> Option<&[Value]> {
        match self {
            Value::Bag(elems) | Value::Set(elems) => Some(elems),
            _ => None,
        }
    }
}

/// The deterministic zero value of a type.
pub fn mkval(typ: &Type) -> Value {
    match typ {
        Type::Int => Value::Int(0),
        Type::Bool => Value::Bool(false),
        Type::Handle(_) => Value::Handle(0),
        Type::Bag(_) => Value::Bag(Vec::new()),
        Type::Set(_) => Value::Set(Vec::new()),
        Type::Map(_, _) => Value::Map(Vec::new()),
        Type::Tuple(ts) => Value::Tuple(ts.iter().map(mkval).collect()),
        Type::Record(_, fields) => {
            Value::Record(fields.iter().map(|(name, t)| (name.clone(), mkval(t))).collect())
        }
    }
}

impl Print for Value {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Value::Int(n) => alloc.text(n.to_string()),
            Value::Bool(true) => alloc.text(TRUE),
            Value::Bool(false) => alloc.text(FALSE),
            Value::Handle(n) => alloc.text("@").append(alloc.text(n.to_string())),
            Value::Bag(elems) => print_comma_values(elems, cfg, alloc).brackets(),
            Value::Set(elems) => print_comma_values(elems, cfg, alloc).braces(),
            Value::Map(entries) => {
                let sep = alloc.text(COMMA).append(alloc.space());
                alloc
                    .intersperse(
                        entries.iter().map(|(k, v)| {
                            k.print(cfg, alloc)
                                .append(alloc.space())
                                .append(alloc.text(ARROW))
                                .append(alloc.space())
                                .append(v.print(cfg, alloc))
                        }),
                        sep,
                    )
                    .braces()
            }
            Value::Tuple(elems) => print_comma_values(elems, cfg, alloc).parens(),
            Value::Record(fields) => {
                let sep = alloc.text(COMMA).append(alloc.space());
                alloc
                    .intersperse(
                        fields.iter().map(|(name, v)| {
                            alloc
                                .text(name)
                                .append(alloc.text(COLON))
                                .append(alloc.space())
                                .append(v.print(cfg, alloc))
                        }),
                        sep,
                    )
                    .braces()
            }
            Value::Lambda(lam) => lam.print_prec(cfg, alloc, prec),
        }
    }
}

fn print_comma_values<'a>(
    elems: &'a [Value],
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
) -> Builder<'a> {
    let sep = alloc.text(COMMA).append(alloc.space());
    alloc.intersperse(elems.iter().map(|v| v.print(cfg, alloc)), sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bags_compare_order_insensitively() {
        let a = Value::bag(vec![Value::Int(2), Value::Int(1), Value::Int(1)]);
        let b = Value::bag(vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
        assert_eq!(a, b);
    }

    #[test]
    fn sets_deduplicate() {
        let s = Value::set(vec![Value::Int(3), Value::Int(3), Value::Int(1)]);
        assert_eq!(s, Value::Set(vec![Value::Int(1), Value::Int(3)]));
    }

    #[test]
    fn mkval_is_structural_zero() {
        let t = Type::Tuple(vec![Type::Int, Type::bag(Type::Bool)]);
        assert_eq!(mkval(&t), Value::Tuple(vec![Value::Int(0), Value::Bag(vec![])]));
    }
}
