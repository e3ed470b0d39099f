use log::trace;

use exp::{
    BinOp, BinaryOp, Bool, Cond, EmptyBag, Exp, Field, Filter, FlatMap, HasType, Hole, Lambda,
    MakeMap, Map, MapGet, Num, Singleton, Tuple, TupleGet, Type, UnOp, UnaryOp, Value, Variable,
    mkval,
};
use printer::Print;

use crate::env::Env;
use crate::result::*;

/// Total evaluation of well-typed expressions over finite values.
///
/// Partial operations take the type's zero value instead of failing:
/// division by zero is zero, `the` of an empty bag is `mkval`, a map
/// lookup on an absent key is the value type's zero. Errors are reserved
/// for unbound variables, holes and ill-typed nodes.
pub trait Eval {
    fn eval(&self, env: &Env) -> Result<Value, EvalError>;
}

/// Application of a lambda to a single argument.
pub trait Apply {
    fn apply(&self, arg: Value, env: &Env) -> Result<Value, EvalError>;
}

impl Apply for Lambda {
    fn apply(&self, arg: Value, env: &Env) -> Result<Value, EvalError> {
        let mut env = env.clone();
        env.bind(self.param.id.clone(), arg);
        self.body.eval(&env)
    }
}

impl Eval for Exp {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let value = match self {
            Exp::Num(e) => e.eval(env),
            Exp::Bool(e) => e.eval(env),
            Exp::Variable(e) => e.eval(env),
            Exp::Lambda(e) => e.eval(env),
            Exp::UnOp(e) => e.eval(env),
            Exp::BinOp(e) => e.eval(env),
            Exp::Cond(e) => e.eval(env),
            Exp::EmptyBag(e) => e.eval(env),
            Exp::Singleton(e) => e.eval(env),
            Exp::Filter(e) => e.eval(env),
            Exp::Map(e) => e.eval(env),
            Exp::FlatMap(e) => e.eval(env),
            Exp::MakeMap(e) => e.eval(env),
            Exp::MapGet(e) => e.eval(env),
            Exp::Tuple(e) => e.eval(env),
            Exp::TupleGet(e) => e.eval(env),
            Exp::Field(e) => e.eval(env),
            Exp::Hole(e) => e.eval(env),
        };
        if let Ok(value) = &value {
            trace!(
                "{} |- {} ▷ {}",
                env.print_to_string(None),
                self.print_to_string(None),
                value.print_to_string(None)
            );
        }
        value
    }
}

impl Eval for Num {
    fn eval(&self, _env: &Env) -> Result<Value, EvalError> {
        Ok(Value::Int(self.val))
    }
}

impl Eval for Bool {
    fn eval(&self, _env: &Env) -> Result<Value, EvalError> {
        Ok(Value::Bool(self.val))
    }
}

impl Eval for Variable {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        env.get(&self.var.id)
            .cloned()
            .ok_or_else(|| EvalError::UnboundVariable { id: self.var.id.clone() })
    }
}

impl Eval for Lambda {
    /// A bare lambda evaluates to its own syntax; see `Value::Lambda`.
    fn eval(&self, _env: &Env) -> Result<Value, EvalError> {
        Ok(Value::Lambda(Box::new(self.clone())))
    }
}

impl Eval for UnOp {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let value = self.exp.eval(env)?;
        match self.op {
            UnaryOp::Not => match value.as_bool() {
                Some(b) => Ok(Value::Bool(!b)),
                None => ill_typed("not applied to a non-boolean"),
            },
            UnaryOp::Neg => match value.as_int() {
                Some(n) => Ok(Value::Int(-n)),
                None => ill_typed("negation applied to a non-integer"),
            },
            UnaryOp::Sum => {
                let elems = match value.elems() {
                    Some(elems) => elems,
                    None => return ill_typed("sum applied to a non-collection"),
                };
                let mut total = 0i64;
                for x in elems {
                    match x.as_int() {
                        Some(n) => total += n,
                        None => return ill_typed("sum over non-integer elements"),
                    }
                }
                Ok(Value::Int(total))
            }
            UnaryOp::Len => match value.elems() {
                Some(elems) => Ok(Value::Int(elems.len() as i64)),
                None => ill_typed("len applied to a non-collection"),
            },
            UnaryOp::The => {
                let elems = match value.elems() {
                    Some(elems) => elems,
                    None => return ill_typed("the applied to a non-collection"),
                };
                match elems.first() {
                    // Values are canonically sorted, so this picks the
                    // least element of a (degenerate) multi-element bag.
                    Some(x) => Ok(x.clone()),
                    None => match self.exp.typ().elem() {
                        Some(t) => Ok(mkval(t)),
                        None => ill_typed("the applied to a non-collection"),
                    },
                }
            }
            UnaryOp::Distinct => match value.elems() {
                Some(elems) => Ok(Value::set(elems.to_vec())),
                None => ill_typed("distinct applied to a non-collection"),
            },
            UnaryOp::Unique => match value.elems() {
                Some(elems) => Ok(Value::Bool(elems.windows(2).all(|w| w[0] != w[1]))),
                None => ill_typed("unique applied to a non-collection"),
            },
        }
    }
}

impl Eval for BinOp {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let lhs = self.lhs.eval(env)?;
        let rhs = self.rhs.eval(env)?;
        match self.op {
            BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                match (lhs.as_int(), rhs.as_int()) {
                    (Some(l), Some(r)) => {
                        let b = match self.op {
                            BinaryOp::Lt => l < r,
                            BinaryOp::Le => l <= r,
                            BinaryOp::Gt => l > r,
                            _ => l >= r,
                        };
                        Ok(Value::Bool(b))
                    }
                    _ => ill_typed("comparison of non-integers"),
                }
            }
            BinaryOp::Add => match (&lhs, &rhs) {
                (Value::Int(l), Value::Int(r)) => Ok(Value::Int(l + r)),
                (Value::Bag(l), Value::Bag(r)) => {
                    Ok(Value::bag(l.iter().chain(r).cloned().collect()))
                }
                (Value::Set(l), Value::Set(r)) => {
                    Ok(Value::set(l.iter().chain(r).cloned().collect()))
                }
                _ => ill_typed("addition of incompatible values"),
            },
            BinaryOp::Sub => match (lhs.as_int(), rhs.as_int()) {
                (Some(l), Some(r)) => Ok(Value::Int(l - r)),
                _ => ill_typed("subtraction of non-integers"),
            },
            BinaryOp::Div => match (lhs.as_int(), rhs.as_int()) {
                // Division by zero yields the zero value.
                (Some(_), Some(0)) => Ok(Value::Int(0)),
                (Some(l), Some(r)) => Ok(Value::Int(l / r)),
                _ => ill_typed("division of non-integers"),
            },
            BinaryOp::And => match (lhs.as_bool(), rhs.as_bool()) {
                (Some(l), Some(r)) => Ok(Value::Bool(l && r)),
                _ => ill_typed("conjunction of non-booleans"),
            },
            BinaryOp::Or => match (lhs.as_bool(), rhs.as_bool()) {
                (Some(l), Some(r)) => Ok(Value::Bool(l || r)),
                _ => ill_typed("disjunction of non-booleans"),
            },
            BinaryOp::In => match rhs.elems() {
                Some(elems) => Ok(Value::Bool(elems.contains(&lhs))),
                None => ill_typed("membership test on a non-collection"),
            },
        }
    }
}

impl Eval for Cond {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        match self.cond.eval(env)?.as_bool() {
            Some(true) => self.then_branch.eval(env),
            Some(false) => self.else_branch.eval(env),
            None => ill_typed("condition is not a boolean"),
        }
    }
}

impl Eval for EmptyBag {
    fn eval(&self, _env: &Env) -> Result<Value, EvalError> {
        Ok(Value::Bag(Vec::new()))
    }
}

impl Eval for Singleton {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        Ok(Value::Bag(vec![self.exp.eval(env)?]))
    }
}

impl Eval for Filter {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let value = self.exp.eval(env)?;
        let elems = match value.elems() {
            Some(elems) => elems,
            None => return ill_typed("filter applied to a non-collection"),
        };
        let mut kept = Vec::new();
        for x in elems {
            match self.pred.apply(x.clone(), env)?.as_bool() {
                Some(true) => kept.push(x.clone()),
                Some(false) => {}
                None => return ill_typed("filter predicate is not boolean"),
            }
        }
        // A sorted subsequence of a sorted list stays canonical.
        match value {
            Value::Set(_) => Ok(Value::Set(kept)),
            _ => Ok(Value::Bag(kept)),
        }
    }
}

impl Eval for Map {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let value = self.exp.eval(env)?;
        let elems = match value.elems() {
            Some(elems) => elems,
            None => return ill_typed("map applied to a non-collection"),
        };
        let mut mapped = Vec::with_capacity(elems.len());
        for x in elems {
            mapped.push(self.f.apply(x.clone(), env)?);
        }
        Ok(Value::bag(mapped))
    }
}

impl Eval for FlatMap {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let value = self.exp.eval(env)?;
        let elems = match value.elems() {
            Some(elems) => elems,
            None => return ill_typed("flat_map applied to a non-collection"),
        };
        let mut flattened = Vec::new();
        for x in elems {
            let inner = self.f.apply(x.clone(), env)?;
            match inner.elems() {
                Some(inner) => flattened.extend(inner.iter().cloned()),
                None => return ill_typed("flat_map body is not a collection"),
            }
        }
        Ok(Value::bag(flattened))
    }
}

impl Eval for MakeMap {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let value = self.exp.eval(env)?;
        let elems = match value.elems() {
            Some(elems) => elems,
            None => return ill_typed("make_map applied to a non-collection"),
        };
        let mut groups: Vec<(Value, Vec<Value>)> = Vec::new();
        for x in elems {
            let key = self.key.apply(x.clone(), env)?;
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, group)) => group.push(x.clone()),
                None => groups.push((key, vec![x.clone()])),
            }
        }
        let mut entries = Vec::with_capacity(groups.len());
        for (key, group) in groups {
            let value = self.value.apply(Value::Bag(group), env)?;
            entries.push((key, value));
        }
        Ok(Value::map(entries))
    }
}

impl Eval for MapGet {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let map = self.map.eval(env)?;
        let key = self.key.eval(env)?;
        let entries = match &map {
            Value::Map(entries) => entries,
            _ => return ill_typed("lookup on a non-map"),
        };
        match entries.iter().find(|(k, _)| *k == key) {
            Some((_, v)) => Ok(v.clone()),
            None => match self.map.typ() {
                Type::Map(_, v) => Ok(mkval(&v)),
                _ => ill_typed("lookup on a non-map"),
            },
        }
    }
}

impl Eval for Tuple {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        let values = self.exps.iter().map(|e| e.eval(env)).collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Tuple(values))
    }
}

impl Eval for TupleGet {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        match self.exp.eval(env)? {
            Value::Tuple(values) if self.index < values.len() => {
                Ok(values[self.index].clone())
            }
            _ => ill_typed("tuple projection out of range"),
        }
    }
}

impl Eval for Field {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        match self.exp.eval(env)? {
            Value::Record(fields) => match fields.iter().find(|(name, _)| *name == self.field) {
                Some((_, v)) => Ok(v.clone()),
                None => ill_typed(format!("record has no field {}", self.field)),
            },
            _ => ill_typed("field projection on a non-record"),
        }
    }
}

impl Eval for Hole {
    fn eval(&self, _env: &Env) -> Result<Value, EvalError> {
        Err(EvalError::UnfilledHole { name: self.name.clone() })
    }
}

impl<T: Eval> Eval for Box<T> {
    fn eval(&self, env: &Env) -> Result<Value, EvalError> {
        self.as_ref().eval(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp::Var;
    use exp::exp::build::*;

    fn int_bag(ns: &[i64]) -> Value {
        Value::bag(ns.iter().map(|n| Value::Int(*n)).collect())
    }

    fn env_with(id: &str, v: Value) -> Env {
        let mut env = Env::new();
        env.bind(id, v);
        env
    }

    #[test]
    fn filter_keeps_matching_elements() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let b = Var::new("b", Type::Int);
        let e = filter(var(&xs), lam(b.clone(), gt(var(&b), num(1))));
        let env = env_with("xs", int_bag(&[1, 2, 3]));
        assert_eq!(e.eval(&env).unwrap(), int_bag(&[2, 3]));
    }

    #[test]
    fn sum_of_empty_bag_is_zero() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let env = env_with("xs", int_bag(&[]));
        assert_eq!(sum(var(&xs)).eval(&env).unwrap(), Value::Int(0));
    }

    #[test]
    fn the_of_empty_bag_is_mkval() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let env = env_with("xs", int_bag(&[]));
        assert_eq!(the(var(&xs)).eval(&env).unwrap(), Value::Int(0));
    }

    #[test]
    fn division_by_zero_is_zero() {
        let e = binop(BinaryOp::Div, num(7), num(0));
        assert_eq!(e.eval(&Env::new()).unwrap(), Value::Int(0));
    }

    #[test]
    fn make_map_groups_and_map_get_defaults() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let b = Var::new("b", Type::Int);
        let g = Var::new("g", Type::bag(Type::Int));
        let m = make_map(var(&xs), lam(b.clone(), var(&b)), lam(g.clone(), len(var(&g))));
        let env = env_with("xs", int_bag(&[1, 1, 2]));

        let hit = map_get(m.clone(), num(1));
        assert_eq!(hit.eval(&env).unwrap(), Value::Int(2));

        let miss = map_get(m, num(9));
        assert_eq!(miss.eval(&env).unwrap(), Value::Int(0));
    }

    #[test]
    fn unbound_variable_is_an_error() {
        let x = Var::new("x", Type::Int);
        assert_eq!(
            var(&x).eval(&Env::new()),
            Err(EvalError::UnboundVariable { id: "x".to_owned() })
        );
    }

    #[test]
    fn unique_detects_duplicates() {
        let xs = Var::new("xs", Type::bag(Type::Int));
        let env = env_with("xs", int_bag(&[1, 2, 1]));
        assert_eq!(unique(var(&xs)).eval(&env).unwrap(), Value::Bool(false));
        let env = env_with("xs", int_bag(&[1, 2, 3]));
        assert_eq!(unique(var(&xs)).eval(&env).unwrap(), Value::Bool(true));
    }
}
