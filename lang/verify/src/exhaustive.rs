use log::trace;

use eval::{Env, Eval, Example};
use exp::exp::build;
use exp::{Exp, FreeVars, Type, Value, Var};
use printer::Print;

use crate::oracle::{Oracle, OracleError};

/// A bounded, deterministic model enumerator.
///
/// Assignments are drawn from small type-directed domains and the formula
/// is evaluated concretely under each. Satisfiability answers are exact
/// within the bound; outside it the oracle reports an error rather than
/// guessing. Used as the reference oracle by tests and the demo binary;
/// production callers plug in an SMT binding behind the same trait.
pub struct ExhaustiveOracle {
    pub int_min: i64,
    pub int_max: i64,
    pub handle_count: i64,
    pub max_collection_len: usize,
    pub max_assignments: u64,
}

impl Default for ExhaustiveOracle {
    fn default() -> Self {
        ExhaustiveOracle {
            int_min: -1,
            int_max: 2,
            handle_count: 2,
            max_collection_len: 2,
            max_assignments: 1_000_000,
        }
    }
}

impl Oracle for ExhaustiveOracle {
    fn valid(&self, phi: &Exp) -> Result<bool, OracleError> {
        Ok(!self.satisfiable(&build::not(phi.clone()))?)
    }

    fn satisfiable(&self, phi: &Exp) -> Result<bool, OracleError> {
        Ok(self.satisfy(phi, &[])?.is_some())
    }

    fn satisfy(&self, phi: &Exp, vars: &[Var]) -> Result<Option<Example>, OracleError> {
        let vars = closed_scope(phi, vars);
        let domains = vars
            .iter()
            .map(|v| self.domain(&v.typ))
            .collect::<Result<Vec<_>, _>>()?;

        if domains.iter().any(|d| d.is_empty()) {
            return Ok(None);
        }

        let mut total: u64 = 1;
        for d in &domains {
            total = total.saturating_mul(d.len() as u64);
            if total > self.max_assignments {
                return Err(OracleError::SearchSpaceExceeded {
                    assignments: total,
                    limit: self.max_assignments,
                });
            }
        }

        let mut odometer = vec![0usize; domains.len()];
        loop {
            let env: Env = vars
                .iter()
                .enumerate()
                .map(|(i, v)| (v.id.clone(), domains[i][odometer[i]].clone()))
                .collect();
            match phi.eval(&env)?.as_bool() {
                Some(true) => {
                    trace!("model for {}: {}", phi.print_to_string(None), env.print_to_string(None));
                    return Ok(Some(env));
                }
                Some(false) => {}
                None => {
                    return Err(OracleError::Evaluation(eval::EvalError::IllTyped {
                        message: "formula is not boolean".to_owned(),
                    }));
                }
            }
            if !step(&mut odometer, &domains) {
                return Ok(None);
            }
        }
    }
}

/// Advance the odometer; false once all assignments have been visited.
fn step(odometer: &mut [usize], domains: &[Vec<Value>]) -> bool {
    for i in (0..odometer.len()).rev() {
        odometer[i] += 1;
        if odometer[i] < domains[i].len() {
            return true;
        }
        odometer[i] = 0;
    }
    false
}

/// The declared variables extended by any free variable of the formula,
/// in a deterministic order.
fn closed_scope(phi: &Exp, vars: &[Var]) -> Vec<Var> {
    let mut all: Vec<Var> = vars.to_vec();
    for v in phi.free_vars_sorted() {
        if !all.iter().any(|w| w.id == v.id) {
            all.push(v);
        }
    }
    all.sort();
    all.dedup();
    all
}

impl ExhaustiveOracle {
    /// Every value of `typ` inside the configured bounds, in a fixed
    /// order.
    fn domain(&self, typ: &Type) -> Result<Vec<Value>, OracleError> {
        match typ {
            Type::Int => Ok((self.int_min..=self.int_max).map(Value::Int).collect()),
            Type::Bool => Ok(vec![Value::Bool(false), Value::Bool(true)]),
            Type::Handle(_) => Ok((0..self.handle_count).map(Value::Handle).collect()),
            Type::Bag(elem) => {
                let elem_domain = self.domain(elem)?;
                Ok(multisets(&elem_domain, self.max_collection_len)
                    .into_iter()
                    .map(Value::bag)
                    .collect())
            }
            Type::Set(elem) => {
                let elem_domain = self.domain(elem)?;
                Ok(subsets(&elem_domain, self.max_collection_len)
                    .into_iter()
                    .map(Value::set)
                    .collect())
            }
            Type::Tuple(ts) => {
                let parts =
                    ts.iter().map(|t| self.domain(t)).collect::<Result<Vec<_>, _>>()?;
                Ok(cross_product(&parts).into_iter().map(Value::Tuple).collect())
            }
            Type::Record(_, fields) => {
                let parts = fields
                    .iter()
                    .map(|(_, t)| self.domain(t))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(cross_product(&parts)
                    .into_iter()
                    .map(|values| {
                        Value::Record(
                            fields
                                .iter()
                                .map(|(name, _)| name.clone())
                                .zip(values)
                                .collect(),
                        )
                    })
                    .collect())
            }
            Type::Map(_, _) => Err(OracleError::UnsupportedType {
                typ: typ.print_to_string(None),
            }),
        }
    }
}

/// All multisets over `domain` up to `max_len` elements, smallest first.
fn multisets(domain: &[Value], max_len: usize) -> Vec<Vec<Value>> {
    let mut out = vec![Vec::new()];
    let mut frontier: Vec<(usize, Vec<Value>)> = vec![(0, Vec::new())];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for (start, prefix) in frontier {
            for (i, v) in domain.iter().enumerate().skip(start) {
                let mut extended = prefix.clone();
                extended.push(v.clone());
                out.push(extended.clone());
                next.push((i, extended));
            }
        }
        frontier = next;
    }
    out
}

/// All subsets over `domain` up to `max_len` elements, smallest first.
fn subsets(domain: &[Value], max_len: usize) -> Vec<Vec<Value>> {
    let mut out = vec![Vec::new()];
    let mut frontier: Vec<(usize, Vec<Value>)> = vec![(0, Vec::new())];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for (start, prefix) in frontier {
            for (i, v) in domain.iter().enumerate().skip(start) {
                let mut extended = prefix.clone();
                extended.push(v.clone());
                out.push(extended.clone());
                next.push((i + 1, extended));
            }
        }
        frontier = next;
    }
    out
}

fn cross_product(parts: &[Vec<Value>]) -> Vec<Vec<Value>> {
    let mut out: Vec<Vec<Value>> = vec![Vec::new()];
    for part in parts {
        let mut next = Vec::with_capacity(out.len() * part.len());
        for prefix in &out {
            for v in part {
                let mut extended = prefix.clone();
                extended.push(v.clone());
                next.push(extended);
            }
        }
        out = next;
    }
    out
}
