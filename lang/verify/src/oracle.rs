use miette::Diagnostic;
use thiserror::Error;

use eval::{EvalError, Example};
use exp::{Exp, Var};

/// The SMT-backed validity/satisfiability oracle.
///
/// Formulas are boolean expressions over the expression language.
/// Failure to decide (timeout, unknown, unsupported theory) is reported
/// as an `OracleError`, distinct from an unsat answer, so callers can
/// conservatively skip a candidate instead of accepting it.
pub trait Oracle {
    /// Whether `phi` holds under every assignment of its free variables.
    fn valid(&self, phi: &Exp) -> Result<bool, OracleError>;

    /// Whether some assignment satisfies `phi`.
    fn satisfiable(&self, phi: &Exp) -> Result<bool, OracleError>;

    /// A concrete assignment over `vars` satisfying `phi`, or `None`
    /// when `phi` is unsatisfiable.
    fn satisfy(&self, phi: &Exp, vars: &[Var]) -> Result<Option<Example>, OracleError>;
}

#[derive(Error, Diagnostic, Debug)]
pub enum OracleError {
    #[error("unsupported type in bounded search: {typ}")]
    #[diagnostic(code("V-001"))]
    UnsupportedType { typ: String },
    #[error("search space of {assignments} assignments exceeds the limit of {limit}")]
    #[diagnostic(code("V-002"))]
    SearchSpaceExceeded { assignments: u64, limit: u64 },
    #[error(transparent)]
    #[diagnostic(code("V-003"))]
    Evaluation(#[from] EvalError),
}
