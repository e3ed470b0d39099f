use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("variable {id} is not bound in the example")]
    #[diagnostic(code("E-001"))]
    UnboundVariable { id: String },
    #[error("hole ?{name} cannot be evaluated")]
    #[diagnostic(code("E-002"))]
    UnfilledHole { name: String },
    #[error("ill-typed expression: {message}")]
    #[diagnostic(code("E-003"))]
    IllTyped { message: String },
}

pub(crate) fn ill_typed<T>(message: impl Into<String>) -> Result<T, EvalError> {
    Err(EvalError::IllTyped { message: message.into() })
}
