use miette::Diagnostic;
use thiserror::Error;

use exp::PathError;

#[derive(Error, Diagnostic, Debug)]
pub enum SynthError {
    /// The caller's stop callback fired.
    #[error("search stopped by caller")]
    #[diagnostic(code("S-001"))]
    Stopped,
    /// The progress heuristic fired. Terminal, not a failure: the
    /// emission sequence simply ends.
    #[error("no more improvements")]
    #[diagnostic(code("S-002"))]
    NoMoreImprovements,
    #[error("inconsistent grammar: cannot prove the elements of {exp} distinct")]
    #[diagnostic(
        code("S-003"),
        help("every set-typed production must be covered by assumptions that make its elements unique")
    )]
    InconsistentGrammar { exp: String },
    #[error("no unused binder of type {typ} left in the pool")]
    #[diagnostic(code("S-004"))]
    BinderPoolExhausted { typ: String },
    #[error(transparent)]
    #[diagnostic(code("S-005"))]
    Replacement(#[from] PathError),
}
