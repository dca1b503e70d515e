//! Error types for expression evaluation.

use thiserror::Error;

/// A classified evaluation failure. Every error is terminal for the current
/// call: nothing is retried and no partial result is returned.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed expression text: missing operators, unmatched function-call
    /// syntax, or operand text no grammar recognizes.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// A numeric field outside its valid domain (minutes ≥ 60, percentage
    /// outside (0, 100), non-positive rate inputs, instant overflow).
    #[error("Range error: {0}")]
    Range(String),

    /// An operator applied to an incompatible pair of value kinds.
    #[error("Type error: {0}")]
    Type(String),

    /// An unrecognized duration or byte-quantity unit suffix.
    #[error("Unit error: {0}")]
    Unit(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
