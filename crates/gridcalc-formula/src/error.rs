//! Error types for formula parsing

use thiserror::Error;

/// Result alias for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors raised while parsing a substituted arithmetic expression.
///
/// These never escape to callers of the evaluator: the evaluation pipeline
/// converts them into the `#ERROR` sentinel.
#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("Parse error: {0}")]
    Parse(String),
}
