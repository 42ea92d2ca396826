//! JSON document error types

use thiserror::Error;

/// Result type for JSON document operations
pub type JsonResult<T> = std::result::Result<T, JsonError>;

/// Errors that can occur while reading or writing grid documents
#[derive(Debug, Error)]
pub enum JsonError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON or a document that does not match the grid shape
    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),
}
