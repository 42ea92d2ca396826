//! Error types for gridcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridcalc-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid column name (not canonical uppercase letters)
    #[error("Invalid column name: {0}")]
    InvalidColumnName(String),

    /// Row not found by identifier
    #[error("Row not found: {0}")]
    RowNotFound(u64),

    /// Column not found by field name
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A grid must keep at least one column
    #[error("Cannot delete all columns")]
    CannotDeleteAllColumns,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
