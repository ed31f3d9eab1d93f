//! Error types for the store module.

use stockroom_core::{CoreError, Filter};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A table constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A stored row could not be converted, or a filter value does not fit
    /// its column.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Row conversion error from the core types.
    #[error("row conversion error: {0}")]
    Row(#[from] CoreError),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The blocking worker or connection lock failed.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Refuse a filter whose values do not fit their columns.
pub(crate) fn check_filter(filter: &Filter) -> Result<()> {
    filter
        .check()
        .map_err(|e| StoreError::InvalidData(e.to_string()))
}
