//! Error types for the Stockroom core.

use thiserror::Error;

use crate::types::{Column, Value};

/// Core errors that can occur while converting rows and values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("row is missing column {0}")]
    MissingColumn(Column),

    #[error("column {column} holds a value of the wrong type")]
    WrongType { column: Column },

    /// A filter compares a column with a value of another type.
    #[error("filter on {column} cannot compare against {value}")]
    FilterType { column: Column, value: Value },
}

/// Validation errors for insert and update field sets.
///
/// Always raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: Column, reason: &'static str },
}

impl ValidationError {
    pub(crate) fn invalid(field: Column, reason: &'static str) -> Self {
        ValidationError::InvalidField { field, reason }
    }

    /// The offending column.
    pub fn field(&self) -> Column {
        match self {
            ValidationError::InvalidField { field, .. } => *field,
        }
    }
}
