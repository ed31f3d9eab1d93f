//! Error types for the gateway and editor.

use stockroom_core::{Column, ValidationError};
use stockroom_store::StoreError;
use thiserror::Error;

use crate::address::Address;

/// Errors that can occur during Gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A field failed validation. Nothing was written.
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: Column, reason: &'static str },

    /// The address names neither the collection nor an item in it.
    #[error("unsupported address: {0}")]
    UnsupportedAddress(Address),

    /// The operation is not valid at this address granularity.
    #[error("{operation} is not supported for {address}")]
    UnsupportedOperation {
        operation: &'static str,
        address: Address,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<ValidationError> for GatewayError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::InvalidField { field, reason } => {
                GatewayError::InvalidField { field, reason }
            }
        }
    }
}

/// Result type for Gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors raised when opening an editor.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The editor can only be opened on a single item.
    #[error("editor needs an item address, got {0}")]
    NotAnItemAddress(Address),
}
