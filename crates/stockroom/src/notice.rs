//! User-visible transient messages.

use std::fmt;

use stockroom_core::{Column, MAX_QUANTITY};

/// A short message the editor surfaces to the person using it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InsertSucceeded,
    InsertFailed,
    UpdateSucceeded,
    UpdateFailed,
    DeleteSucceeded,
    DeleteFailed,
    /// Increment refused at the upper bound.
    QuantityAtMaximum,
    /// Decrement refused at zero.
    QuantityAtMinimum,
    /// The draft did not pass validation.
    InvalidInput { field: Column, reason: &'static str },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InsertSucceeded => f.write_str("Inventory saved"),
            Notice::InsertFailed => f.write_str("Error with saving inventory"),
            Notice::UpdateSucceeded => f.write_str("Inventory updated"),
            Notice::UpdateFailed => f.write_str("Error with updating inventory"),
            Notice::DeleteSucceeded => f.write_str("Inventory deleted"),
            Notice::DeleteFailed => f.write_str("Error with deleting inventory"),
            Notice::QuantityAtMaximum => {
                write!(f, "You cannot have more than {} items", MAX_QUANTITY)
            }
            Notice::QuantityAtMinimum => f.write_str("You cannot have less than 0 items"),
            Notice::InvalidInput { field, reason } => write!(f, "Invalid {}: {}", field, reason),
        }
    }
}
