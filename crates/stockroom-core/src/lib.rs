//! # Stockroom Core
//!
//! Pure primitives for the Stockroom inventory library: column and value
//! types, field sets, rows, filters and field validation.
//!
//! This crate contains no I/O and no storage. It is pure computation over the
//! shape of the single `inventories` table.
//!
//! ## Key Types
//!
//! - [`InventoryRecord`] - A complete, typed inventory row
//! - [`FieldSet`] - Partial or complete column-to-value mapping for writes
//! - [`Row`] - A projected query result row
//! - [`Filter`] - Conjunction of column comparisons
//! - [`ItemId`] - Store-assigned row identifier
//!
//! ## Validation
//!
//! Writes are checked by [`validate_insert`] and [`validate_update`] before
//! they reach a store. See the [`validation`] module.

pub mod error;
pub mod filter;
pub mod record;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use filter::{compare_values, Comparison, Condition, Filter, Projection, SortOrder};
pub use record::{FieldSet, InventoryRecord, Row, MAX_QUANTITY};
pub use types::{Column, ItemId, UnknownColumn, Value};
pub use validation::{validate_insert, validate_update};
