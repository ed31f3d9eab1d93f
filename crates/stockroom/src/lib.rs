//! # Stockroom
//!
//! A small inventory record store: one table of stock items behind an
//! addressed gateway, plus the state machine for editing a single item.
//!
//! ## Overview
//!
//! - **Gateway**: query, insert, update and delete rows by address, with
//!   field validation and change notifications
//! - **Addresses**: `content://<authority>/<collection>` names every row,
//!   `content://<authority>/<collection>/<id>` names one
//! - **Editor**: a draft record with a dirty flag, a bounded quantity
//!   counter, save and delete, and a discard-confirmation gate
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use stockroom::{EditorController, Gateway, GatewayConfig, SaveOutcome};
//! use stockroom::store::SqliteStore;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let store = SqliteStore::open("stockroom.db")?;
//!     let gateway = Arc::new(Gateway::new(store, GatewayConfig::default()));
//!
//!     let mut editor = EditorController::open(Arc::clone(&gateway), None)?;
//!     editor.set_name("Widget");
//!     editor.set_price_text("10");
//!     editor.set_supplier_name("Acme");
//!     editor.set_supplier_phone("555-1234");
//!     editor.increment_quantity();
//!
//!     if let SaveOutcome::Inserted(address) = editor.save().await {
//!         let records = gateway.query_records(&address).await?;
//!         assert_eq!(records.len(), 1);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `stockroom::core` - field sets, records, filters and validation
//! - `stockroom::store` - the storage trait, SQLite and in-memory stores

pub mod address;
pub mod config;
pub mod counter;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod notice;
pub mod notify;

// Re-export component crates
pub use stockroom_core as core;
pub use stockroom_store as store;

// Re-export main types for convenience
pub use address::{Address, AddressMatcher, ContentType, Route};
pub use config::GatewayConfig;
pub use counter::{CounterStep, QuantityCounter};
pub use editor::{
    DeleteOutcome, Draft, EditorController, EditorMode, Navigation, NavigationKind, PendingDelete,
    PendingDiscard, SaveOutcome,
};
pub use error::{EditorError, GatewayError, Result};
pub use gateway::Gateway;
pub use notice::Notice;
pub use notify::{ChangeObserver, ObserverId, ObserverRegistry};

// Re-export commonly used core types
pub use stockroom_core::{
    Column, FieldSet, Filter, InventoryRecord, ItemId, Projection, Row, SortOrder, Value,
};
