//! # Stockroom Store
//!
//! Storage abstraction for Stockroom. Provides a trait-based interface over
//! the single `inventories` table with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts row storage behind the [`Store`] trait,
//! allowing the gateway to be storage-agnostic. The primary implementation
//! is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`StoreExt`] - Typed record helpers on top of [`Store`]
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stockroom_store::{SqliteStore, Store, StoreExt};
//! use stockroom_core::{Column, FieldSet};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("stockroom.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let fields = FieldSet::new()
//!         .with(Column::Name, "Widget")
//!         .with(Column::SupplierName, "Acme")
//!         .with(Column::SupplierPhone, "555-1234");
//!     let id = store.insert(&fields).await.unwrap().expect("row created");
//!     let record = store.get_record(id).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Insert sentinel**: a row the table rejects yields `Ok(None)`, not an error
//! - **No validation**: field rules live in `stockroom_core::validation`
//! - **Stable ids**: ids are never reused after a delete

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StoreExt};
