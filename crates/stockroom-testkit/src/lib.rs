//! # Stockroom Testkit
//!
//! Testing utilities for Stockroom.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a gateway over a fresh store with a recording observer
//! - **Generators**: Proptest strategies for valid and broken field sets
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use stockroom_core::validate_insert;
//! use stockroom_testkit::generators::ItemParams;
//!
//! proptest! {
//!     #[test]
//!     fn generated_items_validate(params: ItemParams) {
//!         prop_assert!(validate_insert(&params.to_field_set()).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use stockroom_testkit::fixtures::{widget, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let address = fixture.insert(&widget()).await;
//! assert_eq!(fixture.observer.count(), 1);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{items_from_json, widget, RecordingObserver, TestFixture};
pub use generators::{defect, partial_update, Defect, ItemParams};
