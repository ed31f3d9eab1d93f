//! Store trait: the abstract interface for the inventory table.
//!
//! This trait allows the gateway to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use stockroom_core::{FieldSet, Filter, InventoryRecord, ItemId, Projection, Row, SortOrder};

use crate::error::Result;

/// The Store trait: async interface over the single `inventories` table.
///
/// Stores perform no field validation; callers validate first. What a store
/// does enforce is the table shape:
///
/// - `name`, `supplierName` and `supplierPhone` are NOT NULL with no default
/// - `price` and `quantity` are NOT NULL and default to 0
/// - ids are assigned by the store and never reused
///
/// Filters whose values do not fit their columns (a number against `name`,
/// a word against `price`) fail with [`crate::StoreError::InvalidData`] before any
/// row is read or written.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert one row.
    ///
    /// # Returns
    /// - `Some(id)` with the assigned id when a row was created.
    /// - `None` when the table rejected the row (e.g. a NOT NULL column left
    ///   empty). This is a value, not an error.
    async fn insert(&self, fields: &FieldSet) -> Result<Option<ItemId>>;

    /// Select the projected columns of every row matching `filter`.
    ///
    /// Rows come back in `order`, or by ascending id when no order is given.
    async fn select(
        &self,
        projection: &Projection,
        filter: &Filter,
        order: Option<SortOrder>,
    ) -> Result<Vec<Row>>;

    /// Apply `fields` to every row matching `filter`.
    ///
    /// Returns the number of rows changed.
    async fn update(&self, fields: &FieldSet, filter: &Filter) -> Result<usize>;

    /// Delete every row matching `filter`.
    ///
    /// Returns the number of rows removed.
    async fn delete(&self, filter: &Filter) -> Result<usize>;

    /// Count the rows matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<usize>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// Fetch one complete record by id.
    fn get_record(
        &self,
        id: ItemId,
    ) -> impl std::future::Future<Output = Result<Option<InventoryRecord>>> + Send;

    /// Fetch every record matching `filter`, in id order.
    fn list_records(
        &self,
        filter: &Filter,
    ) -> impl std::future::Future<Output = Result<Vec<InventoryRecord>>> + Send;
}

impl<S: Store + ?Sized> StoreExt for S {
    async fn get_record(&self, id: ItemId) -> Result<Option<InventoryRecord>> {
        let rows = self
            .select(&Projection::All, &Filter::by_id(id), None)
            .await?;
        match rows.first() {
            Some(row) => Ok(Some(InventoryRecord::from_row(row)?)),
            None => Ok(None),
        }
    }

    async fn list_records(&self, filter: &Filter) -> Result<Vec<InventoryRecord>> {
        let rows = self.select(&Projection::All, filter, None).await?;
        rows.iter()
            .map(|row| InventoryRecord::from_row(row).map_err(Into::into))
            .collect()
    }
}
