//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use stockroom_core::{
    Column, FieldSet, Filter, InventoryRecord, ItemId, Projection, Row, SortOrder, Value,
};

use crate::error::{check_filter, Result, StoreError};
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Rows indexed by id.
    rows: BTreeMap<ItemId, InventoryRecord>,

    /// Highest id ever handed out. Ids are never reused.
    last_id: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Runtime(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Runtime(format!("lock poisoned: {}", e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a value cannot be stored in a column.
enum Rejection {
    /// NOT NULL column left null or without a default.
    Constraint(Column),
    /// Value has no representation in the column's type.
    Type(Column),
}

fn text_cell(column: Column, value: Option<&Value>) -> std::result::Result<String, Rejection> {
    value
        .and_then(Value::as_text)
        .ok_or(Rejection::Constraint(column))
}

fn integer_cell(column: Column, value: Option<&Value>) -> std::result::Result<i64, Rejection> {
    match value {
        None => Ok(0),
        Some(Value::Null) => Err(Rejection::Constraint(column)),
        Some(v) => v.as_integer().ok_or(Rejection::Type(column)),
    }
}

fn build_record(id: ItemId, fields: &FieldSet) -> std::result::Result<InventoryRecord, Rejection> {
    Ok(InventoryRecord {
        id,
        name: text_cell(Column::Name, fields.get(Column::Name))?,
        price: integer_cell(Column::Price, fields.get(Column::Price))?,
        quantity: integer_cell(Column::Quantity, fields.get(Column::Quantity))?,
        supplier_name: text_cell(Column::SupplierName, fields.get(Column::SupplierName))?,
        supplier_phone: text_cell(Column::SupplierPhone, fields.get(Column::SupplierPhone))?,
    })
}

fn apply_fields(
    record: &InventoryRecord,
    fields: &FieldSet,
) -> std::result::Result<InventoryRecord, Rejection> {
    let mut updated = record.clone();
    for (column, value) in fields.iter() {
        match column {
            // Row ids are fixed once assigned.
            Column::Id => return Err(Rejection::Constraint(column)),
            Column::Name => updated.name = text_cell(column, Some(value))?,
            Column::Price => updated.price = integer_cell(column, Some(value))?,
            Column::Quantity => updated.quantity = integer_cell(column, Some(value))?,
            Column::SupplierName => updated.supplier_name = text_cell(column, Some(value))?,
            Column::SupplierPhone => updated.supplier_phone = text_cell(column, Some(value))?,
        }
    }
    Ok(updated)
}

fn project(record: &InventoryRecord, columns: &[Column]) -> Row {
    let mut row = Row::new();
    for column in columns {
        row.set(*column, record.value(*column));
    }
    row
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, fields: &FieldSet) -> Result<Option<ItemId>> {
        let mut inner = self.write()?;

        let id = ItemId::new(inner.last_id + 1);
        match build_record(id, fields) {
            Ok(record) => {
                inner.last_id = id.get();
                inner.rows.insert(id, record);
                Ok(Some(id))
            }
            Err(Rejection::Constraint(column)) => {
                tracing::error!(%column, "failed to insert inventory row: NOT NULL constraint");
                Ok(None)
            }
            Err(Rejection::Type(column)) => Err(StoreError::InvalidData(format!(
                "column {} expects an integer",
                column
            ))),
        }
    }

    async fn select(
        &self,
        projection: &Projection,
        filter: &Filter,
        order: Option<SortOrder>,
    ) -> Result<Vec<Row>> {
        check_filter(filter)?;
        let inner = self.read()?;
        let columns = projection.resolve();

        let mut matched: Vec<&InventoryRecord> =
            inner.rows.values().filter(|r| filter.matches(r)).collect();
        let order = order.unwrap_or_default();
        matched.sort_by(|a, b| order.compare(a, b));

        Ok(matched.into_iter().map(|r| project(r, &columns)).collect())
    }

    async fn update(&self, fields: &FieldSet, filter: &Filter) -> Result<usize> {
        check_filter(filter)?;
        if fields.is_empty() {
            return Ok(0);
        }
        let mut inner = self.write()?;

        // Build every new row before touching the table so a rejected value
        // leaves no partial update behind.
        let mut replacements = Vec::new();
        for record in inner.rows.values().filter(|r| filter.matches(r)) {
            match apply_fields(record, fields) {
                Ok(updated) => replacements.push((record.id, updated)),
                Err(Rejection::Constraint(column)) => {
                    return Err(StoreError::Constraint(format!(
                        "NOT NULL constraint failed: {}",
                        column
                    )))
                }
                Err(Rejection::Type(column)) => {
                    return Err(StoreError::InvalidData(format!(
                        "column {} expects an integer",
                        column
                    )))
                }
            }
        }

        let changed = replacements.len();
        for (id, record) in replacements {
            inner.rows.insert(id, record);
        }
        Ok(changed)
    }

    async fn delete(&self, filter: &Filter) -> Result<usize> {
        check_filter(filter)?;
        let mut inner = self.write()?;
        let before = inner.rows.len();
        inner.rows.retain(|_, r| !filter.matches(r));
        Ok(before - inner.rows.len())
    }

    async fn count(&self, filter: &Filter) -> Result<usize> {
        check_filter(filter)?;
        let inner = self.read()?;
        Ok(inner.rows.values().filter(|r| filter.matches(r)).count())
    }
}
