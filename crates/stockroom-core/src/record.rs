//! Records, field sets and result rows.
//!
//! A [`FieldSet`] is the partial or complete column-to-value mapping a client
//! sends on insert/update. A [`Row`] is what a projected query returns. An
//! [`InventoryRecord`] is the fully-typed view of one complete row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Column, ItemId, Value};

/// Upper bound of the quantity the editor lets a user dial in.
pub const MAX_QUANTITY: u8 = 100;

/// Column-to-value mapping used for insert and update.
///
/// Absent keys mean "not supplied"; an explicit [`Value::Null`] means
/// "supplied as null", which validation treats differently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    values: BTreeMap<Column, Value>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value.
    pub fn put(&mut self, column: Column, value: impl Into<Value>) -> &mut Self {
        self.values.insert(column, value.into());
        self
    }

    /// Builder-style [`put`](Self::put).
    pub fn with(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    /// Supply a column explicitly as null.
    pub fn put_null(&mut self, column: Column) -> &mut Self {
        self.values.insert(column, Value::Null);
        self
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.values.get(&column)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.values.contains_key(&column)
    }

    pub fn remove(&mut self, column: Column) -> Option<Value> {
        self.values.remove(&column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text view of a column; `None` when absent or null.
    pub fn text(&self, column: Column) -> Option<String> {
        self.get(column).and_then(Value::as_text)
    }

    /// Integer view of a column; `None` when absent, null or non-numeric.
    pub fn integer(&self, column: Column) -> Option<i64> {
        self.get(column).and_then(Value::as_integer)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &Value)> {
        self.values.iter().map(|(c, v)| (*c, v))
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.values.keys().copied()
    }
}

impl FromIterator<(Column, Value)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (Column, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = (&'a Column, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, Column, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// One result row of a query, restricted to the projected columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<Column, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: Column, value: impl Into<Value>) {
        self.cells.insert(column, value.into());
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.cells.get(&column)
    }

    /// The row id, if the projection included it.
    pub fn id(&self) -> Option<ItemId> {
        self.get(Column::Id)
            .and_then(Value::as_integer)
            .map(ItemId::new)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.cells.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn required_text(&self, column: Column) -> Result<String, CoreError> {
        self.get(column)
            .ok_or(CoreError::MissingColumn(column))?
            .as_text()
            .ok_or(CoreError::WrongType { column })
    }

    fn required_integer(&self, column: Column) -> Result<i64, CoreError> {
        self.get(column)
            .ok_or(CoreError::MissingColumn(column))?
            .as_integer()
            .ok_or(CoreError::WrongType { column })
    }
}

/// A complete inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: ItemId,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub supplier_name: String,
    pub supplier_phone: String,
}

impl InventoryRecord {
    /// Build a record from a row that carries every column.
    pub fn from_row(row: &Row) -> Result<Self, CoreError> {
        Ok(Self {
            id: ItemId::new(row.required_integer(Column::Id)?),
            name: row.required_text(Column::Name)?,
            price: row.required_integer(Column::Price)?,
            quantity: row.required_integer(Column::Quantity)?,
            supplier_name: row.required_text(Column::SupplierName)?,
            supplier_phone: row.required_text(Column::SupplierPhone)?,
        })
    }

    /// The client-writable fields of this record.
    pub fn to_field_set(&self) -> FieldSet {
        FieldSet::new()
            .with(Column::Name, self.name.as_str())
            .with(Column::Price, self.price)
            .with(Column::Quantity, self.quantity)
            .with(Column::SupplierName, self.supplier_name.as_str())
            .with(Column::SupplierPhone, self.supplier_phone.as_str())
    }

    /// Value of a single column.
    pub fn value(&self, column: Column) -> Value {
        match column {
            Column::Id => Value::Integer(self.id.get()),
            Column::Name => Value::Text(self.name.clone()),
            Column::Price => Value::Integer(self.price),
            Column::Quantity => Value::Integer(self.quantity),
            Column::SupplierName => Value::Text(self.supplier_name.clone()),
            Column::SupplierPhone => Value::Text(self.supplier_phone.clone()),
        }
    }
}

impl TryFrom<&Row> for InventoryRecord {
    type Error = CoreError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Self::from_row(row)
    }
}
