//! Typed row selection: filters, sort order and projections.
//!
//! A [`Filter`] is a conjunction of column comparisons. Both store backends
//! interpret it with SQL semantics: a comparison against `NULL` never matches.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::InventoryRecord;
use crate::types::{Column, ItemId, Value};

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// SQL spelling of the operator.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Eq => ordering == Ordering::Equal,
            Comparison::Ne => ordering != Ordering::Equal,
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Le => ordering != Ordering::Greater,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Ge => ordering != Ordering::Less,
        }
    }
}

/// `column <op> value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub column: Column,
    pub op: Comparison,
    pub value: Value,
}

impl Condition {
    pub fn new(column: Column, op: Comparison, value: impl Into<Value>) -> Self {
        Self {
            column,
            op,
            value: value.into(),
        }
    }

    /// Check that the value has the column's type.
    ///
    /// Integer columns take integers or numeric text, text columns take text.
    /// `NULL` is accepted anywhere and never matches.
    pub fn check(&self) -> Result<(), CoreError> {
        let fits = match &self.value {
            Value::Null => true,
            Value::Integer(_) => self.column.is_integer(),
            text @ Value::Text(_) => !self.column.is_integer() || text.as_integer().is_some(),
        };
        if fits {
            Ok(())
        } else {
            Err(CoreError::FilterType {
                column: self.column,
                value: self.value.clone(),
            })
        }
    }

    /// Evaluate against a single cell.
    pub fn matches_value(&self, cell: &Value) -> bool {
        compare_values(cell, &self.value)
            .map(|ordering| self.op.accepts(ordering))
            .unwrap_or(false)
    }
}

/// Conjunction of conditions. The empty filter selects every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// A filter that selects every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// `id = <id>`.
    pub fn by_id(id: ItemId) -> Self {
        Self::all().and(Column::Id, Comparison::Eq, id.get())
    }

    /// Add a condition.
    pub fn and(mut self, column: Column, op: Comparison, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::new(column, op, value));
        self
    }

    pub fn eq(self, column: Column, value: impl Into<Value>) -> Self {
        self.and(column, Comparison::Eq, value)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Check every condition. Stores refuse filters that fail this.
    pub fn check(&self) -> Result<(), CoreError> {
        self.conditions.iter().try_for_each(Condition::check)
    }

    /// Whether a record satisfies every condition.
    pub fn matches(&self, record: &InventoryRecord) -> bool {
        self.conditions
            .iter()
            .all(|c| c.matches_value(&record.value(c.column)))
    }
}

/// Ordering of a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub column: Column,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn descending(column: Column) -> Self {
        Self {
            column,
            descending: true,
        }
    }

    /// Compare two records under this order, falling back to id.
    pub fn compare(&self, a: &InventoryRecord, b: &InventoryRecord) -> Ordering {
        let primary = compare_values(&a.value(self.column), &b.value(self.column))
            .unwrap_or(Ordering::Equal);
        let primary = if self.descending {
            primary.reverse()
        } else {
            primary
        };
        primary.then(a.id.cmp(&b.id))
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::ascending(Column::Id)
    }
}

/// Which columns a query returns. `All` is every column in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    All,
    Columns(Vec<Column>),
}

impl Projection {
    pub fn columns(columns: impl IntoIterator<Item = Column>) -> Self {
        Projection::Columns(columns.into_iter().collect())
    }

    /// The projected columns, in output order, without duplicates.
    pub fn resolve(&self) -> Vec<Column> {
        match self {
            Projection::All => Column::ALL.to_vec(),
            Projection::Columns(columns) => {
                let mut out: Vec<Column> = Vec::with_capacity(columns.len());
                for column in columns {
                    if !out.contains(column) {
                        out.push(*column);
                    }
                }
                out
            }
        }
    }
}

/// SQL-like comparison: integers numerically, text lexically, mixed
/// integer/text by coercing the text, anything involving NULL is unordered.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::Integer(x), text @ Value::Text(_)) => text.as_integer().map(|y| x.cmp(&y)),
        (text @ Value::Text(_), Value::Integer(y)) => text.as_integer().map(|x| x.cmp(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, price: i64) -> InventoryRecord {
        InventoryRecord {
            id: ItemId::new(id),
            name: name.to_string(),
            price,
            quantity: 1,
            supplier_name: "Acme".into(),
            supplier_phone: "555".into(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::all().matches(&record(1, "a", 0)));
    }

    #[test]
    fn test_by_id_filter() {
        let filter = Filter::by_id(ItemId::new(2));
        assert!(filter.matches(&record(2, "a", 0)));
        assert!(!filter.matches(&record(3, "a", 0)));
    }

    #[test]
    fn test_conjunction() {
        let filter = Filter::all()
            .and(Column::Price, Comparison::Ge, 10)
            .eq(Column::Name, "Widget");
        assert!(filter.matches(&record(1, "Widget", 10)));
        assert!(!filter.matches(&record(1, "Widget", 9)));
        assert!(!filter.matches(&record(1, "Gadget", 20)));
    }

    #[test]
    fn test_check_rejects_mismatched_types() {
        let name_vs_number = Filter::all().and(Column::Name, Comparison::Lt, 12);
        assert!(matches!(
            name_vs_number.check(),
            Err(CoreError::FilterType {
                column: Column::Name,
                ..
            })
        ));

        let price_vs_word = Filter::all().and(Column::Price, Comparison::Lt, "abc");
        assert!(matches!(
            price_vs_word.check(),
            Err(CoreError::FilterType {
                column: Column::Price,
                ..
            })
        ));
    }

    #[test]
    fn test_check_accepts_matching_types() {
        let filter = Filter::all()
            .eq(Column::Name, "5")
            .and(Column::Price, Comparison::Ge, " 12 ")
            .and(Column::Quantity, Comparison::Lt, 3)
            .eq(Column::SupplierPhone, Value::Null);
        assert!(filter.check().is_ok());
        assert!(Filter::by_id(ItemId::new(1)).check().is_ok());
    }

    #[test]
    fn test_null_never_matches() {
        let cond = Condition::new(Column::Name, Comparison::Ne, Value::Null);
        assert!(!cond.matches_value(&Value::from("x")));
    }

    #[test]
    fn test_sort_descending_breaks_ties_by_id() {
        let order = SortOrder::descending(Column::Price);
        let mut records = vec![record(1, "a", 5), record(2, "b", 9), record(3, "c", 5)];
        records.sort_by(|a, b| order.compare(a, b));
        let ids: Vec<i64> = records.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_projection_dedups() {
        let projection = Projection::columns([Column::Name, Column::Id, Column::Name]);
        assert_eq!(projection.resolve(), vec![Column::Name, Column::Id]);
        assert_eq!(Projection::All.resolve().len(), 6);
    }
}
