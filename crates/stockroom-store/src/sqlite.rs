//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, ErrorCode};

use stockroom_core::{Column, FieldSet, Filter, ItemId, Projection, Row, SortOrder, Value};

use crate::error::{check_filter, Result, StoreError};
use crate::migration::{self, TABLE};
use crate::traits::Store;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file (and missing parent directories) and runs migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened inventory database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Runtime(format!("mutex poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Runtime(format!("spawn_blocking failed: {}", e)))?
    }
}

/// SQL column name for a field-set column.
fn sql_column(column: Column) -> &'static str {
    match column {
        Column::Id => "id",
        Column::Name => "name",
        Column::Price => "price",
        Column::Quantity => "quantity",
        Column::SupplierName => "supplier_name",
        Column::SupplierPhone => "supplier_phone",
    }
}

fn to_sql(column: Column, value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        // Integer columns get numeric text converted up front so the stored
        // type never depends on SQLite's column affinity rules.
        Value::Text(s) if column.is_integer() => match s.trim().parse::<i64>() {
            Ok(n) => SqlValue::Integer(n),
            Err(_) => SqlValue::Text(s.clone()),
        },
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Integer(n) if column.is_integer() => SqlValue::Integer(*n),
        Value::Integer(n) => SqlValue::Text(n.to_string()),
    }
}

fn from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(n) => Value::Integer(n),
        SqlValue::Real(f) => Value::Integer(f as i64),
        SqlValue::Text(s) => Value::Text(s),
        SqlValue::Blob(b) => Value::Text(String::from_utf8_lossy(&b).into_owned()),
    }
}

/// Compile a filter into a WHERE clause and its positional parameters.
fn compile_filter(filter: &Filter) -> (String, Vec<SqlValue>) {
    if filter.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut clauses = Vec::with_capacity(filter.conditions().len());
    let mut params = Vec::with_capacity(filter.conditions().len());
    for condition in filter.conditions() {
        clauses.push(format!(
            "{} {} ?",
            sql_column(condition.column),
            condition.op.as_sql()
        ));
        params.push(to_sql(condition.column, &condition.value));
    }

    (format!(" WHERE {}", clauses.join(" AND ")), params)
}

fn compile_order(order: Option<SortOrder>) -> String {
    let order = order.unwrap_or_default();
    let direction = if order.descending { "DESC" } else { "ASC" };
    if order.column == Column::Id {
        format!(" ORDER BY id {}", direction)
    } else {
        format!(
            " ORDER BY {} {}, id ASC",
            sql_column(order.column),
            direction
        )
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert(&self, fields: &FieldSet) -> Result<Option<ItemId>> {
        let fields = fields.clone();

        self.run_blocking(move |conn| {
            let sql = if fields.is_empty() {
                format!("INSERT INTO {} DEFAULT VALUES", TABLE)
            } else {
                let columns: Vec<&str> = fields.columns().map(sql_column).collect();
                let placeholders = vec!["?"; columns.len()].join(", ");
                format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    TABLE,
                    columns.join(", "),
                    placeholders
                )
            };
            let params: Vec<SqlValue> = fields.iter().map(|(c, v)| to_sql(c, v)).collect();

            match conn.execute(&sql, params_from_iter(params)) {
                Ok(_) => Ok(Some(ItemId::new(conn.last_insert_rowid()))),
                Err(e) if is_constraint_violation(&e) => {
                    tracing::error!(error = %e, "failed to insert inventory row");
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn select(
        &self,
        projection: &Projection,
        filter: &Filter,
        order: Option<SortOrder>,
    ) -> Result<Vec<Row>> {
        check_filter(filter)?;
        let columns = projection.resolve();
        let filter = filter.clone();

        self.run_blocking(move |conn| {
            let (where_clause, params) = compile_filter(&filter);
            let select_list: Vec<&str> = columns.iter().copied().map(sql_column).collect();
            let sql = format!(
                "SELECT {} FROM {}{}{}",
                select_list.join(", "),
                TABLE,
                where_clause,
                compile_order(order)
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(params), |sql_row| {
                    let mut row = Row::new();
                    for (index, column) in columns.iter().enumerate() {
                        let value: SqlValue = sql_row.get(index)?;
                        row.set(*column, from_sql(value));
                    }
                    Ok(row)
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(rows)
        })
        .await
    }

    async fn update(&self, fields: &FieldSet, filter: &Filter) -> Result<usize> {
        check_filter(filter)?;
        if fields.is_empty() {
            return Ok(0);
        }
        let fields = fields.clone();
        let filter = filter.clone();

        self.run_blocking(move |conn| {
            let assignments: Vec<String> = fields
                .columns()
                .map(|c| format!("{} = ?", sql_column(c)))
                .collect();
            let (where_clause, filter_params) = compile_filter(&filter);
            let sql = format!(
                "UPDATE {} SET {}{}",
                TABLE,
                assignments.join(", "),
                where_clause
            );

            let mut params: Vec<SqlValue> = fields.iter().map(|(c, v)| to_sql(c, v)).collect();
            params.extend(filter_params);

            conn.execute(&sql, params_from_iter(params))
                .map_err(|e| {
                    if is_constraint_violation(&e) {
                        StoreError::Constraint(e.to_string())
                    } else {
                        e.into()
                    }
                })
        })
        .await
    }

    async fn delete(&self, filter: &Filter) -> Result<usize> {
        check_filter(filter)?;
        let filter = filter.clone();

        self.run_blocking(move |conn| {
            let (where_clause, params) = compile_filter(&filter);
            let sql = format!("DELETE FROM {}{}", TABLE, where_clause);
            Ok(conn.execute(&sql, params_from_iter(params))?)
        })
        .await
    }

    async fn count(&self, filter: &Filter) -> Result<usize> {
        check_filter(filter)?;
        let filter = filter.clone();

        self.run_blocking(move |conn| {
            let (where_clause, params) = compile_filter(&filter);
            let sql = format!("SELECT COUNT(*) FROM {}{}", TABLE, where_clause);
            let count: i64 = conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;
    use stockroom_core::Comparison;

    fn widget(name: &str, price: i64) -> FieldSet {
        FieldSet::new()
            .with(Column::Name, name)
            .with(Column::Price, price)
            .with(Column::Quantity, 5)
            .with(Column::SupplierName, "Acme")
            .with(Column::SupplierPhone, "555-1234")
    }

    #[tokio::test]
    async fn test_insert_and_get_record() {
        let store = SqliteStore::open_memory().unwrap();

        let id = store.insert(&widget("Widget", 10)).await.unwrap().unwrap();
        let record = store.get_record(id).await.unwrap().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.name, "Widget");
        assert_eq!(record.price, 10);
        assert_eq!(record.quantity, 5);
        assert_eq!(record.supplier_name, "Acme");
        assert_eq!(record.supplier_phone, "555-1234");
    }

    #[tokio::test]
    async fn test_insert_applies_defaults() {
        let store = SqliteStore::open_memory().unwrap();
        let fields = FieldSet::new()
            .with(Column::Name, "Bolt")
            .with(Column::SupplierName, "Acme")
            .with(Column::SupplierPhone, "1");

        let id = store.insert(&fields).await.unwrap().unwrap();
        let record = store.get_record(id).await.unwrap().unwrap();
        assert_eq!((record.price, record.quantity), (0, 0));
    }

    #[tokio::test]
    async fn test_insert_constraint_returns_none() {
        let store = SqliteStore::open_memory().unwrap();

        let mut fields = widget("Widget", 1);
        fields.put_null(Column::Price);
        assert_eq!(store.insert(&fields).await.unwrap(), None);
        assert_eq!(store.insert(&FieldSet::new()).await.unwrap(), None);
        assert_eq!(store.count(&Filter::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ids_not_reused() {
        let store = SqliteStore::open_memory().unwrap();
        let first = store.insert(&widget("a", 1)).await.unwrap().unwrap();
        store.delete(&Filter::by_id(first)).await.unwrap();
        let second = store.insert(&widget("b", 1)).await.unwrap().unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_projection_and_order() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(&widget("b", 20)).await.unwrap();
        store.insert(&widget("a", 30)).await.unwrap();
        store.insert(&widget("c", 10)).await.unwrap();

        let rows = store
            .select(
                &Projection::columns([Column::Name]),
                &Filter::all(),
                Some(SortOrder::descending(Column::Price)),
            )
            .await
            .unwrap();

        let names: Vec<String> = rows
            .iter()
            .map(|r| r.get(Column::Name).and_then(Value::as_text).unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(rows[0].len(), 1);
        assert!(rows[0].id().is_none());
    }

    #[tokio::test]
    async fn test_update_by_filter() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(&widget("cheap", 5)).await.unwrap();
        store.insert(&widget("pricey", 50)).await.unwrap();

        let changed = store
            .update(
                &FieldSet::new().with(Column::Quantity, 0),
                &Filter::all().and(Column::Price, Comparison::Gt, 10),
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let sold_out = store
            .count(&Filter::all().eq(Column::Quantity, 0))
            .await
            .unwrap();
        assert_eq!(sold_out, 1);
    }

    #[tokio::test]
    async fn test_update_null_is_constraint_error() {
        let store = SqliteStore::open_memory().unwrap();
        let id = store.insert(&widget("a", 1)).await.unwrap().unwrap();

        let mut fields = FieldSet::new();
        fields.put_null(Column::Quantity);
        let err = store.update(&fields, &Filter::by_id(id)).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_delete_counts_rows() {
        let store = SqliteStore::open_memory().unwrap();
        let id = store.insert(&widget("a", 1)).await.unwrap().unwrap();

        assert_eq!(store.delete(&Filter::by_id(ItemId::new(999))).await.unwrap(), 0);
        assert_eq!(store.delete(&Filter::by_id(id)).await.unwrap(), 1);
        assert!(store.get_record(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stock.db");

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            store.insert(&widget("kept", 3)).await.unwrap().unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        let record = store.get_record(id).await.unwrap().unwrap();
        assert_eq!(record.name, "kept");
    }
}
