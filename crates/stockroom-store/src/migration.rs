//! Schema migrations for the SQLite store.
//!
//! Migrations are numbered from 1 and applied in order inside one
//! transaction. `schema_migrations` records each applied version.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

/// Name of the inventory table.
pub const TABLE: &str = "inventories";

/// Every migration, oldest first. Entry `n` upgrades to version `n + 1`.
const MIGRATIONS: &[&str] = &[
    // v1: the inventory table.
    r#"
    CREATE TABLE inventories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price INTEGER NOT NULL DEFAULT 0,
        quantity INTEGER NOT NULL DEFAULT 0,
        supplier_name TEXT NOT NULL,
        supplier_phone TEXT NOT NULL
    );
    "#,
    // v2: indexes for the list screen's sort columns.
    r#"
    CREATE INDEX idx_inventories_name ON inventories(name);
    CREATE INDEX idx_inventories_supplier ON inventories(supplier_name);
    "#,
];

/// Schema version after all migrations.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
    )?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if applied > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "schema version {} is newer than this build understands ({})",
            applied, CURRENT_VERSION
        )));
    }
    if applied == CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (index, sql) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
        let version = index as u32 + 1;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, now_millis()],
        )?;
        tracing::debug!(version, "applied schema migration");
    }
    tx.commit()?;

    Ok(())
}

fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
