//! Shared setup for integration tests.

use std::sync::Arc;

use stockroom::store::SqliteStore;
use stockroom::{Gateway, GatewayConfig};
use tempfile::TempDir;

/// A gateway over an on-disk SQLite database that lives as long as the
/// harness.
pub struct Harness {
    pub gateway: Arc<Gateway<SqliteStore>>,
    _dir: TempDir,
}

impl Harness {
    pub fn new() -> anyhow::Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let dir = tempfile::tempdir()?;
        let store = SqliteStore::open(dir.path().join("stockroom.db"))?;
        Ok(Self {
            gateway: Arc::new(Gateway::new(store, GatewayConfig::default())),
            _dir: dir,
        })
    }
}
