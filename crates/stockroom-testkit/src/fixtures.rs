//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Mutex};

use stockroom::{Address, ChangeObserver, Gateway, GatewayConfig};
use stockroom_core::{Column, FieldSet, InventoryRecord};
use stockroom_store::{MemoryStore, Store};

/// An observer that remembers every address it was told about.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<Address>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses received so far, oldest first.
    pub fn addresses(&self) -> Vec<Address> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl ChangeObserver for RecordingObserver {
    fn changed(&self, address: &Address) {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(address.clone());
    }
}

/// A gateway with a registered [`RecordingObserver`].
pub struct TestFixture<S: Store = MemoryStore> {
    pub gateway: Arc<Gateway<S>>,
    pub observer: Arc<RecordingObserver>,
}

impl TestFixture<MemoryStore> {
    /// Create a fixture over an empty in-memory store.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl<S: Store> TestFixture<S> {
    /// Create a fixture over `store` with the default configuration.
    pub fn with_store(store: S) -> Self {
        let gateway = Arc::new(Gateway::new(store, GatewayConfig::default()));
        let observer = Arc::new(RecordingObserver::new());
        gateway.register_observer(observer.clone());
        Self { gateway, observer }
    }

    pub fn collection(&self) -> Address {
        self.gateway.collection_address()
    }

    /// Insert `fields` and return the new item address.
    ///
    /// Panics if the insert fails; fixtures only seed valid rows.
    pub async fn insert(&self, fields: &FieldSet) -> Address {
        match self.gateway.insert(&self.collection(), fields).await {
            Ok(Some(address)) => address,
            Ok(None) => panic!("store created no row for {:?}", fields),
            Err(e) => panic!("insert failed: {}", e),
        }
    }

    /// Insert every field set in order.
    pub async fn seed(&self, items: &[FieldSet]) -> Vec<Address> {
        let mut addresses = Vec::with_capacity(items.len());
        for fields in items {
            addresses.push(self.insert(fields).await);
        }
        addresses
    }

    /// Every stored record, in id order.
    pub async fn records(&self) -> Vec<InventoryRecord> {
        match self.gateway.query_records(&self.collection()).await {
            Ok(records) => records,
            Err(e) => panic!("query failed: {}", e),
        }
    }
}

impl Default for TestFixture<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

/// The canonical valid item.
pub fn widget() -> FieldSet {
    FieldSet::new()
        .with(Column::Name, "Widget")
        .with(Column::Price, 10)
        .with(Column::Quantity, 5)
        .with(Column::SupplierName, "Acme")
        .with(Column::SupplierPhone, "555-1234")
}

/// Parse seed rows from a JSON array of field sets.
///
/// ```json
/// [{ "name": "Widget", "price": 10, "supplierName": "Acme", "supplierPhone": "1" }]
/// ```
pub fn items_from_json(json: &str) -> serde_json::Result<Vec<FieldSet>> {
    serde_json::from_str(json)
}
