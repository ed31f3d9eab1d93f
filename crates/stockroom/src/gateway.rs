//! The Gateway: addressed CRUD over the inventory table.
//!
//! Every operation first resolves its address to a [`Route`], validates its
//! input, forwards to the [`Store`], and publishes a change notification
//! when something was written.

use std::sync::Arc;

use stockroom_core::{
    validate_insert, validate_update, FieldSet, Filter, InventoryRecord, ItemId, Projection, Row,
    SortOrder,
};
use stockroom_store::Store;

use crate::address::{Address, AddressMatcher, ContentType, Route};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::notify::{ChangeObserver, ObserverId, ObserverRegistry};

/// The record store gateway.
///
/// Holds no mutable state of its own beyond the observer registry; the
/// store serializes access to the table.
pub struct Gateway<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Address routing table.
    matcher: AddressMatcher,
    /// Change observers and subscribers.
    observers: ObserverRegistry,
    /// Configuration.
    config: GatewayConfig,
}

impl<S: Store> Gateway<S> {
    /// Create a new gateway over `store`.
    pub fn new(store: S, config: GatewayConfig) -> Self {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create a gateway over a store shared with other owners.
    pub fn with_shared_store(store: Arc<S>, config: GatewayConfig) -> Self {
        Self {
            store,
            matcher: AddressMatcher::new(config.authority.clone(), config.collection.clone()),
            observers: ObserverRegistry::new(config.notification_capacity),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn matcher(&self) -> &AddressMatcher {
        &self.matcher
    }

    /// Address of the whole collection.
    pub fn collection_address(&self) -> Address {
        self.matcher.collection_address()
    }

    /// Address of one row.
    pub fn item_address(&self, id: ItemId) -> Address {
        self.matcher.item_address(id)
    }

    /// The observer registry.
    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    /// Register a change observer.
    pub fn register_observer(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        self.observers.register(observer)
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Address> {
        self.observers.subscribe()
    }

    fn route(&self, address: &Address) -> Result<Route> {
        let route = self
            .matcher
            .resolve(address)
            .ok_or_else(|| GatewayError::UnsupportedAddress(address.clone()))?;
        tracing::debug!(%address, ?route, "resolved address");
        Ok(route)
    }

    /// The filter an operation runs with. Item addresses always target
    /// exactly their own row, whatever the caller passed.
    fn effective_filter(route: Route, filter: Option<&Filter>) -> Filter {
        match route {
            Route::Collection => filter.cloned().unwrap_or_default(),
            Route::Item(id) => Filter::by_id(id),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Query rows at `address`.
    pub async fn query(
        &self,
        address: &Address,
        projection: &Projection,
        filter: Option<&Filter>,
        sort: Option<SortOrder>,
    ) -> Result<Vec<Row>> {
        let route = self.route(address)?;
        let filter = Self::effective_filter(route, filter);
        Ok(self.store.select(projection, &filter, sort).await?)
    }

    /// Query complete records at `address`, in id order.
    pub async fn query_records(&self, address: &Address) -> Result<Vec<InventoryRecord>> {
        let rows = self.query(address, &Projection::All, None, None).await?;
        rows.iter()
            .map(|row| {
                InventoryRecord::from_row(row)
                    .map_err(|e| GatewayError::Store(stockroom_store::StoreError::from(e)))
            })
            .collect()
    }

    /// MIME type of the data at `address`.
    pub fn content_type(&self, address: &Address) -> Result<ContentType> {
        let route = self.route(address)?;
        Ok(self.matcher.content_type(route))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a new row at the collection address.
    ///
    /// # Returns
    /// - `Some(item address)` of the new row.
    /// - `None` when the store created no row. Callers must check for it.
    pub async fn insert(&self, address: &Address, fields: &FieldSet) -> Result<Option<Address>> {
        match self.route(address)? {
            Route::Collection => {}
            Route::Item(_) => {
                return Err(GatewayError::UnsupportedOperation {
                    operation: "insert",
                    address: address.clone(),
                })
            }
        }

        validate_insert(fields)?;

        let Some(id) = self.store.insert(fields).await? else {
            tracing::error!(%address, "failed to insert row");
            return Ok(None);
        };

        self.observers.notify(address);
        tracing::info!(%id, "inserted inventory row");
        Ok(Some(self.matcher.item_address(id)))
    }

    /// Update rows at `address`.
    ///
    /// Only the fields present are validated and written. Returns the number
    /// of rows changed.
    pub async fn update(
        &self,
        address: &Address,
        fields: &FieldSet,
        filter: Option<&Filter>,
    ) -> Result<usize> {
        let route = self.route(address)?;

        validate_update(fields)?;

        if fields.is_empty() {
            return Ok(0);
        }

        let filter = Self::effective_filter(route, filter);
        let changed = self.store.update(fields, &filter).await?;

        if changed > 0 {
            self.observers.notify(address);
            tracing::info!(%address, changed, "updated inventory rows");
        }
        Ok(changed)
    }

    /// Delete rows at `address`. Returns the number of rows removed.
    pub async fn delete(&self, address: &Address, filter: Option<&Filter>) -> Result<usize> {
        let route = self.route(address)?;
        let filter = Self::effective_filter(route, filter);

        let deleted = self.store.delete(&filter).await?;

        if deleted > 0 {
            self.observers.notify(address);
            tracing::info!(%address, deleted, "deleted inventory rows");
        }
        Ok(deleted)
    }
}
