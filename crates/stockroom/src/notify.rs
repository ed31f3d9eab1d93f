//! Change notifications.
//!
//! After every successful mutation the gateway publishes the address it was
//! called with. Delivery is fire-and-forget:
//!
//! - **Observers** registered with [`ObserverRegistry::register`] are called
//!   synchronously, in registration order, on the mutating task
//! - **Subscribers** from [`ObserverRegistry::subscribe`] receive the address
//!   over a broadcast channel; slow subscribers may miss notifications

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use crate::address::Address;

/// Something that wants to hear about changes.
pub trait ChangeObserver: Send + Sync {
    /// Called after data behind `address` changed.
    fn changed(&self, address: &Address);
}

impl<F> ChangeObserver for F
where
    F: Fn(&Address) + Send + Sync,
{
    fn changed(&self, address: &Address) {
        self(address)
    }
}

/// Handle returned by [`ObserverRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// In-process registry of change observers and async subscribers.
pub struct ObserverRegistry {
    observers: RwLock<Vec<(ObserverId, Arc<dyn ChangeObserver>)>>,
    next_id: AtomicU64,
    sender: broadcast::Sender<Address>,
}

impl ObserverRegistry {
    /// Create a registry whose subscribers buffer up to `capacity` addresses.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            sender,
        }
    }

    /// Register an observer.
    pub fn register(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, observer));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    /// Subscribe to notifications published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Address> {
        self.sender.subscribe()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Publish a change to every observer and subscriber.
    ///
    /// Returns how many observers and subscribers were reached.
    pub fn notify(&self, address: &Address) -> usize {
        // Snapshot so observers may (un)register from inside `changed`.
        let observers: Vec<Arc<dyn ChangeObserver>> = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();

        for observer in &observers {
            observer.changed(address);
        }

        let subscribers = self.sender.send(address.clone()).unwrap_or(0);
        tracing::trace!(%address, observers = observers.len(), subscribers, "change published");
        observers.len() + subscribers
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new(64)
    }
}
