use crate::domain::lock::OrderLock;
use crate::domain::order::OrderId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Registry of one exclusive mutex per order id.
///
/// Slots are created lazily on first use and never evicted, so the table grows
/// with the number of distinct ids seen during the process lifetime. Distinct
/// ids never contend with each other; only the registry map itself is shared.
#[derive(Default, Clone)]
pub struct KeyedLocks {
    slots: Arc<RwLock<HashMap<OrderId, Arc<Mutex<()>>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, order_id: OrderId) -> Arc<Mutex<()>> {
        let existing = self.slots.read().await.get(&order_id).cloned();
        if let Some(slot) = existing {
            return slot;
        }

        let mut slots = self.slots.write().await;
        slots.entry(order_id).or_default().clone()
    }

    /// Waits until the lease for `order_id` is free and takes it.
    ///
    /// Waiters are served in arrival order. There is no timeout.
    pub async fn acquire(&self, order_id: OrderId) -> OrderLock {
        let slot = self.slot(order_id).await;
        let guard = slot.lock_owned().await;
        tracing::trace!(%order_id, "order lock acquired");
        OrderLock::new(order_id, guard)
    }

    /// Whether someone currently holds the lease for `order_id`.
    pub async fn is_locked(&self, order_id: OrderId) -> bool {
        let slot = self.slots.read().await.get(&order_id).cloned();
        match slot {
            Some(slot) => slot.try_lock().is_err(),
            None => false,
        }
    }

    /// Number of ids that have a lock slot.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
