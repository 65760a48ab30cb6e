use crate::domain::order::{Order, OrderId};
use tokio::sync::OwnedMutexGuard;

/// Exclusive lease on one order id.
///
/// Holding the value is proof of ownership. The underlying mutex is released
/// when the lease is dropped, so every exit path (early return, `?`, panic)
/// gives it back exactly once, and only the holder can release it.
#[derive(Debug)]
pub struct OrderLock {
    order_id: OrderId,
    _guard: OwnedMutexGuard<()>,
}

impl OrderLock {
    pub fn new(order_id: OrderId, guard: OwnedMutexGuard<()>) -> Self {
        Self {
            order_id,
            _guard: guard,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Releases the lease now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for OrderLock {
    fn drop(&mut self) {
        tracing::trace!(order_id = %self.order_id, "order lock released");
    }
}

/// An order snapshot read under its exclusive lease ("read for update").
#[derive(Debug)]
pub struct LockedOrder {
    order: Order,
    lock: OrderLock,
}

impl LockedOrder {
    pub fn new(order: Order, lock: OrderLock) -> Self {
        Self { order, lock }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn into_parts(self) -> (Order, OrderLock) {
        (self.order, self.lock)
    }

    pub fn release(self) {
        self.lock.release();
    }
}
