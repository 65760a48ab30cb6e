use crate::domain::audit::AuditLogEntry;
use crate::domain::catalog::{CatalogProduct, ProductId};
use crate::domain::history::StatusHistoryEntry;
use crate::domain::lock::LockedOrder;
use crate::domain::order::{MemberId, Order, OrderId};
use crate::domain::ports::{AuditLogStore, HistoryLog, OrderStore, ProductCatalog};
use crate::error::{OrderError, Result};
use crate::infrastructure::keyed_lock::KeyedLocks;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for orders.
///
/// Orders are immutable snapshots, so reads hand out clones and writes replace
/// the whole value. Each order id has its own lease in a [`KeyedLocks`]
/// registry, used by [`OrderStore::find_by_id_for_update`].
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    sequence: Arc<AtomicU64>,
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    locks: KeyedLocks,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the lease for `order_id` is currently held by anyone.
    pub async fn is_locked(&self, order_id: OrderId) -> bool {
        self.locks.is_locked(order_id).await
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    fn next_id(&self) -> OrderId {
        OrderId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn save(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id(), order);
        Ok(())
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn find_by_id_for_update(&self, order_id: OrderId) -> Result<Option<LockedOrder>> {
        let lock = self.locks.acquire(order_id).await;
        let order = self.orders.read().await.get(&order_id).cloned();
        match order {
            Some(order) => Ok(Some(LockedOrder::new(order, lock))),
            None => {
                lock.release();
                Ok(None)
            }
        }
    }

    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|order| order.member_id() == member_id)
            .cloned()
            .collect())
    }
}

/// Append-only, per-order status history.
#[derive(Default, Clone)]
pub struct InMemoryHistoryLog {
    entries: Arc<RwLock<HashMap<OrderId, Vec<StatusHistoryEntry>>>>,
}

impl InMemoryHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryLog for InMemoryHistoryLog {
    async fn append(&self, entry: StatusHistoryEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.entry(entry.order_id).or_default().push(entry);
        Ok(())
    }

    async fn by_order_id(&self, order_id: OrderId) -> Result<Vec<StatusHistoryEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&order_id).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryAuditLog {
    entries: Arc<RwLock<HashMap<OrderId, Vec<AuditLogEntry>>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLogStore for InMemoryAuditLog {
    async fn append(&self, entry: AuditLogEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.entry(entry.order_id).or_default().push(entry);
        Ok(())
    }

    async fn by_order_id(&self, order_id: OrderId) -> Result<Vec<AuditLogEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&order_id).cloned().unwrap_or_default())
    }
}

/// Product catalog kept in memory. Prices can change at any time; orders
/// already placed are unaffected because they carry their own snapshots.
#[derive(Default, Clone)]
pub struct InMemoryProductCatalog {
    products: Arc<RwLock<HashMap<ProductId, CatalogProduct>>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn save(&self, product: CatalogProduct) {
        let mut products = self.products.write().await;
        products.insert(product.id, product);
    }

    pub async fn update_price(&self, product_id: ProductId, unit_price: Decimal) -> Result<()> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&product_id)
            .ok_or(OrderError::ProductNotFound(product_id))?;
        product.unit_price = unit_price;
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn find_by_id(&self, product_id: ProductId) -> Result<CatalogProduct> {
        let products = self.products.read().await;
        products
            .get(&product_id)
            .cloned()
            .ok_or(OrderError::ProductNotFound(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::AuditOutcome;
    use crate::domain::order::{OrderItem, OrderStatus, Quantity};
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn sample_order(store: &InMemoryOrderStore, member: u64) -> Order {
        let id = store.next_id();
        Order::new(
            id,
            format!("ORD-{:08}", id.value()),
            MemberId::new(member),
            vec![OrderItem {
                product_id: ProductId::new(1),
                product_name_snapshot: "Tumbler".to_string(),
                unit_price_snapshot: dec!(10000),
                quantity: Quantity::new(1).unwrap(),
            }],
        )
    }

    #[tokio::test]
    async fn test_in_memory_order_store() {
        let store = InMemoryOrderStore::new();
        let order = sample_order(&store, 101);

        store.save(order.clone()).await.unwrap();
        let retrieved = store.find_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(retrieved, order);

        assert!(store.find_by_id(OrderId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_next_id_is_monotonic_and_unique() {
        let store = InMemoryOrderStore::new();
        let ids: Vec<OrderId> = (0..100).map(|_| store.next_id()).collect();

        assert_eq!(ids[0], OrderId::new(1));
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 100);
    }

    #[tokio::test]
    async fn test_snapshot_returned_to_caller_is_isolated() {
        let store = InMemoryOrderStore::new();
        let order = sample_order(&store, 101);
        store.save(order.clone()).await.unwrap();

        let read = store.find_by_id(order.id()).await.unwrap().unwrap();
        let _changed_locally = read.with_status(OrderStatus::Canceled);

        let stored = store.find_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Created);
    }

    #[tokio::test]
    async fn test_find_for_update_holds_lock_until_release() {
        let store = InMemoryOrderStore::new();
        let order = sample_order(&store, 101);
        store.save(order.clone()).await.unwrap();

        let locked = store.find_by_id_for_update(order.id()).await.unwrap().unwrap();
        assert_eq!(locked.order(), &order);
        assert!(store.is_locked(order.id()).await);

        locked.release();
        assert!(!store.is_locked(order.id()).await);
    }

    #[tokio::test]
    async fn test_find_for_update_missing_order_releases_lock() {
        let store = InMemoryOrderStore::new();
        let missing = OrderId::new(42);

        assert!(store.find_by_id_for_update(missing).await.unwrap().is_none());
        assert!(!store.is_locked(missing).await);

        // A second attempt must not block on a leaked lease.
        assert!(store.find_by_id_for_update(missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_member_id() {
        let store = InMemoryOrderStore::new();
        store.save(sample_order(&store, 1)).await.unwrap();
        store.save(sample_order(&store, 1)).await.unwrap();
        store.save(sample_order(&store, 2)).await.unwrap();

        assert_eq!(store.find_by_member_id(MemberId::new(1)).await.unwrap().len(), 2);
        assert_eq!(store.find_by_member_id(MemberId::new(2)).await.unwrap().len(), 1);
        assert!(store.find_by_member_id(MemberId::new(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_log_keeps_append_order() {
        let log = InMemoryHistoryLog::new();
        let id = OrderId::new(1);
        log.append(StatusHistoryEntry::new(id, OrderStatus::Created, OrderStatus::Paid, None))
            .await
            .unwrap();
        log.append(StatusHistoryEntry::new(id, OrderStatus::Paid, OrderStatus::Shipped, None))
            .await
            .unwrap();

        let entries = log.by_order_id(id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].to_status, OrderStatus::Paid);
        assert_eq!(entries[1].to_status, OrderStatus::Shipped);

        assert!(log.by_order_id(OrderId::new(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_log_is_per_order() {
        let log = InMemoryAuditLog::new();
        log.append(AuditLogEntry::new(OrderId::new(1), AuditOutcome::Success, "ok"))
            .await
            .unwrap();

        assert_eq!(log.by_order_id(OrderId::new(1)).await.unwrap().len(), 1);
        assert!(log.by_order_id(OrderId::new(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_price_update() {
        let catalog = InMemoryProductCatalog::new();
        catalog
            .save(CatalogProduct::new(ProductId::new(1), "Tumbler", dec!(10000)))
            .await;

        catalog.update_price(ProductId::new(1), dec!(12000)).await.unwrap();
        let product = catalog.find_by_id(ProductId::new(1)).await.unwrap();
        assert_eq!(product.unit_price, dec!(12000));

        assert!(matches!(
            catalog.update_price(ProductId::new(2), dec!(1)).await,
            Err(OrderError::ProductNotFound(_))
        ));
        assert!(matches!(
            catalog.find_by_id(ProductId::new(2)).await,
            Err(OrderError::ProductNotFound(_))
        ));
    }
}
