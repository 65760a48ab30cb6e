use super::audit::AuditLogEntry;
use super::catalog::{CatalogProduct, ProductId};
use super::history::StatusHistoryEntry;
use super::lock::LockedOrder;
use super::order::{MemberId, Order, OrderId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Hands out the next order id. Never repeats a value.
    fn next_id(&self) -> OrderId;
    async fn save(&self, order: Order) -> Result<()>;
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>>;
    /// Waits for the order's exclusive lease and reads it under that lease.
    ///
    /// Returns `None` (with the lease already released) when the order does
    /// not exist.
    async fn find_by_id_for_update(&self, order_id: OrderId) -> Result<Option<LockedOrder>>;
    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Order>>;
}

#[async_trait]
pub trait HistoryLog: Send + Sync {
    async fn append(&self, entry: StatusHistoryEntry) -> Result<()>;
    /// Entries in the order they were appended; empty when none exist.
    async fn by_order_id(&self, order_id: OrderId) -> Result<Vec<StatusHistoryEntry>>;
}

#[async_trait]
pub trait AuditLogStore: Send + Sync {
    async fn append(&self, entry: AuditLogEntry) -> Result<()>;
    async fn by_order_id(&self, order_id: OrderId) -> Result<Vec<AuditLogEntry>>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn find_by_id(&self, product_id: ProductId) -> Result<CatalogProduct>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type HistoryLogBox = Box<dyn HistoryLog>;
pub type AuditLogStoreBox = Box<dyn AuditLogStore>;
pub type ProductCatalogBox = Box<dyn ProductCatalog>;
