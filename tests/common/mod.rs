#![allow(dead_code)]

use async_trait::async_trait;
use orderflow::application::audit::OrderAuditService;
use orderflow::application::ordering::{CreateOrderCommand, CreateOrderItem, CreateOrderService};
use orderflow::application::status::StatusTransitionService;
use orderflow::config::LogSettings;
use orderflow::domain::audit::AuditLogEntry;
use orderflow::domain::catalog::{CatalogProduct, ProductId};
use orderflow::domain::history::StatusHistoryEntry;
use orderflow::domain::lock::LockedOrder;
use orderflow::domain::order::{MemberId, Order, OrderId, OrderStatus};
use orderflow::domain::ports::{AuditLogStore, HistoryLog, OrderStore};
use orderflow::error::{OrderError, Result};
use orderflow::infrastructure::in_memory::{
    InMemoryAuditLog, InMemoryHistoryLog, InMemoryOrderStore, InMemoryProductCatalog,
};
use rust_decimal_macros::dec;
use std::time::Duration;

pub const TUMBLER: ProductId = ProductId::new(1);
pub const COASTER: ProductId = ProductId::new(2);
pub const MEMBER: MemberId = MemberId::new(101);

pub fn init_tracing() {
    orderflow::telemetry::init(&LogSettings {
        filter: "warn".to_string(),
        json: false,
    });
}

pub async fn catalog() -> InMemoryProductCatalog {
    let catalog = InMemoryProductCatalog::new();
    catalog
        .save(CatalogProduct::new(TUMBLER, "Tumbler", dec!(10000)))
        .await;
    catalog
        .save(CatalogProduct::new(COASTER, "Coaster", dec!(2000)))
        .await;
    catalog
}

/// Places a single-line order for `quantity` tumblers and returns its id.
pub async fn place_order(catalog: &InMemoryProductCatalog, orders: &InMemoryOrderStore, quantity: u32) -> OrderId {
    let service = CreateOrderService::new(Box::new(catalog.clone()), Box::new(orders.clone()));
    service
        .create(CreateOrderCommand {
            member_id: MEMBER,
            items: vec![CreateOrderItem {
                product_id: TUMBLER,
                quantity,
            }],
        })
        .await
        .unwrap()
        .order_id
}

/// In-memory collaborators shared between a transition service and the test.
pub struct Harness {
    pub orders: InMemoryOrderStore,
    pub history: InMemoryHistoryLog,
    pub audit_log: InMemoryAuditLog,
    pub order_id: OrderId,
}

impl Harness {
    /// One placed order in the `Created` status.
    pub async fn new() -> Self {
        init_tracing();
        let orders = InMemoryOrderStore::new();
        let order_id = place_order(&catalog().await, &orders, 1).await;
        Self {
            orders,
            history: InMemoryHistoryLog::new(),
            audit_log: InMemoryAuditLog::new(),
            order_id,
        }
    }

    pub fn service(&self) -> StatusTransitionService {
        StatusTransitionService::new(Box::new(self.orders.clone()), Box::new(self.history.clone()))
    }

    pub fn audited_service(&self) -> StatusTransitionService {
        self.service()
            .with_audit(OrderAuditService::new(Box::new(self.audit_log.clone())))
    }

    pub async fn stored_status(&self) -> OrderStatus {
        self.orders
            .find_by_id(self.order_id)
            .await
            .unwrap()
            .unwrap()
            .status()
    }
}

pub struct FailingHistoryLog;

#[async_trait]
impl HistoryLog for FailingHistoryLog {
    async fn append(&self, _entry: StatusHistoryEntry) -> Result<()> {
        Err(OrderError::StorageError("history save failed".to_string()))
    }

    async fn by_order_id(&self, _order_id: OrderId) -> Result<Vec<StatusHistoryEntry>> {
        Ok(Vec::new())
    }
}

/// History log that waits `delay` before every append.
#[derive(Clone)]
pub struct SlowHistoryLog {
    pub inner: InMemoryHistoryLog,
    pub delay: Duration,
}

#[async_trait]
impl HistoryLog for SlowHistoryLog {
    async fn append(&self, entry: StatusHistoryEntry) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.append(entry).await
    }

    async fn by_order_id(&self, order_id: OrderId) -> Result<Vec<StatusHistoryEntry>> {
        self.inner.by_order_id(order_id).await
    }
}

pub struct PanickingHistoryLog;

#[async_trait]
impl HistoryLog for PanickingHistoryLog {
    async fn append(&self, _entry: StatusHistoryEntry) -> Result<()> {
        panic!("history backend crashed");
    }

    async fn by_order_id(&self, _order_id: OrderId) -> Result<Vec<StatusHistoryEntry>> {
        Ok(Vec::new())
    }
}

pub struct FailingAuditLog;

#[async_trait]
impl AuditLogStore for FailingAuditLog {
    async fn append(&self, _entry: AuditLogEntry) -> Result<()> {
        Err(OrderError::AuditFailure("audit log save failed".to_string()))
    }

    async fn by_order_id(&self, _order_id: OrderId) -> Result<Vec<AuditLogEntry>> {
        Ok(Vec::new())
    }
}

/// Order store that refuses to save any snapshot carrying `rejected`.
#[derive(Clone)]
pub struct RejectingOrderStore {
    pub inner: InMemoryOrderStore,
    pub rejected: OrderStatus,
}

#[async_trait]
impl OrderStore for RejectingOrderStore {
    fn next_id(&self) -> OrderId {
        self.inner.next_id()
    }

    async fn save(&self, order: Order) -> Result<()> {
        if order.status() == self.rejected {
            return Err(OrderError::StorageError("order save failed".to_string()));
        }
        self.inner.save(order).await
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>> {
        self.inner.find_by_id(order_id).await
    }

    async fn find_by_id_for_update(&self, order_id: OrderId) -> Result<Option<LockedOrder>> {
        self.inner.find_by_id_for_update(order_id).await
    }

    async fn find_by_member_id(&self, member_id: MemberId) -> Result<Vec<Order>> {
        self.inner.find_by_member_id(member_id).await
    }
}
