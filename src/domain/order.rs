use crate::domain::catalog::ProductId;
use crate::error::OrderError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Process-unique identifier of an order, handed out by the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(u64);

impl MemberId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an order.
///
/// No transition graph is enforced: any status may follow any other, and a
/// request for the current status is treated as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Paid,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Created,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strictly positive number of units on an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self, OrderError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(OrderError::ValidationError(format!(
                "quantity must be positive: {value}"
            )))
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = OrderError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One order line, frozen at creation time.
///
/// Name and unit price are copied out of the catalog so later catalog edits
/// never change what the customer was charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name_snapshot: String,
    pub unit_price_snapshot: Decimal,
    pub quantity: Quantity,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price_snapshot * Decimal::from(self.quantity.value())
    }
}

/// Immutable snapshot of an order aggregate.
///
/// Every status change produces a new value through [`Order::with_status`];
/// the item list is shared behind an `Arc<[OrderItem]>` and can never be
/// mutated once the order exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_no: String,
    member_id: MemberId,
    status: OrderStatus,
    items: Arc<[OrderItem]>,
}

impl Order {
    /// Creates a freshly placed order in the `Created` status.
    pub fn new(id: OrderId, order_no: String, member_id: MemberId, items: Vec<OrderItem>) -> Self {
        Self {
            id,
            order_no,
            member_id,
            status: OrderStatus::Created,
            items: items.into(),
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_no(&self) -> &str {
        &self.order_no
    }

    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns a new snapshot carrying `status`; `self` is left untouched.
    pub fn with_status(&self, status: OrderStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Order total computed from the price snapshots.
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}
