use crate::domain::order::{MemberId, Order, OrderId, OrderStatus};
use crate::domain::ports::OrderStoreBox;
use crate::error::{OrderError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub order_no: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id(),
            order_no: order.order_no().to_string(),
            status: order.status(),
            total_amount: order.total_amount(),
        }
    }
}

/// Read-only order lookups. Never takes an order lease.
pub struct OrderQueryService {
    orders: OrderStoreBox,
}

impl OrderQueryService {
    pub fn new(orders: OrderStoreBox) -> Self {
        Self { orders }
    }

    /// Summaries of a member's orders, newest first.
    pub async fn summaries_for_member(&self, member_id: MemberId) -> Result<Vec<OrderSummary>> {
        let mut orders = self.orders.find_by_member_id(member_id).await?;
        orders.sort_by_key(|order| std::cmp::Reverse(order.id()));
        Ok(orders.iter().map(OrderSummary::from).collect())
    }

    pub async fn order(&self, order_id: OrderId) -> Result<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))
    }
}
