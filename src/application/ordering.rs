use crate::config::OrderNumberSettings;
use crate::domain::catalog::ProductId;
use crate::domain::order::{MemberId, Order, OrderId, OrderItem, Quantity};
use crate::domain::ports::{OrderStoreBox, ProductCatalogBox};
use crate::error::{OrderError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderCommand {
    pub member_id: MemberId,
    pub items: Vec<CreateOrderItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderResult {
    pub order_id: OrderId,
    pub order_no: String,
    pub total_amount: Decimal,
}

/// Places new orders, freezing catalog names and prices into the order lines.
pub struct CreateOrderService {
    catalog: ProductCatalogBox,
    orders: OrderStoreBox,
    numbering: OrderNumberSettings,
}

impl CreateOrderService {
    pub fn new(catalog: ProductCatalogBox, orders: OrderStoreBox) -> Self {
        Self {
            catalog,
            orders,
            numbering: OrderNumberSettings::default(),
        }
    }

    pub fn with_numbering(mut self, numbering: OrderNumberSettings) -> Self {
        self.numbering = numbering;
        self
    }

    #[instrument(skip(self, command), fields(member_id = %command.member_id))]
    pub async fn create(&self, command: CreateOrderCommand) -> Result<CreateOrderResult> {
        if command.items.is_empty() {
            return Err(OrderError::ValidationError(
                "order items must not be empty".to_string(),
            ));
        }

        let mut snapshots = Vec::with_capacity(command.items.len());
        for item in &command.items {
            let quantity = Quantity::new(item.quantity)?;
            let product = self.catalog.find_by_id(item.product_id).await?;
            snapshots.push(OrderItem {
                product_id: product.id,
                product_name_snapshot: product.name,
                unit_price_snapshot: product.unit_price,
                quantity,
            });
        }

        let order_id = self.orders.next_id();
        let order = Order::new(
            order_id,
            self.numbering.format(order_id),
            command.member_id,
            snapshots,
        );
        let result = CreateOrderResult {
            order_id,
            order_no: order.order_no().to_string(),
            total_amount: order.total_amount(),
        };

        self.orders.save(order).await?;
        info!(%order_id, order_no = %result.order_no, total = %result.total_amount, "order created");

        Ok(result)
    }
}
