use crate::domain::catalog::ProductId;
use crate::domain::order::OrderId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("order not found: {0}")]
    NotFound(OrderId),
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("status change failed for order {order_id}: {source}")]
    TransitionFailure {
        order_id: OrderId,
        #[source]
        source: Box<OrderError>,
    },
    #[error("Audit error: {0}")]
    AuditFailure(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl OrderError {
    pub(crate) fn transition(order_id: OrderId, source: OrderError) -> Self {
        Self::TransitionFailure {
            order_id,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;
