use crate::domain::order::{MemberId, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committed status transition. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub order_id: OrderId,
    pub from_status: OrderStatus,
    pub to_status: OrderStatus,
    /// Who requested the change, when known.
    pub changed_by: Option<MemberId>,
    pub changed_at: DateTime<Utc>,
}

impl StatusHistoryEntry {
    pub fn new(
        order_id: OrderId,
        from_status: OrderStatus,
        to_status: OrderStatus,
        changed_by: Option<MemberId>,
    ) -> Self {
        Self {
            order_id,
            from_status,
            to_status,
            changed_by,
            changed_at: Utc::now(),
        }
    }
}
