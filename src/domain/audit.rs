use crate::domain::order::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    Success,
    Failure,
}

/// Out-of-band record of a status change attempt.
///
/// Not tied to the order aggregate: a failed attempt still leaves an entry,
/// and a successful transition may have none if recording failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub order_id: OrderId,
    pub outcome: AuditOutcome,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(order_id: OrderId, outcome: AuditOutcome, message: impl Into<String>) -> Self {
        Self {
            order_id,
            outcome,
            message: message.into(),
            recorded_at: Utc::now(),
        }
    }
}
