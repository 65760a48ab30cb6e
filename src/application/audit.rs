use crate::domain::audit::{AuditLogEntry, AuditOutcome};
use crate::domain::order::{OrderId, OrderStatus};
use crate::domain::ports::AuditLogStoreBox;
use crate::error::Result;

/// Records status change attempts in a separate audit log.
///
/// Entries are persisted independently of the order aggregate and its history.
pub struct OrderAuditService {
    store: AuditLogStoreBox,
}

impl OrderAuditService {
    pub fn new(store: AuditLogStoreBox) -> Self {
        Self { store }
    }

    pub async fn record_status_change_success(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<()> {
        self.store
            .append(AuditLogEntry::new(
                order_id,
                AuditOutcome::Success,
                format!("status changed to {new_status}"),
            ))
            .await
    }

    pub async fn record_status_change_failure(&self, order_id: OrderId, reason: &str) -> Result<()> {
        self.store
            .append(AuditLogEntry::new(order_id, AuditOutcome::Failure, reason))
            .await
    }
}

/// Whether a status transition service reports to an audit log.
///
/// Recording is best-effort: errors are logged and dropped here, so they
/// never reach the caller of the transition.
pub enum AuditChannel {
    Disabled,
    Enabled(OrderAuditService),
}

impl AuditChannel {
    pub(crate) async fn success(&self, order_id: OrderId, new_status: OrderStatus) {
        if let Self::Enabled(audit) = self
            && let Err(e) = audit
                .record_status_change_success(order_id, new_status)
                .await
        {
            tracing::warn!(%order_id, error = %e, "discarding failed audit success record");
        }
    }

    pub(crate) async fn failure(&self, order_id: OrderId, reason: &str) {
        if let Self::Enabled(audit) = self
            && let Err(e) = audit.record_status_change_failure(order_id, reason).await
        {
            tracing::warn!(%order_id, error = %e, "discarding failed audit failure record");
        }
    }
}
