use crate::application::audit::{AuditChannel, OrderAuditService};
use crate::domain::history::StatusHistoryEntry;
use crate::domain::order::{MemberId, Order, OrderId, OrderStatus};
use crate::domain::ports::{HistoryLog, HistoryLogBox, OrderStore, OrderStoreBox};
use crate::error::{OrderError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, instrument, warn};

/// Request to move an order to `target_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeStatusCommand {
    pub order_id: OrderId,
    pub target_status: OrderStatus,
    pub changed_by: Option<MemberId>,
}

impl ChangeStatusCommand {
    pub fn new(order_id: OrderId, target_status: OrderStatus) -> Self {
        Self {
            order_id,
            target_status,
            changed_by: None,
        }
    }

    /// Attributes the change to `actor` in the status history.
    pub fn changed_by(mut self, actor: MemberId) -> Self {
        self.changed_by = Some(actor);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStatusResult {
    pub order_id: OrderId,
    /// `false` when the order already had the requested status.
    pub changed: bool,
    pub current_status: OrderStatus,
}

/// Changes order statuses one order at a time.
///
/// Each change runs under the order's exclusive lease: read, decide, write the
/// new snapshot, append history. If the history append fails the previous
/// snapshot is written back. Audit records go to a separate, best-effort
/// channel. The lease is released on every exit path.
///
/// Once the lease is taken the rest of the change runs on its own task, so a
/// caller that stops waiting (timeout, `select!`, aborted task) cannot leave a
/// written status without its history entry or rollback.
pub struct StatusTransitionService {
    window: TransitionWindow,
}

/// Ports needed while an order's lease is held. Cheap to clone into a task.
#[derive(Clone)]
struct TransitionWindow {
    orders: Arc<dyn OrderStore>,
    history: Arc<dyn HistoryLog>,
    audit: Arc<AuditChannel>,
}

impl StatusTransitionService {
    /// Creates a service without an audit log.
    pub fn new(orders: OrderStoreBox, history: HistoryLogBox) -> Self {
        Self {
            window: TransitionWindow {
                orders: Arc::from(orders),
                history: Arc::from(history),
                audit: Arc::new(AuditChannel::Disabled),
            },
        }
    }

    /// Reports every attempt to `audit`.
    pub fn with_audit(mut self, audit: OrderAuditService) -> Self {
        self.window.audit = Arc::new(AuditChannel::Enabled(audit));
        self
    }

    pub async fn change(
        &self,
        order_id: OrderId,
        target_status: OrderStatus,
    ) -> Result<ChangeStatusResult> {
        self.execute(ChangeStatusCommand::new(order_id, target_status))
            .await
    }

    #[instrument(
        skip(self, command),
        fields(order_id = %command.order_id, target = %command.target_status)
    )]
    pub async fn execute(&self, command: ChangeStatusCommand) -> Result<ChangeStatusResult> {
        let order_id = command.order_id;
        let locked = self
            .window
            .orders
            .find_by_id_for_update(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        let window = self.window.clone();
        tokio::spawn(
            async move {
                let (order, lock) = locked.into_parts();
                let outcome = window.apply(&order, &command).await;
                lock.release();
                outcome
            }
            .in_current_span(),
        )
        .await
        .map_err(|e| {
            OrderError::transition(
                order_id,
                OrderError::StorageError(format!("status change task failed: {e}")),
            )
        })?
    }

    /// Status history of `order_id`, oldest first.
    pub async fn history_for(&self, order_id: OrderId) -> Result<Vec<StatusHistoryEntry>> {
        self.window.history.by_order_id(order_id).await
    }
}

impl TransitionWindow {
    async fn apply(&self, order: &Order, command: &ChangeStatusCommand) -> Result<ChangeStatusResult> {
        let current = order.status();
        if current == command.target_status {
            debug!(status = %current, "order already in requested status");
            return Ok(ChangeStatusResult {
                order_id: order.id(),
                changed: false,
                current_status: current,
            });
        }

        if let Err(e) = self.orders.save(order.with_status(command.target_status)).await {
            return Err(self.fail(order.id(), e).await);
        }

        let entry = StatusHistoryEntry::new(
            order.id(),
            current,
            command.target_status,
            command.changed_by,
        );
        if let Err(e) = self.append_history(entry).await {
            self.compensate(order).await;
            return Err(self.fail(order.id(), e).await);
        }

        self.audit.success(order.id(), command.target_status).await;
        info!(from = %current, to = %command.target_status, "order status changed");

        Ok(ChangeStatusResult {
            order_id: order.id(),
            changed: true,
            current_status: command.target_status,
        })
    }

    /// Appends on a separate task so a panicking history log surfaces as an
    /// error and still reaches the rollback.
    async fn append_history(&self, entry: StatusHistoryEntry) -> Result<()> {
        let history = self.history.clone();
        match tokio::spawn(async move { history.append(entry).await }).await {
            Ok(appended) => appended,
            Err(e) => Err(OrderError::StorageError(format!(
                "history append aborted: {e}"
            ))),
        }
    }

    /// Writes `original` back after the new status was stored but its history
    /// entry could not be appended.
    async fn compensate(&self, original: &Order) {
        match self.orders.save(original.clone()).await {
            Ok(()) => {
                warn!(
                    order_id = %original.id(),
                    restored = %original.status(),
                    "status change rolled back"
                );
            }
            Err(e) => {
                error!(
                    order_id = %original.id(),
                    error = %e,
                    "rollback failed, stored status has no history entry"
                );
            }
        }
    }

    async fn fail(&self, order_id: OrderId, cause: OrderError) -> OrderError {
        self.audit
            .failure(order_id, &format!("status change failed: {cause}"))
            .await;
        OrderError::transition(order_id, cause)
    }
}
