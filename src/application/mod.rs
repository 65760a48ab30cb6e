//! Application layer orchestrating the order use cases.
//!
//! `StatusTransitionService` is the core: per-order exclusive leases,
//! idempotent status changes, append-only history with rollback when the
//! append fails, and a best-effort audit channel. Order creation and read
//! queries are thin services over the same ports.

pub mod audit;
pub mod ordering;
pub mod query;
pub mod status;
