//! Domain model: order snapshots, history and audit records, and the ports
//! the application layer talks to.

pub mod audit;
pub mod catalog;
pub mod history;
pub mod lock;
pub mod order;
pub mod ports;
