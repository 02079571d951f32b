//! Shared types for the Supply server
//!
//! Data models exchanged between the supply-server and admin frontends:
//! suppliers, purchase orders, receipt/invoice records, cost history and
//! the derived supplier metric rows.

pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
