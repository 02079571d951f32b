//! Data models
//!
//! Shared between supply-server and frontend (via API).
//! All entity IDs are UUID v4 strings; timestamps are RFC 3339 UTC instants.

pub mod cost_history;
pub mod invoice;
pub mod metrics;
pub mod purchase_order;
pub mod receipt;
pub mod supplier;

// Re-exports
pub use cost_history::*;
pub use invoice::*;
pub use metrics::*;
pub use purchase_order::*;
pub use receipt::*;
pub use supplier::*;
