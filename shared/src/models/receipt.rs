//! Receipt Record Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Goods receipt against one order line
///
/// Partial receipts are multiple records against the same order; the
/// reconciler guarantees the cumulative quantity per line never exceeds the
/// ordered quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptRecord {
    pub id: String,
    /// Order reference
    pub order_id: String,
    /// Line reference within the order
    pub line_id: String,
    pub quantity: i32,
    pub received_at: DateTime<Utc>,
}

/// Record receipt payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptCreate {
    pub line_id: String,
    pub quantity: i32,
    pub received_at: DateTime<Utc>,
}
