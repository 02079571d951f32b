//! Cost History Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cost change entry - append-only, immutable once written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostHistoryEntry {
    pub id: String,
    /// Inventory item reference
    pub item_id: String,
    pub old_cost: f64,
    pub new_cost: f64,
    pub changed_at: DateTime<Utc>,
}

/// Record cost change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostChangeInput {
    pub item_id: String,
    pub old_cost: f64,
    pub new_cost: f64,
    pub changed_at: DateTime<Utc>,
}
