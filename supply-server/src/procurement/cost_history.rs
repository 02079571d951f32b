//! Cost History Tracker
//!
//! Append-only log of inventory item cost changes. Write-once: entries are
//! never mutated or deleted. Consumed for audit/inspection by reporting;
//! deliberately not an input to the metrics aggregation.

use std::sync::Arc;

use uuid::Uuid;

use shared::models::{CostChangeInput, CostHistoryEntry};

use crate::store::RecordStore;

use super::error::{ProcurementError, ProcurementResult};
use super::money;

/// Hard ceiling on history reads
pub const HISTORY_LIMIT_MAX: usize = 20;

/// Cost change tracker over the record store
pub struct CostHistoryTracker {
    store: Arc<dyn RecordStore>,
}

impl CostHistoryTracker {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Append a cost change entry
    pub async fn record_change(&self, input: CostChangeInput) -> ProcurementResult<CostHistoryEntry> {
        if input.item_id.trim().is_empty() {
            return Err(ProcurementError::Validation(
                "item_id must not be empty".to_string(),
            ));
        }
        money::require_finite(input.old_cost, "old_cost")?;
        money::require_finite(input.new_cost, "new_cost")?;
        if input.new_cost < 0.0 {
            return Err(ProcurementError::Validation(format!(
                "new_cost must not be negative, got {}",
                input.new_cost
            )));
        }

        let entry = CostHistoryEntry {
            id: Uuid::new_v4().to_string(),
            item_id: input.item_id,
            old_cost: input.old_cost,
            new_cost: input.new_cost,
            changed_at: input.changed_at,
        };
        let entry = self.store.append_cost_history(entry).await?;
        tracing::debug!(
            item_id = %entry.item_id,
            old_cost = entry.old_cost,
            new_cost = entry.new_cost,
            "Cost change recorded"
        );
        Ok(entry)
    }

    /// Most recent entries for an item, newest first.
    /// `limit` is clamped to [`HISTORY_LIMIT_MAX`].
    pub async fn history(
        &self,
        item_id: &str,
        limit: usize,
    ) -> ProcurementResult<Vec<CostHistoryEntry>> {
        let limit = limit.min(HISTORY_LIMIT_MAX);
        Ok(self.store.read_cost_history(item_id, limit).await?)
    }
}
