//! Metrics Summary Reducer
//!
//! Folds the per-supplier rows of one scope into a single
//! [`SupplierMetricSummary`] for reporting.

use shared::models::{SupplierMetric, SupplierMetricSummary};

use crate::procurement::money;

/// Fold supplier rows into one summary.
///
/// Sums are plain sums. Ratio averages are means over the rows where the
/// field is non-null — null rows are excluded from both numerator and
/// denominator, never averaged in as zero. If no row qualifies, the summary
/// field is null.
pub fn reduce(period: &str, rows: &[SupplierMetric]) -> SupplierMetricSummary {
    SupplierMetricSummary {
        period: period.to_string(),
        suppliers: rows.len() as i64,
        total_pos: rows.iter().map(|r| r.total_pos).sum(),
        total_spend: money::round_money(rows.iter().map(|r| r.total_spend).sum()),
        open_balance: money::round_money(rows.iter().map(|r| r.open_balance).sum()),
        avg_on_time_ratio: mean_present(rows.iter().map(|r| r.on_time_ratio)),
        avg_fulfillment_ratio: mean_present(rows.iter().map(|r| r.fulfillment_ratio)),
        avg_invoice_exception_rate: mean_present(rows.iter().map(|r| r.invoice_exception_rate)),
    }
}

/// Mean over present values; None when every value is absent
fn mean_present<I>(values: I) -> Option<f64>
where
    I: Iterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}
