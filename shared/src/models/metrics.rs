//! Supplier Metrics Models
//!
//! Derived rows, recomputed on demand from orders/receipts/invoices — they
//! own no identity beyond (supplier, period) and are safe to discard and
//! rebuild at any time.
//!
//! Null-vs-zero convention: ratio/average fields are `Option<f64>` where
//! `None` means "insufficient data"; count fields are plain integers where
//! `0` is a valid measured value. Dashboards rely on this distinction to
//! tell "0%" apart from "not yet measurable".

use serde::{Deserialize, Serialize};

/// Per-supplier, per-period performance metrics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierMetric {
    pub supplier_id: String,
    /// Period key, canonical "YYYY-MM"
    pub period: String,

    // === Volume ===
    #[serde(rename = "totalPOs")]
    pub total_pos: i64,
    pub total_spend: f64,
    /// Expected value of orders issued but not yet fully invoiced
    pub open_balance: f64,

    // === Cycle times (days, None = no qualifying orders) ===
    pub avg_approval_days: Option<f64>,
    pub avg_issue_days: Option<f64>,
    pub avg_receipt_days: Option<f64>,
    pub avg_invoice_throughput_days: Option<f64>,

    // === Ratios (in [0, 1], None = no qualifying data) ===
    pub on_time_ratio: Option<f64>,
    pub fulfillment_ratio: Option<f64>,
    pub invoice_exception_rate: Option<f64>,
    pub variance_rate: Option<f64>,

    // === Raw counts (0 is a valid value, distinct from "no data") ===
    pub invoice_match_count: i64,
    pub invoice_exception_count: i64,
    pub variance_match_count: i64,
}

/// Global roll-up across all supplier rows in scope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierMetricSummary {
    /// Period key, canonical "YYYY-MM"
    pub period: String,
    /// Distinct supplier rows folded into this summary
    pub suppliers: i64,
    #[serde(rename = "totalPOs")]
    pub total_pos: i64,
    pub total_spend: f64,
    pub open_balance: f64,
    /// Means over rows where the field is non-null; None if no row qualifies
    pub avg_on_time_ratio: Option<f64>,
    pub avg_fulfillment_ratio: Option<f64>,
    pub avg_invoice_exception_rate: Option<f64>,
}
