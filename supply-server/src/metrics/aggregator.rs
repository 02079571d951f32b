//! Supplier Metrics Aggregator
//!
//! Rolls orders/receipts/invoices up into per-supplier, per-period rows.
//! The aggregator holds no incremental state: every run recomputes from a
//! single consistent snapshot of the record store, so recomputing the same
//! (supplier, period) scope over the same records is bit-identical and a
//! half-finished run never becomes visible.
//!
//! 指标窗口 (详见 DESIGN.md)：
//! - 创建日期在期间内的订单 → 量/金额/周期均值/履约率/差异率
//! - 全收货日期在期间内的订单 → 准时率
//! - 发票日期在期间内的发票 → 发票异常率与计数
//!
//! Null-vs-zero: ratios and averages are `None` when no sample qualifies;
//! counts are zero. The two are never conflated.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use shared::models::{
    InvoiceMatchStatus, PurchaseOrderStatus as Status, SupplierMetric, SupplierMetricSummary,
};

use crate::procurement::reconcile::{self, ReconcileConfig};
use crate::procurement::money;
use crate::store::{OrderFilter, OrderRecords, RecordStore};
use crate::utils::time;
use crate::utils::{AppError, AppResult};

use super::summary;

/// Read-side metrics service
pub struct MetricsService {
    store: Arc<dyn RecordStore>,
    cfg: ReconcileConfig,
    tz: Tz,
}

impl MetricsService {
    pub fn new(store: Arc<dyn RecordStore>, cfg: ReconcileConfig, tz: Tz) -> Self {
        Self { store, cfg, tz }
    }

    /// Per-supplier rows for a period; restricted to one supplier when
    /// `supplier_id` is given (that supplier then always gets a row, even a
    /// fully empty one).
    pub async fn supplier_metrics(
        &self,
        period: &str,
        supplier_id: Option<&str>,
    ) -> AppResult<Vec<SupplierMetric>> {
        let (start, end) = time::period_bounds(period, self.tz)?;

        let filter = match supplier_id {
            Some(id) => {
                self.store
                    .get_supplier(id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Supplier {} not found", id)))?;
                OrderFilter::for_supplier(id)
            }
            None => OrderFilter::default(),
        };
        // One snapshot for the whole scope
        let records = self.store.load_order_records(&filter).await?;

        let mut by_supplier: BTreeMap<String, Vec<&OrderRecords>> = BTreeMap::new();
        if let Some(id) = supplier_id {
            by_supplier.insert(id.to_string(), Vec::new());
        }
        for record in &records {
            by_supplier
                .entry(record.order.supplier_id.clone())
                .or_default()
                .push(record);
        }

        let rows = by_supplier
            .into_iter()
            .map(|(sid, recs)| compute_supplier_metric(&sid, period, start, end, &recs, &self.cfg))
            .filter(|row| supplier_id.is_some() || has_activity(row))
            .collect();
        Ok(rows)
    }

    /// Global roll-up across all supplier rows of a period
    pub async fn summary(&self, period: &str) -> AppResult<SupplierMetricSummary> {
        let rows = self.supplier_metrics(period, None).await?;
        Ok(summary::reduce(period, &rows))
    }
}

fn in_window(at: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    at >= start && at < end
}

/// Mean over qualifying samples; None (never zero) when there are none
fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Did this supplier register anything in the period windows?
/// Suppliers with no touching activity are omitted from period listings.
fn has_activity(row: &SupplierMetric) -> bool {
    row.total_pos > 0
        || row.invoice_match_count > 0
        || row.invoice_exception_count > 0
        || row.on_time_ratio.is_some()
}

/// Pure roll-up for one supplier over one snapshot.
///
/// `records` must hold every record of the supplier (any creation date);
/// each metric applies its own period window.
pub(crate) fn compute_supplier_metric(
    supplier_id: &str,
    period: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    records: &[&OrderRecords],
    cfg: &ReconcileConfig,
) -> SupplierMetric {
    // ── Created-in-period scope ─────────────────────────────────────
    let created: Vec<&OrderRecords> = records
        .iter()
        .copied()
        .filter(|r| in_window(r.order.created_at, start, end))
        .collect();

    let total_pos = created.len() as i64;
    let total_spend = money::round_money(
        created
            .iter()
            .map(|r| money::expected_order_total(&r.order.lines))
            .sum(),
    );

    // Issued but not yet fully invoiced
    let open_balance = money::round_money(
        created
            .iter()
            .filter(|r| {
                matches!(
                    r.order.status,
                    Status::Issued | Status::PartiallyReceived | Status::FullyReceived
                )
            })
            .filter(|r| {
                reconcile::invoiced_total(&r.invoices)
                    < money::expected_order_total(&r.order.lines)
            })
            .map(|r| money::expected_order_total(&r.order.lines))
            .sum(),
    );

    // ── Cycle-time averages ─────────────────────────────────────────
    let approval_days: Vec<f64> = created
        .iter()
        .filter_map(|r| {
            r.order
                .approved_at
                .map(|approved| time::days_between(r.order.created_at, approved))
        })
        .collect();
    let issue_days: Vec<f64> = created
        .iter()
        .filter_map(|r| match (r.order.approved_at, r.order.issued_at) {
            (Some(approved), Some(issued)) => Some(time::days_between(approved, issued)),
            _ => None,
        })
        .collect();
    let receipt_days: Vec<f64> = created
        .iter()
        .filter_map(|r| match (r.order.issued_at, r.order.received_at) {
            (Some(issued), Some(received)) => Some(time::days_between(issued, received)),
            _ => None,
        })
        .collect();
    // Billing latency: earliest invoice dated at/after full receipt
    let throughput_days: Vec<f64> = created
        .iter()
        .filter_map(|r| {
            let received = r.order.received_at?;
            r.invoices
                .iter()
                .filter(|i| i.invoiced_at >= received)
                .map(|i| i.invoiced_at)
                .min()
                .map(|invoiced| time::days_between(received, invoiced))
        })
        .collect();

    // ── On-time ratio (full receipt dated in period) ────────────────
    let received_in_period: Vec<&OrderRecords> = records
        .iter()
        .copied()
        .filter(|r| {
            r.order
                .received_at
                .is_some_and(|at| in_window(at, start, end))
        })
        .collect();
    let on_time_ratio = if received_in_period.is_empty() {
        None
    } else {
        let on_time = received_in_period
            .iter()
            .filter(|r| match (r.order.issued_at, r.order.received_at) {
                (Some(issued), Some(received)) => {
                    time::days_between(issued, received) <= cfg.expected_lead_time_days as f64
                }
                _ => false,
            })
            .count();
        Some(on_time as f64 / received_in_period.len() as f64)
    };

    // ── Fulfillment ratio ───────────────────────────────────────────
    // Received vs ordered quantity across all issued orders in scope;
    // measurable only once at least one order reached full receipt.
    let issued_in_scope: Vec<&OrderRecords> = created
        .iter()
        .copied()
        .filter(|r| r.order.issued_at.is_some())
        .collect();
    let ordered_qty: i64 = issued_in_scope
        .iter()
        .map(|r| r.order.total_ordered_quantity())
        .sum();
    let received_qty: i64 = issued_in_scope
        .iter()
        .flat_map(|r| r.receipts.iter())
        .map(|rc| rc.quantity as i64)
        .sum();
    let any_fully_received = created.iter().any(|r| {
        r.order.received_at.is_some()
            || matches!(
                r.order.status,
                Status::FullyReceived | Status::Invoiced | Status::Closed
            )
    });
    let fulfillment_ratio = if any_fully_received && ordered_qty > 0 {
        Some(received_qty as f64 / ordered_qty as f64)
    } else {
        None
    };

    // ── Invoice metrics (invoice dated in period) ───────────────────
    let invoices_in_period: Vec<_> = records
        .iter()
        .flat_map(|r| r.invoices.iter())
        .filter(|i| in_window(i.invoiced_at, start, end))
        .collect();
    let invoice_match_count = invoices_in_period
        .iter()
        .filter(|i| i.match_status == InvoiceMatchStatus::Matched)
        .count() as i64;
    let invoice_exception_count = invoices_in_period.len() as i64 - invoice_match_count;
    let invoice_exception_rate = if invoices_in_period.is_empty() {
        None
    } else {
        Some(invoice_exception_count as f64 / invoices_in_period.len() as f64)
    };

    // ── Variance (orders in scope with at least one invoice) ────────
    let invoiced_orders: Vec<&OrderRecords> = created
        .iter()
        .copied()
        .filter(|r| !r.invoices.is_empty())
        .collect();
    let variance_match_count = invoiced_orders
        .iter()
        .filter(|r| {
            reconcile::variance_matches(
                money::expected_order_total(&r.order.lines),
                reconcile::invoiced_total(&r.invoices),
                cfg,
            )
        })
        .count() as i64;
    let variance_rate = if invoiced_orders.is_empty() {
        None
    } else {
        let mismatches = invoiced_orders.len() as i64 - variance_match_count;
        Some(mismatches as f64 / invoiced_orders.len() as f64)
    };

    SupplierMetric {
        supplier_id: supplier_id.to_string(),
        period: period.to_string(),
        total_pos,
        total_spend,
        open_balance,
        avg_approval_days: mean(&approval_days),
        avg_issue_days: mean(&issue_days),
        avg_receipt_days: mean(&receipt_days),
        avg_invoice_throughput_days: mean(&throughput_days),
        on_time_ratio,
        fulfillment_ratio,
        invoice_exception_rate,
        variance_rate,
        invoice_match_count,
        invoice_exception_count,
        variance_match_count,
    }
}
