//! Receipt & Invoice Reconciler
//!
//! Pure matching functions: received-quantity tracking against ordered
//! quantities, invoice classification against the expected order total, and
//! per-order variance. The manager owns the IO; everything here is
//! deterministic and side-effect free, which is also what keeps metric
//! recomputation idempotent.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use shared::models::{
    InvoiceExceptionReason, InvoiceMatchStatus, InvoiceRecord, OrderLine, PurchaseOrder,
    ReceiptRecord,
};

use super::error::{ProcurementError, ProcurementResult};
use super::money;

/// Reconciliation tunables
///
/// 容差为百分比 (1.0 = 1%)；`late_invoice_days` 为全收货后开票的宽限天数；
/// `expected_lead_time_days` 为下单→全收货的期望交付周期 (on-time 判定)。
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub invoice_tolerance_pct: f64,
    pub late_invoice_days: i64,
    pub expected_lead_time_days: i64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            invoice_tolerance_pct: 1.0,
            late_invoice_days: 7,
            expected_lead_time_days: 7,
        }
    }
}

/// Where an order stands against its ordered quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptProgress {
    pub any_received: bool,
    pub all_received: bool,
}

/// Cumulative received quantity per line
pub fn received_totals(receipts: &[ReceiptRecord]) -> HashMap<String, i64> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for receipt in receipts {
        *totals.entry(receipt.line_id.clone()).or_default() += receipt.quantity as i64;
    }
    totals
}

/// Evaluate receipt progress for an order given cumulative line totals
pub fn progress(order: &PurchaseOrder, totals: &HashMap<String, i64>) -> ReceiptProgress {
    let mut any_received = false;
    let mut all_received = !order.lines.is_empty();
    for line in &order.lines {
        let received = totals.get(&line.line_id).copied().unwrap_or(0);
        if received > 0 {
            any_received = true;
        }
        if received < line.quantity as i64 {
            all_received = false;
        }
    }
    ReceiptProgress {
        any_received,
        all_received,
    }
}

/// Reject a receipt whose cumulative quantity would exceed the ordered
/// quantity for the line. Over-receipt is an error, never silently clamped.
pub fn validate_receipt_quantity(
    line: &OrderLine,
    already_received: i64,
    attempted: i32,
) -> ProcurementResult<()> {
    if already_received + attempted as i64 > line.quantity as i64 {
        return Err(ProcurementError::OverReceipt {
            line_id: line.line_id.clone(),
            ordered: line.quantity,
            received: already_received,
            attempted,
        });
    }
    Ok(())
}

/// Classify an invoice against the expected order total
///
/// Amount mismatch takes precedence over timing; each invoice gets exactly
/// one terminal match status.
pub fn classify_invoice(
    expected_total: f64,
    amount: f64,
    invoiced_at: DateTime<Utc>,
    fully_received_at: Option<DateTime<Utc>>,
    cfg: &ReconcileConfig,
) -> (InvoiceMatchStatus, Option<InvoiceExceptionReason>) {
    if !money::within_tolerance(amount, expected_total, cfg.invoice_tolerance_pct) {
        return (
            InvoiceMatchStatus::Exception,
            Some(InvoiceExceptionReason::AmountMismatch),
        );
    }
    if let Some(received_at) = fully_received_at
        && invoiced_at - received_at > Duration::days(cfg.late_invoice_days)
    {
        return (
            InvoiceMatchStatus::Exception,
            Some(InvoiceExceptionReason::LateInvoice),
        );
    }
    (InvoiceMatchStatus::Matched, None)
}

/// Total invoiced amount across all invoices of one order
pub fn invoiced_total(invoices: &[InvoiceRecord]) -> f64 {
    money::round_money(invoices.iter().map(|i| i.amount).sum())
}

/// Is the order's invoiced-vs-expected variance within tolerance?
///
/// Feeds aggregation as the per-order "variance match" flag.
pub fn variance_matches(expected_total: f64, invoiced_total: f64, cfg: &ReconcileConfig) -> bool {
    money::within_tolerance(invoiced_total, expected_total, cfg.invoice_tolerance_pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cfg() -> ReconcileConfig {
        ReconcileConfig::default()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn invoice_within_one_percent_matches() {
        let (status, reason) = classify_invoice(100.0, 100.50, at(10), Some(at(9)), &cfg());
        assert_eq!(status, InvoiceMatchStatus::Matched);
        assert_eq!(reason, None);
    }

    #[test]
    fn invoice_outside_tolerance_is_amount_mismatch() {
        let (status, reason) = classify_invoice(100.0, 105.0, at(10), Some(at(9)), &cfg());
        assert_eq!(status, InvoiceMatchStatus::Exception);
        assert_eq!(reason, Some(InvoiceExceptionReason::AmountMismatch));
    }

    #[test]
    fn invoice_dated_too_long_after_receipt_is_late() {
        let (status, reason) = classify_invoice(100.0, 100.0, at(20), Some(at(1)), &cfg());
        assert_eq!(status, InvoiceMatchStatus::Exception);
        assert_eq!(reason, Some(InvoiceExceptionReason::LateInvoice));
    }

    #[test]
    fn amount_mismatch_takes_precedence_over_lateness() {
        let (_, reason) = classify_invoice(100.0, 200.0, at(20), Some(at(1)), &cfg());
        assert_eq!(reason, Some(InvoiceExceptionReason::AmountMismatch));
    }

    #[test]
    fn invoice_before_full_receipt_never_counts_as_late() {
        // Partial billing: no full-receipt date yet
        let (status, reason) = classify_invoice(100.0, 100.0, at(20), None, &cfg());
        assert_eq!(status, InvoiceMatchStatus::Matched);
        assert_eq!(reason, None);
    }

    #[test]
    fn over_receipt_is_rejected_with_quantities() {
        let line = OrderLine {
            line_id: "l1".to_string(),
            item_id: "item-1".to_string(),
            name: "Flour".to_string(),
            quantity: 10,
            unit_price: 1.0,
        };
        assert!(validate_receipt_quantity(&line, 0, 10).is_ok());
        assert!(validate_receipt_quantity(&line, 6, 4).is_ok());
        let err = validate_receipt_quantity(&line, 10, 1).unwrap_err();
        match err {
            ProcurementError::OverReceipt {
                ordered,
                received,
                attempted,
                ..
            } => {
                assert_eq!((ordered, received, attempted), (10, 10, 1));
            }
            other => panic!("expected OverReceipt, got {:?}", other),
        }
    }
}
