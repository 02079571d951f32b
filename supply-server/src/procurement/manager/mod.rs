//! ProcurementManager - purchase order command processing
//!
//! # Command Flow
//!
//! ```text
//! record_receipt(order_id, input)
//!     ├─ 1. Read order (+ receipts) — one snapshot, version noted
//!     ├─ 2. Validate (status, line reference, over-receipt, dates)
//!     ├─ 3. Re-evaluate lifecycle state from the new cumulative totals
//!     ├─ 4. Commit receipt + order update atomically, guarded by version
//!     └─ 5. Return (order, receipt)
//! ```
//!
//! 单个订单的状态变更通过乐观版本号串行化：持有过期版本的提交以
//! Conflict 被拒，调用方重读后重试；不同订单互不阻塞。

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use shared::models::{
    InvoiceCreate, InvoiceRecord, OrderLine, OrderLineInput, PurchaseOrder, PurchaseOrderCreate,
    PurchaseOrderStatus as Status, ReceiptCreate, ReceiptRecord,
};

use crate::store::{OrderFilter, RecordStore};

use super::error::{ProcurementError, ProcurementResult};
use super::reconcile::{self, ReconcileConfig};
use super::{lifecycle, money};

/// Purchase order lifecycle manager
pub struct ProcurementManager {
    store: Arc<dyn RecordStore>,
    cfg: ReconcileConfig,
}

impl ProcurementManager {
    pub fn new(store: Arc<dyn RecordStore>, cfg: ReconcileConfig) -> Self {
        Self { store, cfg }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.cfg
    }

    fn assign_line_ids(lines: Vec<OrderLineInput>) -> Vec<OrderLine> {
        lines
            .into_iter()
            .map(|l| OrderLine {
                line_id: Uuid::new_v4().to_string(),
                item_id: l.item_id,
                name: l.name,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect()
    }

    // ========== Orders ==========

    /// Create a new order in Draft
    pub async fn create_order(&self, input: PurchaseOrderCreate) -> ProcurementResult<PurchaseOrder> {
        self.store
            .get_supplier(&input.supplier_id)
            .await?
            .ok_or_else(|| {
                ProcurementError::NotFound(format!("Supplier {} not found", input.supplier_id))
            })?;
        for line in &input.lines {
            money::validate_line(line)?;
        }

        let order = PurchaseOrder {
            id: Uuid::new_v4().to_string(),
            supplier_id: input.supplier_id,
            lines: Self::assign_line_ids(input.lines),
            status: Status::Draft,
            created_at: Utc::now(),
            approved_at: None,
            issued_at: None,
            received_at: None,
            invoiced_at: None,
            closed_at: None,
            cancelled_at: None,
            version: 0,
        };
        let order = self.store.create_order(order).await?;
        tracing::info!(
            order_id = %order.id,
            supplier_id = %order.supplier_id,
            lines = order.lines.len(),
            "Purchase order created"
        );
        Ok(order)
    }

    pub async fn get_order(&self, order_id: &str) -> ProcurementResult<PurchaseOrder> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| ProcurementError::NotFound(format!("Order {} not found", order_id)))
    }

    pub async fn list_orders(&self, filter: &OrderFilter) -> ProcurementResult<Vec<PurchaseOrder>> {
        Ok(self.store.list_orders(filter).await?)
    }

    /// Replace the line items of an order that has not been issued yet
    pub async fn update_lines(
        &self,
        order_id: &str,
        lines: Vec<OrderLineInput>,
    ) -> ProcurementResult<PurchaseOrder> {
        let order = self.get_order(order_id).await?;
        if !matches!(order.status, Status::Draft | Status::Approved) {
            return Err(ProcurementError::InvalidOperation(format!(
                "line items cannot be edited after issue (order {} is {})",
                order.id, order.status
            )));
        }
        for line in &lines {
            money::validate_line(line)?;
        }
        let mut updated = order.clone();
        updated.lines = Self::assign_line_ids(lines);
        let updated = self.store.update_order(updated, order.version).await?;
        tracing::info!(order_id = %updated.id, lines = updated.lines.len(), "Order lines replaced");
        Ok(updated)
    }

    /// Drive the order to `target`, enforcing the transition table
    pub async fn transition_order(
        &self,
        order_id: &str,
        target: Status,
    ) -> ProcurementResult<PurchaseOrder> {
        let order = self.get_order(order_id).await?;
        let receipts = self.store.list_receipts(order_id).await?;
        let invoices = self.store.list_invoices(order_id).await?;
        let totals = reconcile::received_totals(&receipts);
        let progress = reconcile::progress(&order, &totals);

        // Manual transitions happen "now", clamped up so the lifecycle
        // chain stays monotonic when earlier stamps carry event dates
        let at = Utc::now().max(order.last_lifecycle_timestamp());
        let mut updated = order.clone();
        lifecycle::apply_transition(&mut updated, target, at, &progress, invoices.len())?;
        let updated = self.store.update_order(updated, order.version).await?;
        tracing::info!(
            order_id = %updated.id,
            from = %order.status,
            to = %target,
            "Order transitioned"
        );
        Ok(updated)
    }

    // ========== Receipts ==========

    /// Record a goods receipt and re-evaluate the order's lifecycle state
    pub async fn record_receipt(
        &self,
        order_id: &str,
        input: ReceiptCreate,
    ) -> ProcurementResult<(PurchaseOrder, ReceiptRecord)> {
        if input.quantity <= 0 {
            return Err(ProcurementError::Validation(format!(
                "receipt quantity must be positive, got {}",
                input.quantity
            )));
        }

        let order = self.get_order(order_id).await?;
        // FullyReceived stays receivable so an extra delivery surfaces as
        // OverReceipt (with quantities) rather than a generic status error
        if !matches!(
            order.status,
            Status::Issued | Status::PartiallyReceived | Status::FullyReceived
        ) {
            return Err(ProcurementError::InvalidOperation(format!(
                "receipts can only be recorded against issued orders (order {} is {})",
                order.id, order.status
            )));
        }
        let line = order.line(&input.line_id).ok_or_else(|| {
            ProcurementError::NotFound(format!(
                "Line {} not found on order {}",
                input.line_id, order_id
            ))
        })?;
        if let Some(issued_at) = order.issued_at
            && input.received_at < issued_at
        {
            return Err(ProcurementError::Validation(format!(
                "receipt date {} precedes the order's issue date {}",
                input.received_at, issued_at
            )));
        }

        let receipts = self.store.list_receipts(order_id).await?;
        let mut totals = reconcile::received_totals(&receipts);
        let already = totals.get(&input.line_id).copied().unwrap_or(0);
        reconcile::validate_receipt_quantity(line, already, input.quantity)?;

        let receipt = ReceiptRecord {
            id: Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            line_id: input.line_id.clone(),
            quantity: input.quantity,
            received_at: input.received_at,
        };

        // Re-evaluate lifecycle state with this receipt counted in
        *totals.entry(input.line_id).or_default() += input.quantity as i64;
        let progress = reconcile::progress(&order, &totals);
        let target = if progress.all_received {
            Status::FullyReceived
        } else {
            Status::PartiallyReceived
        };
        let mut updated = order.clone();
        if updated.status != target {
            // The order is fully received once the last outstanding
            // quantity has arrived: the latest receipt date on record
            let at = receipts
                .iter()
                .map(|r| r.received_at)
                .chain([receipt.received_at])
                .max()
                .unwrap_or(receipt.received_at);
            lifecycle::apply_transition(&mut updated, target, at, &progress, 0)?;
        }

        let (updated, receipt) = self
            .store
            .append_receipt(updated, order.version, receipt)
            .await?;
        tracing::info!(
            order_id = %updated.id,
            line_id = %receipt.line_id,
            quantity = receipt.quantity,
            status = %updated.status,
            "Receipt recorded"
        );
        Ok((updated, receipt))
    }

    // ========== Invoices ==========

    /// Record an invoice, classify it against the expected order total and
    /// re-evaluate the order's lifecycle state
    pub async fn record_invoice(
        &self,
        order_id: &str,
        input: InvoiceCreate,
    ) -> ProcurementResult<(PurchaseOrder, InvoiceRecord)> {
        money::require_finite(input.amount, "amount")?;
        if input.amount <= 0.0 {
            return Err(ProcurementError::Validation(format!(
                "invoice amount must be positive, got {}",
                input.amount
            )));
        }

        // An invoice without a corresponding order is rejected, not dropped
        let order = self.get_order(order_id).await?;
        if !matches!(
            order.status,
            Status::Issued | Status::PartiallyReceived | Status::FullyReceived | Status::Invoiced
        ) {
            return Err(ProcurementError::InvalidOperation(format!(
                "invoices can only be recorded against issued orders (order {} is {})",
                order.id, order.status
            )));
        }

        let expected_total = money::expected_order_total(&order.lines);
        let (match_status, exception_reason) = reconcile::classify_invoice(
            expected_total,
            input.amount,
            input.invoiced_at,
            order.received_at,
            &self.cfg,
        );

        let invoice = InvoiceRecord {
            id: Uuid::new_v4().to_string(),
            order_id: order.id.clone(),
            amount: input.amount,
            invoiced_at: input.invoiced_at,
            match_status,
            exception_reason,
        };

        let mut updated = order.clone();
        if updated.status == Status::FullyReceived {
            let receipts = self.store.list_receipts(order_id).await?;
            let invoices = self.store.list_invoices(order_id).await?;
            let totals = reconcile::received_totals(&receipts);
            let progress = reconcile::progress(&order, &totals);
            // Keep invoiced_at from undercutting received_at so the
            // lifecycle chain stays monotonic
            let stamp = match order.received_at {
                Some(received_at) => input.invoiced_at.max(received_at),
                None => input.invoiced_at,
            };
            lifecycle::apply_transition(
                &mut updated,
                Status::Invoiced,
                stamp,
                &progress,
                invoices.len() + 1,
            )?;
        }

        let (updated, invoice) = self
            .store
            .append_invoice(updated, order.version, invoice)
            .await?;
        tracing::info!(
            order_id = %updated.id,
            amount = invoice.amount,
            match_status = ?invoice.match_status,
            status = %updated.status,
            "Invoice recorded"
        );
        Ok((updated, invoice))
    }
}
