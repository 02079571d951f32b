//! In-memory record store
//!
//! Reference [`RecordStore`] implementation. Orders, receipts, invoices and
//! suppliers live under one `parking_lot::RwLock` so multi-set reads and
//! writes are naturally transactional; the cost history side-channel is an
//! independent append-only log per item (`DashMap`, never read together with
//! order data).

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use shared::models::{
    CostHistoryEntry, InvoiceRecord, PurchaseOrder, ReceiptRecord, Supplier,
};

use super::{OrderFilter, OrderRecords, RecordStore, StoreError, StoreResult};

#[derive(Default)]
struct StoreInner {
    suppliers: HashMap<String, Supplier>,
    orders: HashMap<String, PurchaseOrder>,
    /// order_id → receipts, in insertion order
    receipts: HashMap<String, Vec<ReceiptRecord>>,
    /// order_id → invoices, in insertion order
    invoices: HashMap<String, Vec<InvoiceRecord>>,
}

impl StoreInner {
    /// Version check shared by every order write path
    fn check_version(&self, order_id: &str, expected: u64) -> StoreResult<()> {
        let stored = self
            .orders
            .get(order_id)
            .ok_or_else(|| StoreError::NotFound(format!("Order {} not found", order_id)))?;
        if stored.version != expected {
            return Err(StoreError::Conflict(format!(
                "Order {} was modified concurrently (expected version {}, found {})",
                order_id, expected, stored.version
            )));
        }
        Ok(())
    }
}

/// In-memory store (server default and test fixture)
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    cost_history: DashMap<String, Vec<CostHistoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_orders(mut orders: Vec<PurchaseOrder>) -> Vec<PurchaseOrder> {
    // Deterministic listing: creation time, then id as tiebreaker
    orders.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    orders
}

#[async_trait]
impl RecordStore for MemoryStore {
    // ========== Suppliers ==========

    async fn create_supplier(&self, supplier: Supplier) -> StoreResult<Supplier> {
        let mut inner = self.inner.write();
        if inner.suppliers.contains_key(&supplier.id) {
            return Err(StoreError::Conflict(format!(
                "Supplier {} already exists",
                supplier.id
            )));
        }
        inner.suppliers.insert(supplier.id.clone(), supplier.clone());
        Ok(supplier)
    }

    async fn get_supplier(&self, id: &str) -> StoreResult<Option<Supplier>> {
        Ok(self.inner.read().suppliers.get(id).cloned())
    }

    async fn list_suppliers(&self) -> StoreResult<Vec<Supplier>> {
        let mut suppliers: Vec<Supplier> = self.inner.read().suppliers.values().cloned().collect();
        suppliers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(suppliers)
    }

    async fn update_supplier(&self, supplier: Supplier) -> StoreResult<Supplier> {
        let mut inner = self.inner.write();
        if !inner.suppliers.contains_key(&supplier.id) {
            return Err(StoreError::NotFound(format!(
                "Supplier {} not found",
                supplier.id
            )));
        }
        inner.suppliers.insert(supplier.id.clone(), supplier.clone());
        Ok(supplier)
    }

    async fn delete_supplier(&self, id: &str) -> StoreResult<bool> {
        Ok(self.inner.write().suppliers.remove(id).is_some())
    }

    // ========== Purchase Orders ==========

    async fn create_order(&self, mut order: PurchaseOrder) -> StoreResult<PurchaseOrder> {
        let mut inner = self.inner.write();
        if inner.orders.contains_key(&order.id) {
            return Err(StoreError::Conflict(format!(
                "Order {} already exists",
                order.id
            )));
        }
        order.version = 1;
        inner.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: &str) -> StoreResult<Option<PurchaseOrder>> {
        Ok(self.inner.read().orders.get(id).cloned())
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<PurchaseOrder>> {
        let inner = self.inner.read();
        let orders = inner
            .orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        Ok(sorted_orders(orders))
    }

    async fn update_order(
        &self,
        mut order: PurchaseOrder,
        expected_version: u64,
    ) -> StoreResult<PurchaseOrder> {
        let mut inner = self.inner.write();
        inner.check_version(&order.id, expected_version)?;
        order.version = expected_version + 1;
        inner.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    // ========== Receipts / Invoices ==========

    async fn append_receipt(
        &self,
        mut order: PurchaseOrder,
        expected_version: u64,
        receipt: ReceiptRecord,
    ) -> StoreResult<(PurchaseOrder, ReceiptRecord)> {
        let mut inner = self.inner.write();
        inner.check_version(&order.id, expected_version)?;
        order.version = expected_version + 1;
        inner.orders.insert(order.id.clone(), order.clone());
        inner
            .receipts
            .entry(order.id.clone())
            .or_default()
            .push(receipt.clone());
        Ok((order, receipt))
    }

    async fn append_invoice(
        &self,
        mut order: PurchaseOrder,
        expected_version: u64,
        invoice: InvoiceRecord,
    ) -> StoreResult<(PurchaseOrder, InvoiceRecord)> {
        let mut inner = self.inner.write();
        inner.check_version(&order.id, expected_version)?;
        order.version = expected_version + 1;
        inner.orders.insert(order.id.clone(), order.clone());
        inner
            .invoices
            .entry(order.id.clone())
            .or_default()
            .push(invoice.clone());
        Ok((order, invoice))
    }

    async fn list_receipts(&self, order_id: &str) -> StoreResult<Vec<ReceiptRecord>> {
        Ok(self
            .inner
            .read()
            .receipts
            .get(order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_invoices(&self, order_id: &str) -> StoreResult<Vec<InvoiceRecord>> {
        Ok(self
            .inner
            .read()
            .invoices
            .get(order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn load_order_records(&self, filter: &OrderFilter) -> StoreResult<Vec<OrderRecords>> {
        // Single read guard = one consistent snapshot across all three sets
        let inner = self.inner.read();
        let orders: Vec<PurchaseOrder> = inner
            .orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        Ok(sorted_orders(orders)
            .into_iter()
            .map(|order| {
                let receipts = inner.receipts.get(&order.id).cloned().unwrap_or_default();
                let invoices = inner.invoices.get(&order.id).cloned().unwrap_or_default();
                OrderRecords {
                    order,
                    receipts,
                    invoices,
                }
            })
            .collect())
    }

    // ========== Cost History ==========

    async fn append_cost_history(&self, entry: CostHistoryEntry) -> StoreResult<CostHistoryEntry> {
        self.cost_history
            .entry(entry.item_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn read_cost_history(
        &self,
        item_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<CostHistoryEntry>> {
        let entries = match self.cost_history.get(item_id) {
            Some(entries) => entries.clone(),
            None => return Ok(Vec::new()),
        };
        // Newest first; ties resolved toward the later append
        let mut newest_first: Vec<CostHistoryEntry> = entries.into_iter().rev().collect();
        newest_first.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        newest_first.truncate(limit);
        Ok(newest_first)
    }
}
