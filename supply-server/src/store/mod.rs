//! Record Store
//!
//! Abstract transactional record store consumed by the engine. The engine
//! does not own a storage backend; it talks to this trait. [`MemoryStore`]
//! is the in-process implementation used by the server and tests — real
//! persistence backends live behind the same seam.
//!
//! # Contract
//!
//! - All mutation methods are atomic: either the full effect is applied or
//!   nothing is written.
//! - Order writes carry an expected version; a stale version fails with
//!   [`StoreError::Conflict`] and leaves the store untouched. This is what
//!   serializes transitions per order while letting distinct orders proceed
//!   in parallel.
//! - [`RecordStore::load_order_records`] reads orders, receipts and invoices
//!   in one consistent snapshot so aggregation never mixes a fresh order
//!   with stale receipt data.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use shared::models::{
    CostHistoryEntry, InvoiceRecord, PurchaseOrder, PurchaseOrderStatus, ReceiptRecord, Supplier,
};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Version conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for crate::utils::AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Storage(msg) => Self::Storage(msg),
        }
    }
}

/// Order listing filter
///
/// 所有条件为 AND 关系；`created_to` 为排他上界 (`< created_to`)。
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub supplier_id: Option<String>,
    pub statuses: Option<Vec<PurchaseOrderStatus>>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn for_supplier(supplier_id: impl Into<String>) -> Self {
        Self {
            supplier_id: Some(supplier_id.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, order: &PurchaseOrder) -> bool {
        if let Some(supplier_id) = &self.supplier_id
            && order.supplier_id != *supplier_id
        {
            return false;
        }
        if let Some(statuses) = &self.statuses
            && !statuses.contains(&order.status)
        {
            return false;
        }
        if let Some(from) = self.created_from
            && order.created_at < from
        {
            return false;
        }
        if let Some(to) = self.created_to
            && order.created_at >= to
        {
            return false;
        }
        true
    }
}

/// One order together with everything recorded against it
///
/// Produced by a single snapshot read; the aggregation math only ever sees
/// these bundles, never a mix of reads taken at different instants.
#[derive(Debug, Clone)]
pub struct OrderRecords {
    pub order: PurchaseOrder,
    pub receipts: Vec<ReceiptRecord>,
    pub invoices: Vec<InvoiceRecord>,
}

/// Abstract record store consumed by the engine
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ========== Suppliers ==========
    async fn create_supplier(&self, supplier: Supplier) -> StoreResult<Supplier>;
    async fn get_supplier(&self, id: &str) -> StoreResult<Option<Supplier>>;
    async fn list_suppliers(&self) -> StoreResult<Vec<Supplier>>;
    async fn update_supplier(&self, supplier: Supplier) -> StoreResult<Supplier>;
    async fn delete_supplier(&self, id: &str) -> StoreResult<bool>;

    // ========== Purchase Orders ==========
    /// Insert a new order; the store assigns version 1.
    async fn create_order(&self, order: PurchaseOrder) -> StoreResult<PurchaseOrder>;
    async fn get_order(&self, id: &str) -> StoreResult<Option<PurchaseOrder>>;
    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<PurchaseOrder>>;
    /// Optimistic write: fails with [`StoreError::Conflict`] when
    /// `expected_version` no longer matches the stored order.
    async fn update_order(
        &self,
        order: PurchaseOrder,
        expected_version: u64,
    ) -> StoreResult<PurchaseOrder>;

    // ========== Receipts / Invoices ==========
    /// Append a receipt and apply the resulting order update in one
    /// transaction (both or neither).
    async fn append_receipt(
        &self,
        order: PurchaseOrder,
        expected_version: u64,
        receipt: ReceiptRecord,
    ) -> StoreResult<(PurchaseOrder, ReceiptRecord)>;
    /// Append an invoice and apply the resulting order update in one
    /// transaction (both or neither).
    async fn append_invoice(
        &self,
        order: PurchaseOrder,
        expected_version: u64,
        invoice: InvoiceRecord,
    ) -> StoreResult<(PurchaseOrder, InvoiceRecord)>;
    async fn list_receipts(&self, order_id: &str) -> StoreResult<Vec<ReceiptRecord>>;
    async fn list_invoices(&self, order_id: &str) -> StoreResult<Vec<InvoiceRecord>>;

    /// Consistent snapshot of matching orders plus their receipts and
    /// invoices.
    async fn load_order_records(&self, filter: &OrderFilter) -> StoreResult<Vec<OrderRecords>>;

    // ========== Cost History ==========
    async fn append_cost_history(&self, entry: CostHistoryEntry) -> StoreResult<CostHistoryEntry>;
    /// Most recent `limit` entries, newest first.
    async fn read_cost_history(
        &self,
        item_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<CostHistoryEntry>>;
}
