use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use shared::models::{
    InvoiceCreate, OrderLineInput, PurchaseOrder, PurchaseOrderCreate, ReceiptCreate, Supplier,
};

use super::*;
use crate::store::{MemoryStore, RecordStore};

mod test_invoices;
mod test_receipts;

// ========================================================================
// Helpers
// ========================================================================

async fn create_test_manager() -> (ProcurementManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store
        .create_supplier(Supplier {
            id: "sup-1".to_string(),
            name: "Fresh Produce Co".to_string(),
            contact_name: None,
            phone: None,
            email: None,
            address: None,
            is_active: true,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    let manager = ProcurementManager::new(store.clone(), ReconcileConfig::default());
    (manager, store)
}

fn simple_line(item_id: &str, name: &str, quantity: i32, unit_price: f64) -> OrderLineInput {
    OrderLineInput {
        item_id: item_id.to_string(),
        name: name.to_string(),
        quantity,
        unit_price,
    }
}

/// Create an order and drive it to Issued
async fn issued_order(manager: &ProcurementManager, lines: Vec<OrderLineInput>) -> PurchaseOrder {
    let order = manager
        .create_order(PurchaseOrderCreate {
            supplier_id: "sup-1".to_string(),
            lines,
        })
        .await
        .unwrap();
    manager
        .transition_order(&order.id, Status::Approved)
        .await
        .unwrap();
    manager
        .transition_order(&order.id, Status::Issued)
        .await
        .unwrap()
}

/// Lifecycle timestamps use the wall clock, so test dates are now-relative
fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

fn receipt(line_id: &str, quantity: i32, days: i64) -> ReceiptCreate {
    ReceiptCreate {
        line_id: line_id.to_string(),
        quantity,
        received_at: days_from_now(days),
    }
}

fn invoice(amount: f64, days: i64) -> InvoiceCreate {
    InvoiceCreate {
        amount,
        invoiced_at: days_from_now(days),
    }
}
