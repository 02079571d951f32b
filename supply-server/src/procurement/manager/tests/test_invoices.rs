//! Invoice recording tests: classification, auto-advance, rejection paths

use super::*;
use shared::models::{InvoiceExceptionReason, InvoiceMatchStatus};

/// Issue an order with expected total 100.00 and receive it in full
async fn fully_received_order(manager: &ProcurementManager) -> PurchaseOrder {
    let order = issued_order(manager, vec![simple_line("item-1", "Wine", 10, 10.0)]).await;
    let (order, _) = manager
        .record_receipt(&order.id, receipt(&order.lines[0].line_id, 10, 1))
        .await
        .unwrap();
    assert_eq!(order.status, Status::FullyReceived);
    order
}

#[tokio::test]
async fn invoice_within_tolerance_is_matched() {
    let (manager, _store) = create_test_manager().await;
    let order = fully_received_order(&manager).await;

    // Expected 100.00, tolerance 1% → 100.50 matches
    let (order, inv) = manager.record_invoice(&order.id, invoice(100.50, 2)).await.unwrap();
    assert_eq!(inv.match_status, InvoiceMatchStatus::Matched);
    assert_eq!(inv.exception_reason, None);
    assert_eq!(order.status, Status::Invoiced);
    assert!(order.invoiced_at.is_some());
}

#[tokio::test]
async fn invoice_outside_tolerance_is_an_amount_mismatch() {
    let (manager, _store) = create_test_manager().await;
    let order = fully_received_order(&manager).await;

    let (_, inv) = manager.record_invoice(&order.id, invoice(105.0, 2)).await.unwrap();
    assert_eq!(inv.match_status, InvoiceMatchStatus::Exception);
    assert_eq!(inv.exception_reason, Some(InvoiceExceptionReason::AmountMismatch));
}

#[tokio::test]
async fn invoice_dated_past_grace_window_is_late() {
    let (manager, _store) = create_test_manager().await;
    let order = fully_received_order(&manager).await;

    // Full receipt on day 1, invoice on day 12, grace window 7 days
    let (_, inv) = manager.record_invoice(&order.id, invoice(100.0, 12)).await.unwrap();
    assert_eq!(inv.match_status, InvoiceMatchStatus::Exception);
    assert_eq!(inv.exception_reason, Some(InvoiceExceptionReason::LateInvoice));
}

#[tokio::test]
async fn invoice_without_an_order_is_rejected() {
    let (manager, _store) = create_test_manager().await;
    let err = manager
        .record_invoice("po-missing", invoice(10.0, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcurementError::NotFound(_)));
}

#[tokio::test]
async fn invoice_against_draft_is_rejected() {
    let (manager, _store) = create_test_manager().await;
    let order = manager
        .create_order(PurchaseOrderCreate {
            supplier_id: "sup-1".to_string(),
            lines: vec![simple_line("item-1", "Wine", 1, 10.0)],
        })
        .await
        .unwrap();
    let err = manager
        .record_invoice(&order.id, invoice(10.0, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcurementError::InvalidOperation(_)));
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let (manager, _store) = create_test_manager().await;
    let order = fully_received_order(&manager).await;
    for amount in [0.0, -5.0, f64::NAN] {
        let err = manager
            .record_invoice(&order.id, invoice(amount, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcurementError::Validation(_)));
    }
}

#[tokio::test]
async fn partial_billing_before_full_receipt_is_allowed() {
    let (manager, store) = create_test_manager().await;
    let order = issued_order(&manager, vec![simple_line("item-1", "Wine", 10, 10.0)]).await;

    // Two partial invoices while still Issued; each classified independently
    let (order, first) = manager.record_invoice(&order.id, invoice(40.0, 1)).await.unwrap();
    assert_eq!(order.status, Status::Issued);
    assert_eq!(first.match_status, InvoiceMatchStatus::Exception);

    let (order, _) = manager.record_invoice(&order.id, invoice(60.0, 2)).await.unwrap();
    assert_eq!(order.status, Status::Issued);
    assert_eq!(store.list_invoices(&order.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn manual_transition_to_invoiced_requires_an_invoice() {
    let (manager, _store) = create_test_manager().await;
    let order = fully_received_order(&manager).await;
    let err = manager
        .transition_order(&order.id, Status::Invoiced)
        .await
        .unwrap_err();
    assert!(matches!(err, ProcurementError::InvalidOperation(_)));
}
