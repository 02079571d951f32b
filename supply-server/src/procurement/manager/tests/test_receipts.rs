//! Receipt recording tests: over-receipt rejection, status re-evaluation,
//! concurrent writers

use super::*;

#[tokio::test]
async fn over_receipt_is_rejected_without_partial_write() {
    let (manager, store) = create_test_manager().await;
    let order = issued_order(&manager, vec![simple_line("item-1", "Rice", 10, 1.0)]).await;
    let line_id = order.lines[0].line_id.clone();

    let (order, _) = manager
        .record_receipt(&order.id, receipt(&line_id, 10, 1))
        .await
        .unwrap();
    assert_eq!(order.status, Status::FullyReceived);

    let err = manager
        .record_receipt(&order.id, receipt(&line_id, 1, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcurementError::OverReceipt { .. }));

    // Received total stays at 10, no extra record was written
    let receipts = store.list_receipts(&order.id).await.unwrap();
    let total: i64 = receipts.iter().map(|r| r.quantity as i64).sum();
    assert_eq!(total, 10);
    assert_eq!(receipts.len(), 1);
}

#[tokio::test]
async fn over_receipt_on_partially_received_line_names_quantities() {
    let (manager, _store) = create_test_manager().await;
    let order = issued_order(&manager, vec![simple_line("item-1", "Rice", 10, 1.0)]).await;
    let line_id = order.lines[0].line_id.clone();

    manager
        .record_receipt(&order.id, receipt(&line_id, 6, 1))
        .await
        .unwrap();
    let err = manager
        .record_receipt(&order.id, receipt(&line_id, 5, 2))
        .await
        .unwrap_err();
    match err {
        ProcurementError::OverReceipt {
            ordered,
            received,
            attempted,
            ..
        } => assert_eq!((ordered, received, attempted), (10, 6, 5)),
        other => panic!("expected OverReceipt, got {:?}", other),
    }
}

#[tokio::test]
async fn receipt_against_unissued_order_is_rejected() {
    let (manager, _store) = create_test_manager().await;
    let order = manager
        .create_order(PurchaseOrderCreate {
            supplier_id: "sup-1".to_string(),
            lines: vec![simple_line("item-1", "Rice", 10, 1.0)],
        })
        .await
        .unwrap();
    let err = manager
        .record_receipt(&order.id, receipt(&order.lines[0].line_id, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcurementError::InvalidOperation(_)));
}

#[tokio::test]
async fn receipt_for_unknown_line_is_not_found() {
    let (manager, _store) = create_test_manager().await;
    let order = issued_order(&manager, vec![simple_line("item-1", "Rice", 10, 1.0)]).await;
    let err = manager
        .record_receipt(&order.id, receipt("no-such-line", 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcurementError::NotFound(_)));
}

#[tokio::test]
async fn receipt_dated_before_issue_is_rejected() {
    let (manager, _store) = create_test_manager().await;
    let order = issued_order(&manager, vec![simple_line("item-1", "Rice", 10, 1.0)]).await;
    let err = manager
        .record_receipt(&order.id, receipt(&order.lines[0].line_id, 1, -3))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcurementError::Validation(_)));
}

#[tokio::test]
async fn concurrent_receipts_cannot_jointly_exceed_ordered_quantity() {
    let (manager, store) = create_test_manager().await;
    let manager = Arc::new(manager);
    let order = issued_order(&manager, vec![simple_line("item-1", "Rice", 10, 1.0)]).await;
    let line_id = order.lines[0].line_id.clone();

    // Two writers racing; together they would exceed the ordered quantity
    let m1 = manager.clone();
    let m2 = manager.clone();
    let (id1, id2) = (order.id.clone(), order.id.clone());
    let (l1, l2) = (line_id.clone(), line_id.clone());
    let t1 = tokio::spawn(async move { m1.record_receipt(&id1, receipt(&l1, 6, 1)).await });
    let t2 = tokio::spawn(async move { m2.record_receipt(&id2, receipt(&l2, 6, 1)).await });
    let (r1, r2) = (t1.await.unwrap(), t2.await.unwrap());

    // Exactly one succeeds; the loser sees OverReceipt or Conflict
    assert_ne!(r1.is_ok(), r2.is_ok(), "exactly one writer must win");
    let loser = if r1.is_ok() { r2 } else { r1 };
    assert!(matches!(
        loser.unwrap_err(),
        ProcurementError::OverReceipt { .. } | ProcurementError::Conflict(_)
    ));

    let total: i64 = store
        .list_receipts(&order.id)
        .await
        .unwrap()
        .iter()
        .map(|r| r.quantity as i64)
        .sum();
    assert_eq!(total, 6);
}
