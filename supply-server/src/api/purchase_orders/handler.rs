//! Purchase Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::store::OrderFilter;
use crate::utils::time;
use crate::utils::AppResult;
use shared::models::{
    InvoiceCreate, InvoiceRecord, OrderLineInput, PurchaseOrder, PurchaseOrderCreate,
    PurchaseOrderStatus, ReceiptCreate, ReceiptRecord, TransitionRequest,
};

// ============================================================================
// Query / Payload Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(rename = "supplierId")]
    pub supplier_id: Option<String>,
    /// Period key "YYYY-MM" - windows the creation date
    pub period: Option<String>,
    pub status: Option<PurchaseOrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct LinesUpdate {
    pub lines: Vec<OrderLineInput>,
}

/// Mutation response carrying the updated order and the record written
#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub order: PurchaseOrder,
    pub receipt: ReceiptRecord,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub order: PurchaseOrder,
    pub invoice: InvoiceRecord,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/purchase-orders - 按供应商/期间筛选订单
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<PurchaseOrder>>> {
    let mut filter = OrderFilter {
        supplier_id: query.supplier_id,
        statuses: query.status.map(|s| vec![s]),
        ..OrderFilter::default()
    };
    // 期间键 → 创建日期窗口，转换在 handler 层完成
    if let Some(period) = &query.period {
        let (start, end) = time::period_bounds(period, state.config.timezone)?;
        filter.created_from = Some(start);
        filter.created_to = Some(end);
    }
    let orders = state.manager.list_orders(&filter).await?;
    Ok(Json(orders))
}

/// GET /api/purchase-orders/{id} - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PurchaseOrder>> {
    let order = state.manager.get_order(&id).await?;
    Ok(Json(order))
}

/// POST /api/purchase-orders - 创建订单 (Draft)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PurchaseOrderCreate>,
) -> AppResult<Json<PurchaseOrder>> {
    let order = state.manager.create_order(payload).await?;
    Ok(Json(order))
}

/// PUT /api/purchase-orders/{id}/lines - 替换行项目 (仅下单前)
pub async fn update_lines(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<LinesUpdate>,
) -> AppResult<Json<PurchaseOrder>> {
    let order = state.manager.update_lines(&id, payload.lines).await?;
    Ok(Json(order))
}

/// POST /api/purchase-orders/{id}/transition - 状态机驱动
pub async fn transition(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransitionRequest>,
) -> AppResult<Json<PurchaseOrder>> {
    let order = state.manager.transition_order(&id, payload.target).await?;
    Ok(Json(order))
}

/// GET /api/purchase-orders/{id}/receipts - 订单收货记录
pub async fn list_receipts(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ReceiptRecord>>> {
    state.manager.get_order(&id).await?;
    let receipts = state.store.list_receipts(&id).await?;
    Ok(Json(receipts))
}

/// POST /api/purchase-orders/{id}/receipts - 登记收货
pub async fn record_receipt(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReceiptCreate>,
) -> AppResult<Json<ReceiptResponse>> {
    let (order, receipt) = state.manager.record_receipt(&id, payload).await?;
    Ok(Json(ReceiptResponse { order, receipt }))
}

/// GET /api/purchase-orders/{id}/invoices - 订单发票记录
pub async fn list_invoices(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<InvoiceRecord>>> {
    state.manager.get_order(&id).await?;
    let invoices = state.store.list_invoices(&id).await?;
    Ok(Json(invoices))
}

/// POST /api/purchase-orders/{id}/invoices - 登记发票
pub async fn record_invoice(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<Json<InvoiceResponse>> {
    let (order, invoice) = state.manager.record_invoice(&id, payload).await?;
    Ok(Json(InvoiceResponse { order, invoice }))
}
