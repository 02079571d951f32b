//! Cost History API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::procurement::HISTORY_LIMIT_MAX;
use crate::utils::AppResult;
use shared::models::{CostChangeInput, CostHistoryEntry};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// POST /api/cost-history - 登记成本变更
pub async fn record(
    State(state): State<ServerState>,
    Json(payload): Json<CostChangeInput>,
) -> AppResult<Json<CostHistoryEntry>> {
    let entry = state.cost_history.record_change(payload).await?;
    Ok(Json(entry))
}

/// GET /api/cost-history/{item_id} - 最近成本变更 (最新在前, limit ≤ 20)
pub async fn history(
    State(state): State<ServerState>,
    Path(item_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<CostHistoryEntry>>> {
    let limit = query.limit.unwrap_or(HISTORY_LIMIT_MAX);
    let entries = state.cost_history.history(&item_id, limit).await?;
    Ok(Json(entries))
}
