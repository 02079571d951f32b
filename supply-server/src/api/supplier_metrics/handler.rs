//! Supplier Metrics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{SupplierMetric, SupplierMetricSummary};

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    /// Period key "YYYY-MM"
    pub period: String,
    #[serde(rename = "supplierId")]
    pub supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: String,
}

/// GET /api/supplier-metrics - 按期间的供应商指标行
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MetricsQuery>,
) -> AppResult<Json<Vec<SupplierMetric>>> {
    tracing::debug!(
        period = %query.period,
        supplier_id = ?query.supplier_id,
        "Computing supplier metrics"
    );
    let rows = state
        .metrics
        .supplier_metrics(&query.period, query.supplier_id.as_deref())
        .await?;
    Ok(Json(rows))
}

/// GET /api/supplier-metrics/summary - 全局汇总
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<SupplierMetricSummary>> {
    let summary = state.metrics.summary(&query.period).await?;
    Ok(Json(summary))
}
