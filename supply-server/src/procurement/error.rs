//! Procurement domain errors
//!
//! 错误分类遵循统一口径：
//! - 输入形状错误 (负成本、缺行项目) → [`ProcurementError::Validation`]
//! - 状态机拒绝 (未登记的转换对) → [`ProcurementError::InvalidTransition`]
//! - 状态相关规则 (下单后改行、对草稿收货) → [`ProcurementError::InvalidOperation`]
//! - 超量收货 → [`ProcurementError::OverReceipt`]
//! - 并发写冲突 → [`ProcurementError::Conflict`] (调用方重读后重试)
//!
//! 所有变更操作要么完整生效要么毫无副作用，错误从不留下半写状态。

use shared::models::PurchaseOrderStatus;
use thiserror::Error;

use crate::store::StoreError;
use crate::utils::AppError;

/// Procurement errors
#[derive(Debug, Error)]
pub enum ProcurementError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error(
        "Over-receipt on line {line_id}: ordered {ordered}, already received {received}, attempted {attempted}"
    )]
    OverReceipt {
        line_id: String,
        ordered: i32,
        received: i64,
        attempted: i32,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type ProcurementResult<T> = Result<T, ProcurementError>;

impl From<StoreError> for ProcurementError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ProcurementError::NotFound(msg),
            StoreError::Conflict(msg) => ProcurementError::Conflict(msg),
            StoreError::Storage(msg) => ProcurementError::Store(msg),
        }
    }
}

impl From<ProcurementError> for AppError {
    fn from(err: ProcurementError) -> Self {
        match err {
            ProcurementError::Validation(msg) => AppError::Validation(msg),
            e @ ProcurementError::InvalidTransition { .. } => AppError::BusinessRule(e.to_string()),
            ProcurementError::InvalidOperation(msg) => AppError::BusinessRule(msg),
            e @ ProcurementError::OverReceipt { .. } => AppError::BusinessRule(e.to_string()),
            ProcurementError::Conflict(msg) => AppError::Conflict(msg),
            ProcurementError::NotFound(msg) => AppError::NotFound(msg),
            ProcurementError::Store(msg) => AppError::Storage(msg),
        }
    }
}
