//! 采购域 - 订单生命周期、对账与成本历史
//!
//! # 模块结构
//!
//! - [`lifecycle`] - 订单状态机 (显式转换表)
//! - [`reconcile`] - 收货/发票对账 (纯函数)
//! - [`manager`] - 命令处理门面 (IO + 乐观并发)
//! - [`cost_history`] - 成本变更追踪 (append-only)
//! - [`money`] - rust_decimal 金额运算

pub mod cost_history;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod money;
pub mod reconcile;

// Re-exports
pub use cost_history::{CostHistoryTracker, HISTORY_LIMIT_MAX};
pub use error::{ProcurementError, ProcurementResult};
pub use manager::ProcurementManager;
pub use reconcile::ReconcileConfig;
