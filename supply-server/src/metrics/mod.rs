//! 供应商指标 - 按期间聚合与全局汇总
//!
//! - [`aggregator`] - 按 (供应商, 期间) 全量重算指标行
//! - [`summary`] - 指标行 → 全局汇总

pub mod aggregator;
pub mod summary;

// Re-exports
pub use aggregator::MetricsService;
