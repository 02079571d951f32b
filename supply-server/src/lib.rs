//! Supply Server - 餐厅采购与供应商管理服务
//!
//! # 架构概述
//!
//! 本模块是 Supply Server 的主入口，提供以下核心功能：
//!
//! - **采购域** (`procurement`): 订单状态机、收货/发票对账、成本历史
//! - **指标** (`metrics`): 按 (供应商, 期间) 的绩效聚合与全局汇总
//! - **存储** (`store`): 抽象记录存储契约与内存实现
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! supply-server/src/
//! ├── core/          # 配置、状态、服务器、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── procurement/   # 订单生命周期与对账
//! ├── metrics/       # 供应商指标聚合
//! ├── store/         # 记录存储
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod metrics;
pub mod procurement;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use crate::metrics::MetricsService;
pub use crate::procurement::{CostHistoryTracker, ProcurementManager};
pub use crate::store::{MemoryStore, RecordStore};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// 设置环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____                         __
  / ___/ __  __ ____   ____     / /__  __
  \__ \ / / / // __ \ / __ \   / // / / /
 ___/ // /_/ // /_/ // /_/ /  / // /_/ /
/____/ \__,_// .___// .___/  /_/ \__, /
            /_/    /_/          /____/
    "#
    );
}
