use std::sync::Arc;

use crate::core::Config;
use crate::metrics::MetricsService;
use crate::procurement::{CostHistoryTracker, ProcurementManager};
use crate::store::{MemoryStore, RecordStore};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 持有所有服务的共享引用，使用 Arc 实现浅拷贝。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn RecordStore> | 记录存储 (抽象) |
/// | manager | Arc<ProcurementManager> | 订单生命周期门面 |
/// | metrics | Arc<MetricsService> | 供应商指标聚合 |
/// | cost_history | Arc<CostHistoryTracker> | 成本变更追踪 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 记录存储 (抽象契约；内置为内存实现)
    pub store: Arc<dyn RecordStore>,
    /// 采购订单管理器
    pub manager: Arc<ProcurementManager>,
    /// 指标服务
    pub metrics: Arc<MetricsService>,
    /// 成本历史追踪
    pub cost_history: Arc<CostHistoryTracker>,
}

impl ServerState {
    /// 初始化服务器状态 (默认内存存储)
    pub fn initialize(config: &Config) -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        Self::with_store(config, store)
    }

    /// 以指定存储构造状态 (测试或外部存储接入用)
    pub fn with_store(config: &Config, store: Arc<dyn RecordStore>) -> Self {
        let manager = Arc::new(ProcurementManager::new(
            store.clone(),
            config.reconcile.clone(),
        ));
        let metrics = Arc::new(MetricsService::new(
            store.clone(),
            config.reconcile.clone(),
            config.timezone,
        ));
        let cost_history = Arc::new(CostHistoryTracker::new(store.clone()));
        Self {
            config: config.clone(),
            store,
            manager,
            metrics,
            cost_history,
        }
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("store", &"<RecordStore>")
            .finish()
    }
}
