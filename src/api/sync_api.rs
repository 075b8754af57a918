// ==========================================
// 多渠道对账台账系统 - 对账 API
// ==========================================
// 职责: 面向展示层的"立即对账"入口（无参数）
// 说明: 进程内以异步互斥串行化并发触发——仪表盘双击
//       不会产生并行运行；跨进程并发仍未互斥（已知边界，
//       文档库侧无事务可依）
// ==========================================

use crate::api::error::ApiResult;
use crate::config::EngineConfig;
use crate::engine::{ProgressSink, SyncReconciler, SyncReport};
use crate::store::DocumentStore;
use std::sync::Arc;
use tokio::sync::Mutex;

// ==========================================
// SyncApi - 对账接口
// ==========================================
pub struct SyncApi<S: DocumentStore> {
    store: Arc<S>,
    config: EngineConfig,
    run_lock: Mutex<()>,
}

impl<S: DocumentStore> SyncApi<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            run_lock: Mutex::new(()),
        }
    }

    /// 立即执行一次对账运行（静默进度）
    pub async fn run(&self) -> ApiResult<SyncReport> {
        let _guard = self.run_lock.lock().await;
        let reconciler = SyncReconciler::new(self.store.clone(), self.config.clone());
        Ok(reconciler.run().await?)
    }

    /// 立即执行一次对账运行，进度发往指定发布者
    pub async fn run_with_progress(
        &self,
        progress: Arc<dyn ProgressSink>,
    ) -> ApiResult<SyncReport> {
        let _guard = self.run_lock.lock().await;
        let reconciler = SyncReconciler::new(self.store.clone(), self.config.clone())
            .with_progress(progress);
        Ok(reconciler.run().await?)
    }
}
