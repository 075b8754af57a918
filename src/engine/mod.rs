// ==========================================
// 多渠道对账台账系统 - 引擎层
// ==========================================
// 职责: 对账核心与读侧投影
// 红线: 只依赖 DocumentStore 接口，不触达任何具体后端
// ==========================================

pub mod error;
pub mod history_projector;
pub mod progress;
pub mod reconciler;

// 重导出核心类型
pub use error::{SyncError, SyncResult};
pub use history_projector::HistoryProjector;
pub use progress::{ChannelProgressSink, NoOpProgressSink, ProgressSink, SyncProgress};
pub use reconciler::{StockWriteFailure, SyncReconciler, SyncReport};
