// ==========================================
// 多渠道对账台账系统 - API 层
// ==========================================
// 职责: 业务接口，供展示层（仪表盘/CLI）调用
// ==========================================

pub mod error;
pub mod history_api;
pub mod import_api;
pub mod sync_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use history_api::HistoryApi;
pub use import_api::ImportApi;
pub use sync_api::SyncApi;
