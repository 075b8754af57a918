// ==========================================
// 多渠道对账台账系统 - API 层错误类型
// ==========================================
// 职责: 将各层错误转换为面向操作员的错误消息
// ==========================================

use crate::engine::SyncError;
use crate::importer::ImportError;
use crate::store::StoreError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("对账失败: {0}")]
    Sync(#[from] SyncError),

    #[error("文档库访问失败: {0}")]
    Store(#[from] StoreError),

    #[error("无效输入: {0}")]
    InvalidInput(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
