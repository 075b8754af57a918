// ==========================================
// 多渠道对账台账系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 口径: 逐单失败一律就地收敛为计数，只有运行启动前的
//       整批失败（如文档库不可达）才会以错误上抛
// ==========================================

use crate::store::StoreError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum SyncError {
    /// 运行启动失败（快照读取等批前置步骤）
    #[error("对账运行启动失败: {0}")]
    SetupFailed(#[from] StoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type SyncResult<T> = Result<T, SyncError>;
