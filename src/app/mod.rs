// ==========================================
// 多渠道对账引擎 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{HistoryApi, ImportApi, SyncApi};
use crate::config::EngineConfig;
use crate::store::sqlite::SqliteStore;

/// 应用状态
///
/// 持有所有API实例和共享的文档存储
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享文档存储
    pub store: Arc<SqliteStore>,

    /// 引擎配置
    pub config: EngineConfig,

    /// 商品/订单导入API
    pub import_api: Arc<ImportApi<SqliteStore>>,

    /// 对账同步API
    pub sync_api: Arc<SyncApi<SqliteStore>>,

    /// 商品履历API
    pub history_api: Arc<HistoryApi<SqliteStore>>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开SQLite文档存储
    /// 2. 加载引擎配置
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let store = Arc::new(
            SqliteStore::new(&db_path).map_err(|e| format!("无法打开文档存储: {}", e))?,
        );

        let config = EngineConfig::load_default().unwrap_or_else(|e| {
            tracing::warn!("配置加载失败(使用默认配置): {}", e);
            EngineConfig::default()
        });

        let import_api = Arc::new(ImportApi::new(store.clone(), config.clone()));
        let sync_api = Arc::new(SyncApi::new(store.clone(), config.clone()));
        let history_api = Arc::new(HistoryApi::new(store.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            store,
            config,
            import_api,
            sync_api,
            history_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用配置中的db_path，否则放在用户数据目录下
pub fn get_default_db_path() -> PathBuf {
    if let Ok(config) = EngineConfig::load_default() {
        if let Some(path) = config.db_path {
            return PathBuf::from(path);
        }
    }

    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("marketplace-ledger").join("ledger.db")
}
