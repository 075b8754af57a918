// ==========================================
// 多渠道对账台账系统 - 配置层
// ==========================================
// 职责: 引擎策略参数管理（缺省值 + JSON 文件覆写）
// 说明: 这些参数是记录在案的业务口径，不是调优旋钮
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    ReadError(String),

    #[error("配置文件格式错误: {0}")]
    ParseError(String),
}

// ==========================================
// EngineConfig - 引擎配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 采购价缺失时按销售价推算的比例（成本估算启发式）
    pub purchase_price_ratio: f64,

    /// 电子表格来源商品的固定分类
    pub default_category: String,

    /// 订单数量缺失或为 0 时的默认扣减数量
    pub default_order_quantity: i64,

    /// 本地文档库路径（None 时由应用层取平台默认路径）
    pub db_path: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            purchase_price_ratio: 0.7,
            default_category: "Imported".to_string(),
            default_order_quantity: 1,
            db_path: None,
        }
    }
}

impl EngineConfig {
    /// 从 JSON 文件加载配置；文件不存在时返回缺省配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在，使用缺省配置");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;
        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        info!(path = %path.display(), "配置文件加载完成");
        Ok(config)
    }

    /// 从平台默认位置加载配置
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(default_config_path())
    }
}

/// 默认配置文件路径（用户配置目录下）
pub fn default_config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("marketplace-ledger").join("config.json")
}
