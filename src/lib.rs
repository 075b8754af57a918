// ==========================================
// 多渠道对账与库存台账引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (文档式存储)
// 系统定位: 卖家运营后台的对账与台账核心
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 存储层 - 文档式数据访问
pub mod store;

// 引擎层 - 对账与台账投影
pub mod engine;

// 导入层 - 电子表格数据
pub mod importer;

// 配置层 - 引擎参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Channel, InvoiceStatus, InvoiceType, ProductStatus, TransactionKind};

// 领域实体
pub use domain::{
    CandidateProduct, FlipkartOrder, Invoice, InvoiceItem, MeeshoOrder, OrderView, Product,
    ProductHistory, PurchaseBill, PurchaseBillItem, Transaction,
};

// 引擎
pub use engine::{
    HistoryProjector, ProgressSink, StockWriteFailure, SyncProgress, SyncReconciler, SyncReport,
};

// API
pub use api::{HistoryApi, ImportApi, SyncApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "多渠道对账与库存台账引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
