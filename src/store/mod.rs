// ==========================================
// 多渠道对账台账系统 - 文档库抽象层
// ==========================================
// 职责: 定义引擎消费的文档库接口（依赖倒置）
// 说明: 生产环境由实时文档库适配器实现；本 crate 自带
//       SQLite 本地后端与内存后端（测试/离线）
// 红线: 文档库无事务支持，引擎不得假设多写原子性
// ==========================================

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ==========================================
// 集合名称常量
// ==========================================
pub mod collections {
    /// 商品目录
    pub const PRODUCTS: &str = "products";
    /// Flipkart 订单导出
    pub const FLIPKART_ORDERS: &str = "flipkart_orders";
    /// Meesho 订单导出
    pub const MEESHO_ORDERS: &str = "meesho_orders";
    /// 销售发票
    pub const INVOICES: &str = "invoices";
    /// 采购单
    pub const PURCHASE_BILLS: &str = "purchase_bills";
}

// ==========================================
// StoreError - 文档库错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("文档库传输失败: {0}")]
    Transport(String),

    #[error("文档库权限不足: {0}")]
    PermissionDenied(String),

    #[error("文档未找到: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("文档编解码失败: {0}")]
    Codec(String),

    #[error("文档库锁获取失败: {0}")]
    LockError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;

// ==========================================
// Document - 文档信封
// ==========================================
// 说明: 文档 ID 在信封上而非正文内，解码时回填到实体 id 字段
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

impl Document {
    /// 解码为领域实体，将信封 ID 注入实体的 `id` 字段
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let mut body = self.body.clone();
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), Value::String(self.id.clone()));
        }
        Ok(serde_json::from_value(body)?)
    }
}

/// 将领域实体编码为文档正文（剥离 `id` 字段，ID 由存储分配/信封承载）
pub fn encode<T: Serialize>(entity: &T) -> StoreResult<Value> {
    let mut body = serde_json::to_value(entity)?;
    if let Value::Object(map) = &mut body {
        map.remove("id");
    }
    Ok(body)
}

// ==========================================
// DocumentStore - 文档库接口
// ==========================================
/// 文档库接口
///
/// 引擎只依赖此 trait；具体后端（实时文档库 / SQLite / 内存）
/// 由应用层注入。所有操作在传输或权限失败时返回 `StoreError`。
///
/// # 语义约定
/// - `list_all` 返回集合内全部文档，顺序稳定（插入序）
/// - `add` 由存储分配文档 ID 并返回
/// - `update` 为浅合并: 仅覆盖补丁中出现的顶层字段
/// - 读写间无事务边界，写后读的可见性由调用方自行规避
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 列出集合内全部文档（插入序）
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// 新增文档，返回存储分配的文档 ID
    async fn add(&self, collection: &str, body: Value) -> StoreResult<String>;

    /// 浅合并更新指定文档
    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()>;

    /// 删除指定文档
    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()>;
}

/// 类型化读取: 列出集合并逐条解码
///
/// 解码失败视为编解码错误向上传播（集合内混入异构文档属于数据事故）
pub async fn list_typed<T, S>(store: &S, collection: &str) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    let docs = store.list_all(collection).await?;
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        out.push(doc.decode()?);
    }
    Ok(out)
}
