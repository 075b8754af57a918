// ==========================================
// 多渠道对账台账系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型与业务规则接口
// 红线: 不含数据访问逻辑，不含引擎逻辑
// ==========================================

pub mod invoice;
pub mod ledger;
pub mod order;
pub mod product;
pub mod types;

// 重导出核心类型
pub use invoice::{Invoice, InvoiceItem, PurchaseBill, PurchaseBillItem};
pub use ledger::{ProductHistory, Transaction};
pub use order::{FlipkartOrder, MeeshoOrder, OrderView};
pub use product::{normalize_sku, CandidateProduct, Product};
pub use types::{Channel, InvoiceStatus, InvoiceType, ProductStatus, TransactionKind};
