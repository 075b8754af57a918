// ==========================================
// 多渠道对账台账系统 - 台账投影领域模型
// ==========================================
// 用途: HistoryProjector 的输出结构（读侧，按需重算）
// ==========================================

use crate::domain::types::TransactionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Transaction - 单条台账流水
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub kind: TransactionKind,   // 流水类型（采购/销售）
    pub date: DateTime<Utc>,     // 发生时间
    pub entity_name: String,     // 对方名称（供应商/客户）
    pub reference: String,       // 来源单据 ID（采购单/发票）
    pub quantity: i64,           // 数量
    pub unit_price: f64,         // 单价
    pub total_amount: f64,       // 金额
}

// ==========================================
// ProductHistory - 商品台账（含汇总）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHistory {
    pub product_id: String,             // 商品文档 ID
    pub transactions: Vec<Transaction>, // 合并流水（按时间降序）

    // ===== 汇总 =====
    pub total_purchased: i64, // 采购数量合计
    pub total_sold: i64,      // 销售数量合计
    pub total_spent: f64,     // 采购金额合计
    pub total_revenue: f64,   // 销售金额合计
}
