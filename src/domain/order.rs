// ==========================================
// 多渠道对账台账系统 - 渠道订单领域模型
// ==========================================
// 职责: 定义各渠道订单导出的规范化结构
// 红线: 渠道订单号是该渠道同步的幂等键，永不复用
// 对齐: 文档库 flipkart_orders / meesho_orders 集合
// ==========================================

use crate::domain::types::Channel;
use serde::{Deserialize, Serialize};

// ==========================================
// FlipkartOrder - Flipkart 订单导出行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipkartOrder {
    #[serde(default)]
    pub id: String, // 文档 ID

    pub order_item_id: String,  // 渠道订单项 ID（幂等键）
    pub sku: String,            // 渠道侧 SKU
    pub sale_amount: f64,       // 销售金额（行级，含税）
    pub quantity: Option<i64>,  // 数量（缺失时按默认数量 1 处理）
}

// ==========================================
// MeeshoOrder - Meesho 订单导出行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeeshoOrder {
    #[serde(default)]
    pub id: String, // 文档 ID

    pub sub_order_no: String,   // 子订单号（幂等键）
    pub sku: String,            // 渠道侧 SKU
    pub settlement_amount: f64, // 结算金额（行级，含税）
    pub quantity: Option<i64>,  // 数量（缺失时按默认数量 1 处理）
}

// ==========================================
// OrderView - 对账引擎统一只读视图
// ==========================================
// 用途: 屏蔽渠道字段差异，对账算法按统一口径处理
#[derive(Debug, Clone)]
pub struct OrderView {
    pub channel: Channel,      // 来源渠道
    pub order_id: String,      // 渠道订单标识（orderItemId / subOrderNo）
    pub sku: String,           // 渠道侧 SKU（按存储原样，区分大小写匹配）
    pub sale_amount: f64,      // 销售/结算金额
    pub quantity: Option<i64>, // 数量
}

impl OrderView {
    /// 本单应扣减数量: 数量存在且非零取其值，否则按 1
    ///
    /// 该默认值同时保证单价推导永不除零
    pub fn qty_to_deduct(&self, default_quantity: i64) -> i64 {
        match self.quantity {
            Some(q) if q != 0 => q,
            _ => default_quantity,
        }
    }
}

impl From<&FlipkartOrder> for OrderView {
    fn from(order: &FlipkartOrder) -> Self {
        OrderView {
            channel: Channel::Flipkart,
            order_id: order.order_item_id.clone(),
            sku: order.sku.clone(),
            sale_amount: order.sale_amount,
            quantity: order.quantity,
        }
    }
}

impl From<&MeeshoOrder> for OrderView {
    fn from(order: &MeeshoOrder) -> Self {
        OrderView {
            channel: Channel::Meesho,
            order_id: order.sub_order_no.clone(),
            sku: order.sku.clone(),
            sale_amount: order.settlement_amount,
            quantity: order.quantity,
        }
    }
}
