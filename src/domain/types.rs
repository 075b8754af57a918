// ==========================================
// 多渠道对账台账系统 - 基础类型与枚举
// ==========================================
// 职责: 定义跨模块共享的枚举类型
// 红线: 渠道标识为字面量标签，随发票持久化，不可变更
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Channel - 销售渠道
// ==========================================
// 说明: 每张同步产生的发票都携带渠道标签
// 扩展: 新增渠道需同时提供别名表与订单结构
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Flipkart 渠道
    #[serde(rename = "FLIPKART")]
    Flipkart,
    /// Meesho 渠道
    #[serde(rename = "MEESHO")]
    Meesho,
}

impl Channel {
    /// 转换为字面量标签（与存储中的取值一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Flipkart => "FLIPKART",
            Channel::Meesho => "MEESHO",
        }
    }

    /// 对账运行的固定渠道顺序: Flipkart → Meesho
    pub fn sync_order() -> [Channel; 2] {
        [Channel::Flipkart, Channel::Meesho]
    }

    /// 从字符串解析渠道标签（大小写不敏感）
    pub fn parse(value: &str) -> Option<Channel> {
        match value.trim().to_uppercase().as_str() {
            "FLIPKART" => Some(Channel::Flipkart),
            "MEESHO" => Some(Channel::Meesho),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// ProductStatus - 商品状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    /// 在售
    #[serde(rename = "ACTIVE")]
    Active,
    /// 下架
    #[serde(rename = "INACTIVE")]
    Inactive,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Active
    }
}

// ==========================================
// InvoiceStatus - 发票状态
// ==========================================
// 说明: 同步产生的发票固定为 Paid（结算对账不在本核心范围内）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// 已结清
    #[serde(rename = "PAID")]
    Paid,
    /// 待收款
    #[serde(rename = "PENDING")]
    Pending,
    /// 已作废
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

// ==========================================
// InvoiceType - 发票类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceType {
    /// 销售发票
    #[serde(rename = "SALES")]
    Sales,
    /// 报价单
    #[serde(rename = "ESTIMATE")]
    Estimate,
}

// ==========================================
// TransactionKind - 台账流水类型
// ==========================================
// 用途: HistoryProjector 输出的流水标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// 采购入库
    #[serde(rename = "PURCHASE")]
    Purchase,
    /// 销售出库
    #[serde(rename = "SALE")]
    Sale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_literal_tags() {
        assert_eq!(Channel::Flipkart.as_str(), "FLIPKART");
        assert_eq!(Channel::Meesho.as_str(), "MEESHO");
    }

    #[test]
    fn test_channel_sync_order_fixed() {
        assert_eq!(Channel::sync_order(), [Channel::Flipkart, Channel::Meesho]);
    }

    #[test]
    fn test_channel_parse_case_insensitive() {
        assert_eq!(Channel::parse("flipkart"), Some(Channel::Flipkart));
        assert_eq!(Channel::parse(" MEESHO "), Some(Channel::Meesho));
        assert_eq!(Channel::parse("amazon"), None);
    }

    #[test]
    fn test_channel_serde_roundtrip() {
        let json = serde_json::to_string(&Channel::Meesho).unwrap();
        assert_eq!(json, "\"MEESHO\"");
        let back: Channel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Channel::Meesho);
    }
}
