// ==========================================
// 多渠道对账台账系统 - 发票与采购单领域模型
// ==========================================
// 红线: channelOrderId 在所有同步产生的发票间唯一（去重锚点）
// 红线: 发票一经创建即不可变（发票更正不在本核心范围内）
// 对齐: 文档库 invoices / purchase_bills 集合
// ==========================================

use crate::domain::types::{Channel, InvoiceStatus, InvoiceType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InvoiceItem - 发票行项目
// ==========================================
// 不变量: total == price * quantity（创建时成立，编辑后不复核）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub product_id: String,   // 关联商品文档 ID
    pub product_name: String, // 商品名称（冗余，便于展示）
    pub quantity: i64,        // 数量
    pub price: f64,           // 单价
    pub tax: f64,             // 税额（信息性，按商品 GST 税率计）
    pub total: f64,           // 行合计 = price * quantity
}

// ==========================================
// Invoice - 销售发票
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: String, // 文档 ID

    pub date: DateTime<Utc>,      // 开票时间
    pub customer_id: String,      // 客户标识（同步发票为渠道标识）
    pub customer_name: String,    // 客户名称
    pub items: Vec<InvoiceItem>,  // 行项目（同步发票恒为单行）
    pub sub_total: f64,           // 小计
    pub tax: f64,                 // 税额合计
    pub total_amount: f64,        // 总金额

    // ===== 同步溯源字段 =====
    #[serde(default)]
    pub channel: Option<Channel>, // 来源渠道（人工开票为 None）
    #[serde(default)]
    pub channel_order_id: Option<String>, // 渠道订单号（同步幂等键）

    pub invoice_type: InvoiceType, // 发票类型
    pub status: InvoiceStatus,     // 发票状态
}

impl Invoice {
    /// 提取引用指定商品的行项目
    pub fn items_for_product<'a>(
        &'a self,
        product_id: &'a str,
    ) -> impl Iterator<Item = &'a InvoiceItem> + 'a {
        self.items.iter().filter(move |item| item.product_id == product_id)
    }
}

// ==========================================
// PurchaseBillItem - 采购单行项目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBillItem {
    pub product_id: String,   // 关联商品文档 ID
    pub product_name: String, // 商品名称
    pub quantity: i64,        // 数量
    pub price: f64,           // 单价
    pub tax: f64,             // 税额
    pub total: f64,           // 行合计
}

// ==========================================
// PurchaseBill - 采购单（供应商侧）
// ==========================================
// 用途: 台账投影只读消费，本核心不写入
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBill {
    #[serde(default)]
    pub id: String, // 文档 ID

    pub date: DateTime<Utc>,          // 采购时间
    pub vendor_name: String,          // 供应商名称
    pub items: Vec<PurchaseBillItem>, // 行项目
    pub total_amount: f64,            // 总金额
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_for_product() {
        let item = |pid: &str| InvoiceItem {
            product_id: pid.to_string(),
            product_name: "P".to_string(),
            quantity: 1,
            price: 10.0,
            tax: 0.5,
            total: 10.0,
        };
        let invoice = Invoice {
            id: "inv-1".to_string(),
            date: Utc::now(),
            customer_id: "flipkart".to_string(),
            customer_name: "Flipkart Customer".to_string(),
            items: vec![item("p-1"), item("p-2"), item("p-1")],
            sub_total: 30.0,
            tax: 1.5,
            total_amount: 30.0,
            channel: Some(Channel::Flipkart),
            channel_order_id: Some("OD-1".to_string()),
            invoice_type: InvoiceType::Sales,
            status: InvoiceStatus::Paid,
        };
        assert_eq!(invoice.items_for_product("p-1").count(), 2);
        assert_eq!(invoice.items_for_product("p-3").count(), 0);
    }

    #[test]
    fn test_invoice_optional_channel_fields_default() {
        // 人工开票的历史文档没有渠道字段，反序列化不应失败
        let raw = serde_json::json!({
            "date": "2026-08-01T00:00:00Z",
            "customerId": "walk-in",
            "customerName": "门店客户",
            "items": [],
            "subTotal": 0.0,
            "tax": 0.0,
            "totalAmount": 0.0,
            "invoiceType": "SALES",
            "status": "PENDING"
        });
        let invoice: Invoice = serde_json::from_value(raw).unwrap();
        assert!(invoice.channel.is_none());
        assert!(invoice.channel_order_id.is_none());
    }
}
