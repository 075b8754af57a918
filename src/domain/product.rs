// ==========================================
// 多渠道对账台账系统 - 商品领域模型
// ==========================================
// 红线: sku 为全系统唯一交叉引用键，导入/同步/台账均以其匹配
// 红线: quantity 仅由对账引擎（销售扣减）或人工编辑修改
// 对齐: 文档库 products 集合（camelCase 字段）
// ==========================================

use crate::domain::types::ProductStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品目录条目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    // ===== 主键 =====
    #[serde(default)]
    pub id: String, // 文档 ID（由存储分配，写入时忽略）

    // ===== 标识 =====
    pub sku: String,       // 商品编码（唯一，匹配时不区分大小写）
    pub title: String,     // 商品名称
    pub category: String,  // 商品分类

    // ===== 价格 =====
    pub mrp: f64,            // 最高零售价
    pub purchase_price: f64, // 采购价（缺失时按 sale_price 比例推算）
    pub sale_price: f64,     // 销售价

    // ===== 库存 =====
    pub quantity: i64, // 当前库存（≥0，仅对账引擎与人工编辑可写）

    // ===== 税务 =====
    pub hsn_code: String, // HSN 税则分类码
    pub gst_rate: f64,    // GST 税率（百分比）

    // ===== 状态 =====
    #[serde(default)]
    pub status: ProductStatus, // 商品状态
}

impl Product {
    /// 归一化 SKU（小写 + 去空白），用于导入去重与历史匹配
    pub fn normalized_sku(&self) -> String {
        normalize_sku(&self.sku)
    }
}

/// SKU 归一化口径: trim + 小写
pub fn normalize_sku(sku: &str) -> String {
    sku.trim().to_lowercase()
}

// ==========================================
// CandidateProduct - 导入候选记录
// ==========================================
// 用途: 导入管道中间产物（文件解析 → 规范化 → 此结构）
// 生命周期: 仅在一次导入流程内
// 说明: purchase_price 为 None 时在落库阶段按比例推算，而非在规范化阶段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub sku: String,                 // 商品编码（可能为空串）
    pub title: String,               // 商品名称（可能为空串）
    pub category: String,            // 分类（缺省 "Imported"）
    pub mrp: f64,                    // 最高零售价（缺省 0）
    pub purchase_price: Option<f64>, // 采购价（缺失时落库阶段派生）
    pub sale_price: f64,             // 销售价（缺省 0）
    pub quantity: i64,               // 库存（缺省 0）
    pub hsn_code: String,            // HSN 码（缺省空串）
    pub gst_rate: f64,               // GST 税率（缺省 0）

    // 元信息
    pub row_number: usize, // 原始文件行号（1 起）
}

impl CandidateProduct {
    /// 判断记录是否可识别: sku 与 title 至少一项非空
    ///
    /// 两者皆空的行在规范化阶段静默丢弃，仅计入解析总数
    pub fn is_identifiable(&self) -> bool {
        !self.sku.trim().is_empty() || !self.title.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sku() {
        assert_eq!(normalize_sku("  SKU-001  "), "sku-001");
        assert_eq!(normalize_sku("ABC"), "abc");
    }

    #[test]
    fn test_candidate_identifiable() {
        let mut c = CandidateProduct {
            sku: String::new(),
            title: String::new(),
            category: "Imported".to_string(),
            mrp: 0.0,
            purchase_price: None,
            sale_price: 0.0,
            quantity: 0,
            hsn_code: String::new(),
            gst_rate: 0.0,
            row_number: 1,
        };
        assert!(!c.is_identifiable());

        c.title = "测试商品".to_string();
        assert!(c.is_identifiable());

        c.title.clear();
        c.sku = "SKU-1".to_string();
        assert!(c.is_identifiable());
    }

    #[test]
    fn test_product_camel_case_body() {
        let p = Product {
            id: String::new(),
            sku: "SKU-1".to_string(),
            title: "T".to_string(),
            category: "C".to_string(),
            mrp: 100.0,
            purchase_price: 70.0,
            sale_price: 90.0,
            quantity: 5,
            hsn_code: "6109".to_string(),
            gst_rate: 5.0,
            status: ProductStatus::Active,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("salePrice").is_some());
        assert!(v.get("hsnCode").is_some());
        assert!(v.get("sale_price").is_none());
    }
}
