// ==========================================
// 多渠道对账台账系统 - 表头规范化器
// ==========================================
// 职责: 任意表头的原始行 → 规范候选记录
// 口径: 别名首匹配（见 alias.rs）；缺失字段取规范缺省
//       （数值 0 / 字符串空串 / 分类 "Imported"）
// 红线: sku 与 title 均为空的行静默丢弃——计入解析总数，
//       但不进入 新增/重复 统计
// ==========================================

use crate::domain::{CandidateProduct, FlipkartOrder, MeeshoOrder};
use crate::importer::alias;
use crate::importer::file_parser::RawRow;
use tracing::debug;

/// 电子表格来源商品的固定分类缺省值
pub const DEFAULT_IMPORT_CATEGORY: &str = "Imported";

// ==========================================
// NormalizedProducts - 商品规范化结果
// ==========================================
#[derive(Debug, Clone)]
pub struct NormalizedProducts {
    /// 可识别的候选记录（保持源文件行顺序）
    pub candidates: Vec<CandidateProduct>,
    /// 解析总行数（含被丢弃的不可识别行）
    pub total_parsed: usize,
    /// 因 sku 与 title 均为空而丢弃的行数
    pub dropped: usize,
}

// ==========================================
// SchemaNormalizer - 规范化器
// ==========================================
pub struct SchemaNormalizer {
    /// 表格来源商品的分类缺省值（配置可覆写）
    default_category: String,
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::with_category(DEFAULT_IMPORT_CATEGORY)
    }
}

impl SchemaNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(default_category: &str) -> Self {
        Self {
            default_category: default_category.to_string(),
        }
    }
    /// 商品导出行 → 规范候选记录
    ///
    /// purchase_price 缺失时保持 None，由落库阶段按比例派生
    /// （推导属于提交策略，不属于规范化）
    pub fn normalize_products(&self, rows: &[RawRow]) -> NormalizedProducts {
        let total_parsed = rows.len();
        let mut candidates = Vec::with_capacity(total_parsed);
        let mut dropped = 0usize;

        for (idx, row) in rows.iter().enumerate() {
            let candidate = CandidateProduct {
                sku: alias::get_string(row, &alias::PRODUCT_SKU),
                title: alias::get_string(row, &alias::PRODUCT_TITLE),
                category: self.default_category.clone(),
                mrp: alias::get_f64(row, &alias::PRODUCT_MRP),
                purchase_price: alias::get_f64_opt(row, &alias::PRODUCT_PURCHASE_PRICE),
                sale_price: alias::get_f64(row, &alias::PRODUCT_SALE_PRICE),
                quantity: alias::get_i64(row, &alias::PRODUCT_QUANTITY),
                hsn_code: alias::get_string(row, &alias::PRODUCT_HSN),
                gst_rate: alias::get_f64(row, &alias::PRODUCT_GST),
                row_number: idx + 1,
            };

            if candidate.is_identifiable() {
                candidates.push(candidate);
            } else {
                debug!(row_number = idx + 1, "丢弃不可识别行（sku 与 title 均为空）");
                dropped += 1;
            }
        }

        NormalizedProducts {
            candidates,
            total_parsed,
            dropped,
        }
    }

    /// Flipkart 订单导出行 → 规范订单记录
    ///
    /// 订单号为空的行不可对账，丢弃
    pub fn normalize_flipkart_orders(&self, rows: &[RawRow]) -> Vec<FlipkartOrder> {
        rows.iter()
            .filter_map(|row| {
                let order_item_id = alias::get_string(row, &alias::FLIPKART_ORDER_ITEM_ID);
                if order_item_id.is_empty() {
                    return None;
                }
                Some(FlipkartOrder {
                    id: String::new(),
                    order_item_id,
                    sku: alias::get_string(row, &alias::FLIPKART_SKU),
                    sale_amount: alias::get_f64(row, &alias::FLIPKART_SALE_AMOUNT),
                    quantity: alias::get_i64_opt(row, &alias::FLIPKART_QUANTITY),
                })
            })
            .collect()
    }

    /// Meesho 订单导出行 → 规范订单记录
    pub fn normalize_meesho_orders(&self, rows: &[RawRow]) -> Vec<MeeshoOrder> {
        rows.iter()
            .filter_map(|row| {
                let sub_order_no = alias::get_string(row, &alias::MEESHO_SUB_ORDER_NO);
                if sub_order_no.is_empty() {
                    return None;
                }
                Some(MeeshoOrder {
                    id: String::new(),
                    sub_order_no,
                    sku: alias::get_string(row, &alias::MEESHO_SKU),
                    settlement_amount: alias::get_f64(row, &alias::MEESHO_SETTLEMENT_AMOUNT),
                    quantity: alias::get_i64_opt(row, &alias::MEESHO_QUANTITY),
                })
            })
            .collect()
    }
}
