// ==========================================
// 多渠道对账台账系统 - 列名别名表与首匹配扫描
// ==========================================
// 职责: 规范字段 ← 任意表头 的确定性映射
// 口径: 表头小写后做"包含"匹配（子串，非全等），按行内
//       列顺序先到先得；两个表头同时可匹配时以先出现者为准，
//       这是记录在案的（有损）裁决策略，不做更严格推断
// ==========================================

use crate::importer::file_parser::RawRow;

/// 规范字段与其有序别名子串列表
#[derive(Debug, Clone)]
pub struct FieldAliases {
    pub field: &'static str,
    pub aliases: &'static [&'static str],
}

// ==========================================
// 商品导入别名表
// ==========================================
pub const PRODUCT_SKU: FieldAliases = FieldAliases {
    field: "sku",
    aliases: &["seller sku", "sku"],
};
pub const PRODUCT_TITLE: FieldAliases = FieldAliases {
    field: "title",
    aliases: &["product title", "title", "name"],
};
pub const PRODUCT_MRP: FieldAliases = FieldAliases {
    field: "mrp",
    aliases: &["mrp", "maximum retail price"],
};
pub const PRODUCT_SALE_PRICE: FieldAliases = FieldAliases {
    field: "salePrice",
    aliases: &["selling price", "sale price", "price"],
};
pub const PRODUCT_PURCHASE_PRICE: FieldAliases = FieldAliases {
    field: "purchasePrice",
    aliases: &["purchase price", "cost price", "cost"],
};
pub const PRODUCT_QUANTITY: FieldAliases = FieldAliases {
    field: "quantity",
    aliases: &["stock", "quantity"],
};
pub const PRODUCT_HSN: FieldAliases = FieldAliases {
    field: "hsnCode",
    aliases: &["hsn"],
};
pub const PRODUCT_GST: FieldAliases = FieldAliases {
    field: "gstRate",
    aliases: &["gst", "tax"],
};

// ==========================================
// Flipkart 订单导出别名表
// ==========================================
pub const FLIPKART_ORDER_ITEM_ID: FieldAliases = FieldAliases {
    field: "orderItemId",
    aliases: &["order item id", "order id"],
};
pub const FLIPKART_SKU: FieldAliases = FieldAliases {
    field: "sku",
    aliases: &["sku"],
};
pub const FLIPKART_SALE_AMOUNT: FieldAliases = FieldAliases {
    field: "saleAmount",
    aliases: &["selling price", "invoice amount", "amount"],
};
pub const FLIPKART_QUANTITY: FieldAliases = FieldAliases {
    field: "quantity",
    aliases: &["quantity", "qty"],
};

// ==========================================
// Meesho 订单导出别名表
// ==========================================
pub const MEESHO_SUB_ORDER_NO: FieldAliases = FieldAliases {
    field: "subOrderNo",
    aliases: &["sub order no", "sub order number"],
};
pub const MEESHO_SKU: FieldAliases = FieldAliases {
    field: "sku",
    aliases: &["sku"],
};
pub const MEESHO_SETTLEMENT_AMOUNT: FieldAliases = FieldAliases {
    field: "settlementAmount",
    aliases: &["final settlement amount", "settlement amount", "supplier price"],
};
pub const MEESHO_QUANTITY: FieldAliases = FieldAliases {
    field: "quantity",
    aliases: &["quantity", "qty"],
};

// ==========================================
// 首匹配扫描
// ==========================================

/// 别名首匹配: 返回行内第一个（按列顺序）小写后包含任一
/// 别名子串的表头对应的值；无匹配返回 None
///
/// 对固定的行与别名表结果是确定的；当一个表头满足多个别名、
/// 或多个表头满足同一别名时，不保证语义正确，先到先得
pub fn match_field<'a>(row: &'a RawRow, spec: &FieldAliases) -> Option<&'a str> {
    for (header, value) in row {
        let header_lower = header.to_lowercase();
        if spec
            .aliases
            .iter()
            .any(|alias| header_lower.contains(&alias.to_lowercase()))
        {
            return Some(value.as_str());
        }
    }
    None
}

/// 字符串字段取值: 无匹配或空白 → 规范缺省（空串）
pub fn get_string(row: &RawRow, spec: &FieldAliases) -> String {
    match_field(row, spec)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// 数值字段取值: 无匹配或不可解析 → 规范缺省 0
pub fn get_f64(row: &RawRow, spec: &FieldAliases) -> f64 {
    match_field(row, spec)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// 可缺失的数值字段取值: 无匹配或不可解析 → None
pub fn get_f64_opt(row: &RawRow, spec: &FieldAliases) -> Option<f64> {
    match_field(row, spec).and_then(|v| v.trim().parse::<f64>().ok())
}

/// 整数字段取值: 无匹配或不可解析 → 规范缺省 0
pub fn get_i64(row: &RawRow, spec: &FieldAliases) -> i64 {
    match_field(row, spec)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// 可缺失的整数字段取值
pub fn get_i64_opt(row: &RawRow, spec: &FieldAliases) -> Option<i64> {
    match_field(row, spec).and_then(|v| v.trim().parse::<i64>().ok())
}
