// ==========================================
// 多渠道对账台账系统 - 导入去重器
// ==========================================
// 职责: 候选记录 vs 既有目录 按 SKU 分类（新增/重复）
// 口径: SKU 归一化为 trim + 小写后比较
// 红线: 重复一律跳过，永不覆盖既有商品
// 说明: SKU 集合是本批次的运行态——新增记录即时入集，
//       同一批内重复出现的 SKU 同样会被拦下
// ==========================================

use crate::domain::{normalize_sku, CandidateProduct, Product};
use std::collections::HashSet;

// ==========================================
// DedupOutcome - 去重结果
// ==========================================
// 不变量: new_count + duplicate_count == total
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    /// 参与分类的候选总数（不含规范化阶段已丢弃的行）
    pub total: usize,
    /// 分类为新增的数量
    pub new_count: usize,
    /// 分类为重复（跳过）的数量
    pub duplicate_count: usize,
    /// 待插入记录（保持候选顺序）
    pub to_insert: Vec<CandidateProduct>,
}

// ==========================================
// ImportDeduplicator - 去重器
// ==========================================
pub struct ImportDeduplicator;

impl ImportDeduplicator {
    /// 对候选记录逐条分类
    ///
    /// sku 为空的候选（仅有 title 的行）视为新增——空串也会
    /// 入集，因此同批第二条无 SKU 记录会被记为重复
    pub fn classify(
        &self,
        candidates: Vec<CandidateProduct>,
        existing_catalog: &[Product],
    ) -> DedupOutcome {
        // 既有 SKU 快照（小写 + 去空白）
        let mut seen: HashSet<String> = existing_catalog
            .iter()
            .map(|p| p.normalized_sku())
            .collect();

        let total = candidates.len();
        let mut to_insert = Vec::new();
        let mut duplicate_count = 0usize;

        for candidate in candidates {
            let key = normalize_sku(&candidate.sku);
            if seen.contains(&key) {
                duplicate_count += 1;
            } else {
                // 即时入集，拦截同批次内的重复 SKU
                seen.insert(key);
                to_insert.push(candidate);
            }
        }

        DedupOutcome {
            total,
            new_count: to_insert.len(),
            duplicate_count,
            to_insert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductStatus;

    fn candidate(sku: &str) -> CandidateProduct {
        CandidateProduct {
            sku: sku.to_string(),
            title: format!("商品 {}", sku),
            category: "Imported".to_string(),
            mrp: 0.0,
            purchase_price: None,
            sale_price: 100.0,
            quantity: 1,
            hsn_code: String::new(),
            gst_rate: 0.0,
            row_number: 1,
        }
    }

    fn product(sku: &str) -> Product {
        Product {
            id: format!("p-{}", sku),
            sku: sku.to_string(),
            title: String::new(),
            category: String::new(),
            mrp: 0.0,
            purchase_price: 0.0,
            sale_price: 0.0,
            quantity: 0,
            hsn_code: String::new(),
            gst_rate: 0.0,
            status: ProductStatus::Active,
        }
    }

    #[test]
    fn test_tally_identity() {
        let outcome = ImportDeduplicator.classify(
            vec![candidate("A"), candidate("B"), candidate("A")],
            &[product("B")],
        );
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.new_count + outcome.duplicate_count, outcome.total);
        assert_eq!(outcome.new_count, 1);
        assert_eq!(outcome.duplicate_count, 2);
    }

    #[test]
    fn test_case_insensitive_against_catalog() {
        let outcome =
            ImportDeduplicator.classify(vec![candidate("  sku-1 ")], &[product("SKU-1")]);
        assert_eq!(outcome.new_count, 0);
        assert_eq!(outcome.duplicate_count, 1);
    }

    #[test]
    fn test_in_batch_duplicate_caught_by_running_set() {
        // 目录为空，同批内两条同 SKU：第二条必须被拦
        let outcome = ImportDeduplicator.classify(
            vec![candidate("X"), candidate("x")],
            &[],
        );
        assert_eq!(outcome.new_count, 1);
        assert_eq!(outcome.duplicate_count, 1);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let catalog = vec![product("A"), product("B")];
        let outcome = ImportDeduplicator.classify(
            vec![candidate("A"), candidate("B")],
            &catalog,
        );
        assert_eq!(outcome.new_count, 0);
        assert!(outcome.to_insert.is_empty());
    }

    #[test]
    fn test_insert_order_preserved() {
        let outcome = ImportDeduplicator.classify(
            vec![candidate("C"), candidate("A"), candidate("B")],
            &[],
        );
        let skus: Vec<&str> = outcome.to_insert.iter().map(|c| c.sku.as_str()).collect();
        assert_eq!(skus, vec!["C", "A", "B"]);
    }
}
