// ==========================================
// 多渠道对账台账系统 - 目录导入编排
// ==========================================
// 职责: 整合导入流程，从文件到文档库
// 流程: 解析 → 规范化 → 去重 → 顺序落库
// 红线: 落库严格顺序执行，单条失败即中止整次导入并上抛
//       （与对账引擎的逐单容错形成对照）
// 幂等: 同一文件重复导入，第二次新增数为 0
// ==========================================

use crate::config::EngineConfig;
use crate::domain::{CandidateProduct, Channel, FlipkartOrder, MeeshoOrder, Product, ProductStatus};
use crate::importer::deduplicator::ImportDeduplicator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::schema_normalizer::SchemaNormalizer;
use crate::store::{collections, encode, list_typed, DocumentStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

// ==========================================
// ImportSummary / ImportReport
// ==========================================

/// 导入汇总统计
///
/// 不变量: new_count + duplicate_count == total（候选数），
/// total + dropped == total_parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_parsed: usize,    // 解析总行数（含被丢弃行）
    pub total: usize,           // 参与分类的候选数
    pub new_count: usize,       // 新增
    pub duplicate_count: usize, // 重复（跳过）
    pub dropped: usize,         // 不可识别而丢弃的行数
}

/// 导入结果
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub summary: ImportSummary,
    pub inserted_ids: Vec<String>,       // 新增商品的文档 ID（落库顺序）
    pub elapsed: std::time::Duration,    // 导入耗时
    pub summary_text: String,            // 操作员可读的汇总文案
}

// ==========================================
// ProductImporter - 目录导入器
// ==========================================
pub struct ProductImporter<S: DocumentStore> {
    store: Arc<S>,
    config: EngineConfig,
    normalizer: SchemaNormalizer,
}

impl<S: DocumentStore> ProductImporter<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        let normalizer = SchemaNormalizer::with_category(&config.default_category);
        Self {
            store,
            config,
            normalizer,
        }
    }

    /// 从表格文件导入商品目录
    #[instrument(skip(self, file_path))]
    pub async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();
        info!(file = %file_path.display(), "开始导入商品目录");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let rows = UniversalFileParser.parse(file_path)?;
        info!(total_rows = rows.len(), "文件解析完成");

        // === 步骤 2: 规范化 ===
        debug!("步骤 2: 表头规范化");
        let normalized = self.normalizer.normalize_products(&rows);
        info!(
            candidates = normalized.candidates.len(),
            dropped = normalized.dropped,
            "规范化完成"
        );

        // === 步骤 3: 去重 ===
        debug!("步骤 3: SKU 去重");
        let catalog: Vec<Product> = list_typed(self.store.as_ref(), collections::PRODUCTS).await?;
        let outcome = ImportDeduplicator.classify(normalized.candidates, &catalog);
        info!(
            total = outcome.total,
            new = outcome.new_count,
            duplicate = outcome.duplicate_count,
            "去重完成"
        );

        // === 步骤 4: 顺序落库（单条失败即中止） ===
        debug!("步骤 4: 落库");
        let mut inserted_ids = Vec::with_capacity(outcome.to_insert.len());
        for candidate in &outcome.to_insert {
            let row = candidate.row_number;
            let product = self.to_product(candidate);
            let body = encode(&product).map_err(|e| ImportError::CommitFailed {
                row,
                source: e,
            })?;
            let id = self
                .store
                .add(collections::PRODUCTS, body)
                .await
                .map_err(|e| {
                    error!(row_number = row, error = %e, "商品落库失败，导入中止");
                    ImportError::CommitFailed { row, source: e }
                })?;
            inserted_ids.push(id);
        }

        let elapsed = start_time.elapsed();
        let summary = ImportSummary {
            total_parsed: normalized.total_parsed,
            total: outcome.total,
            new_count: outcome.new_count,
            duplicate_count: outcome.duplicate_count,
            dropped: normalized.dropped,
        };
        let summary_text = crate::i18n::t_with_args(
            "import.summary",
            &[
                ("total", &summary.total.to_string()),
                ("new", &summary.new_count.to_string()),
                ("duplicate", &summary.duplicate_count.to_string()),
            ],
        );

        info!(
            total = summary.total,
            new = summary.new_count,
            duplicate = summary.duplicate_count,
            elapsed_ms = elapsed.as_millis(),
            "商品目录导入完成"
        );

        Ok(ImportReport {
            summary,
            inserted_ids,
            elapsed,
            summary_text,
        })
    }

    /// 批量导入多个文件（并发执行）
    pub async fn import_many<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportReport, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        let tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().display().to_string();
            async move {
                match self.import_file(path.as_ref()).await {
                    Ok(report) => {
                        info!(file = %path_str, new = report.summary.new_count, "文件导入成功");
                        Ok(report)
                    }
                    Err(e) => {
                        error!(file = %path_str, error = %e, "文件导入失败");
                        Err(format!("文件 {} 导入失败: {}", path_str, e))
                    }
                }
            }
        });

        let results = join_all(tasks).await;
        info!(
            total = results.len(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );
        results
    }

    /// 导入渠道订单导出（对账运行的数据来源）
    ///
    /// 与商品导入相同的提交纪律: 顺序落库，单条失败即中止。
    /// 订单号已在目标集合中（或批内重复出现）的行跳过不落库，
    /// 同一导出文件重复导入第二次新增数为 0
    #[instrument(skip(self, file_path), fields(channel = %channel))]
    pub async fn import_orders_file<P: AsRef<Path> + Send>(
        &self,
        channel: Channel,
        file_path: P,
    ) -> ImportResult<usize> {
        let file_path = file_path.as_ref();
        info!(file = %file_path.display(), "开始导入渠道订单");

        let rows = UniversalFileParser.parse(file_path)?;

        let (collection, bodies, duplicate_count) = match channel {
            Channel::Flipkart => {
                let existing: Vec<FlipkartOrder> =
                    list_typed(self.store.as_ref(), collections::FLIPKART_ORDERS).await?;
                let mut seen: HashSet<String> =
                    existing.into_iter().map(|o| o.order_item_id).collect();

                let orders = self.normalizer.normalize_flipkart_orders(&rows);
                let parsed = orders.len();
                // 运行态订单号集合: 拦既有订单与批内重复行
                let orders: Vec<_> = orders
                    .into_iter()
                    .filter(|o| seen.insert(o.order_item_id.clone()))
                    .collect();
                let bodies: ImportResult<Vec<_>> =
                    orders.iter().map(|o| Ok(encode(o)?)).collect();
                (collections::FLIPKART_ORDERS, bodies?, parsed - orders.len())
            }
            Channel::Meesho => {
                let existing: Vec<MeeshoOrder> =
                    list_typed(self.store.as_ref(), collections::MEESHO_ORDERS).await?;
                let mut seen: HashSet<String> =
                    existing.into_iter().map(|o| o.sub_order_no).collect();

                let orders = self.normalizer.normalize_meesho_orders(&rows);
                let parsed = orders.len();
                let orders: Vec<_> = orders
                    .into_iter()
                    .filter(|o| seen.insert(o.sub_order_no.clone()))
                    .collect();
                let bodies: ImportResult<Vec<_>> =
                    orders.iter().map(|o| Ok(encode(o)?)).collect();
                (collections::MEESHO_ORDERS, bodies?, parsed - orders.len())
            }
        };

        let total = bodies.len();
        for (idx, body) in bodies.into_iter().enumerate() {
            self.store.add(collection, body).await.map_err(|e| {
                error!(row_number = idx + 1, error = %e, "订单落库失败，导入中止");
                ImportError::CommitFailed {
                    row: idx + 1,
                    source: e,
                }
            })?;
        }

        info!(
            channel = %channel,
            count = total,
            duplicate = duplicate_count,
            "渠道订单导入完成"
        );
        Ok(total)
    }

    /// 候选记录 → 商品（落库阶段应用提交策略）
    ///
    /// 采购价缺失时按 sale_price 比例推算（成本估算启发式），
    /// 该派生发生在落库时而非规范化时
    fn to_product(&self, candidate: &CandidateProduct) -> Product {
        let purchase_price = candidate
            .purchase_price
            .unwrap_or(self.config.purchase_price_ratio * candidate.sale_price);

        Product {
            id: String::new(),
            sku: candidate.sku.clone(),
            title: candidate.title.clone(),
            category: candidate.category.clone(),
            mrp: candidate.mrp,
            purchase_price,
            sale_price: candidate.sale_price,
            quantity: candidate.quantity,
            hsn_code: candidate.hsn_code.clone(),
            gst_rate: candidate.gst_rate,
            status: ProductStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_product_derives_purchase_price() {
        let importer = ProductImporter::new(
            Arc::new(crate::store::InMemoryStore::new()),
            EngineConfig::default(),
        );
        let mut candidate = CandidateProduct {
            sku: "SKU-1".to_string(),
            title: "T".to_string(),
            category: "Imported".to_string(),
            mrp: 0.0,
            purchase_price: None,
            sale_price: 100.0,
            quantity: 0,
            hsn_code: String::new(),
            gst_rate: 0.0,
            row_number: 1,
        };

        let product = importer.to_product(&candidate);
        assert!((product.purchase_price - 70.0).abs() < f64::EPSILON);

        // 显式给出的采购价不做推算
        candidate.purchase_price = Some(55.0);
        let product = importer.to_product(&candidate);
        assert_eq!(product.purchase_price, 55.0);
    }
}
