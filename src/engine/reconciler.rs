// ==========================================
// 多渠道对账台账系统 - 对账引擎核心
// ==========================================
// 职责: 渠道订单 → 销售发票 + 库存扣减
// 幂等键: 渠道订单号（运行开始时一次性取既有发票快照）
// 顺序: 渠道间固定 Flipkart → Meesho，渠道内按存储返回序
// 红线: 逐单隔离——单笔写失败只计数，绝不中止整次运行
// 红线: 库存一律以影子台账为准计算，运行中途不回读存储
//       （文档库不保证写后读的即时可见性）
// 说明: 发票写入与库存写入非原子；库存写恒为影子绝对值，
//       同一商品的后续成功写入会覆盖掉此前漏写的扣减，
//       残留不一致记录在 SyncReport 中供人工修复
// ==========================================

use crate::config::EngineConfig;
use crate::domain::{
    Channel, FlipkartOrder, Invoice, InvoiceItem, InvoiceStatus, InvoiceType, MeeshoOrder,
    OrderView, Product,
};
use crate::engine::error::SyncResult;
use crate::engine::progress::{NoOpProgressSink, ProgressSink, SyncProgress};
use crate::store::{collections, encode, list_typed, DocumentStore};
use chrono::Utc;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// ShadowLedger - 运行级影子库存台账
// ==========================================
// 生命周期: 随一次对账运行创建与丢弃，绝不跨运行共享
struct ShadowLedger {
    quantities: HashMap<String, i64>,
}

impl ShadowLedger {
    /// 从目录快照一次性播种
    fn seed(catalog: &[Product]) -> Self {
        Self {
            quantities: catalog
                .iter()
                .map(|p| (p.id.clone(), p.quantity))
                .collect(),
        }
    }

    /// 扣减并返回扣减后的数量（绝对值，用于落库）
    fn deduct(&mut self, product_id: &str, qty: i64) -> i64 {
        let entry = self.quantities.entry(product_id.to_string()).or_insert(0);
        *entry -= qty;
        *entry
    }
}

// ==========================================
// StockWriteFailure - 发票已落库但库存写失败的记录
// ==========================================
#[derive(Debug, Clone)]
pub struct StockWriteFailure {
    pub channel_order_id: String,
    pub product_id: String,
}

// ==========================================
// SyncReport - 对账运行最终报告
// ==========================================
// 保证: 运行无论成败总会给出最终统计；运行永不回滚
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub total: usize,
    pub added: usize,
    pub skipped: usize,
    pub errors: usize,
    /// 发票已存在但对应库存写入失败的订单（待人工修复）
    pub stock_write_failures: Vec<StockWriteFailure>,
    /// 操作员可读的汇总文案
    pub summary_text: String,
}

// ==========================================
// SyncReconciler - 对账引擎
// ==========================================
pub struct SyncReconciler<S: DocumentStore> {
    store: Arc<S>,
    config: EngineConfig,
    progress: Arc<dyn ProgressSink>,
}

impl<S: DocumentStore> SyncReconciler<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            progress: Arc::new(NoOpProgressSink),
        }
    }

    /// 注入进度发布者（默认为空操作）
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// 执行一次对账运行
    ///
    /// 仅快照读取等批前置失败会上抛；进入逐单处理后任何
    /// 失败都收敛为计数，最终统计总会给出。重复运行安全：
    /// 已开票订单经幂等键集合排除，不会出现在候选中。
    #[instrument(skip(self))]
    pub async fn run(&self) -> SyncResult<SyncReport> {
        info!("开始对账运行");

        // === 阶段 1: 运行快照（失败即整体上抛，Fatal 口径） ===
        let catalog: Vec<Product> = list_typed(self.store.as_ref(), collections::PRODUCTS).await?;
        let invoices: Vec<Invoice> =
            list_typed(self.store.as_ref(), collections::INVOICES).await?;
        let flipkart: Vec<FlipkartOrder> =
            list_typed(self.store.as_ref(), collections::FLIPKART_ORDERS).await?;
        let meesho: Vec<MeeshoOrder> =
            list_typed(self.store.as_ref(), collections::MEESHO_ORDERS).await?;

        // 幂等键集合: 既有发票携带的渠道订单号，运行开始时算一次
        let mut reconciled: HashSet<String> = invoices
            .into_iter()
            .filter_map(|inv| inv.channel_order_id)
            .collect();
        let already_invoiced = reconciled.len();

        // === 阶段 2: 候选选取（渠道间固定顺序，渠道内存储返回序） ===
        // 订单号入选即占位: 同一订单号的后续行（重复导入等数据
        // 事故的残留）不再入选，保证一次运行内每个渠道订单号
        // 至多开一张发票
        let mut candidates: Vec<OrderView> = Vec::new();
        for channel in Channel::sync_order() {
            match channel {
                Channel::Flipkart => candidates.extend(
                    flipkart
                        .iter()
                        .map(OrderView::from)
                        .filter(|v| reconciled.insert(v.order_id.clone())),
                ),
                Channel::Meesho => candidates.extend(
                    meesho
                        .iter()
                        .map(OrderView::from)
                        .filter(|v| reconciled.insert(v.order_id.clone())),
                ),
            }
        }

        let total = candidates.len();
        info!(
            total = total,
            catalog = catalog.len(),
            already_invoiced = already_invoiced,
            "候选选取完成"
        );

        // SKU 索引: 按存储原样精确匹配（区分大小写）
        let sku_index: HashMap<&str, &Product> = catalog
            .iter()
            .map(|p| (p.sku.as_str(), p))
            .collect();

        // 影子台账: 目录快照播种一次，运行中途不回读存储
        let mut shadow = ShadowLedger::seed(&catalog);

        // === 阶段 3: 逐单处理 ===
        let mut progress = SyncProgress {
            total,
            ..SyncProgress::default()
        };
        self.progress.report(&progress);

        let mut stock_write_failures: Vec<StockWriteFailure> = Vec::new();

        for order in &candidates {
            match self.process_order(order, &sku_index, &mut shadow).await {
                OrderOutcome::Added => progress.added += 1,
                OrderOutcome::AddedWithStockMiss { product_id } => {
                    progress.added += 1;
                    stock_write_failures.push(StockWriteFailure {
                        channel_order_id: order.order_id.clone(),
                        product_id,
                    });
                }
                OrderOutcome::Skipped => progress.skipped += 1,
                OrderOutcome::Error => progress.errors += 1,
            }
            progress.current += 1;
            // 每单之后发布一次进度，供调用方渲染实时状态
            self.progress.report(&progress);
        }

        // === 阶段 4: 最终报告（永不回滚） ===
        let summary_text = crate::i18n::t_with_args(
            "sync.summary",
            &[
                ("added", &progress.added.to_string()),
                ("skipped", &progress.skipped.to_string()),
                ("errors", &progress.errors.to_string()),
            ],
        );

        info!(
            total = total,
            added = progress.added,
            skipped = progress.skipped,
            errors = progress.errors,
            stock_write_failures = stock_write_failures.len(),
            "对账运行完成"
        );

        Ok(SyncReport {
            total,
            added: progress.added,
            skipped: progress.skipped,
            errors: progress.errors,
            stock_write_failures,
            summary_text,
        })
    }

    /// 处理单笔候选订单（失败就地收敛，绝不向上传播）
    async fn process_order(
        &self,
        order: &OrderView,
        sku_index: &HashMap<&str, &Product>,
        shadow: &mut ShadowLedger,
    ) -> OrderOutcome {
        // 步骤 1: SKU 精确匹配；无映射是预期内情形，跳过
        let product = match sku_index.get(order.sku.as_str()) {
            Some(p) => *p,
            None => {
                debug!(
                    channel = %order.channel,
                    order_id = %order.order_id,
                    sku = %order.sku,
                    "订单 SKU 无目录匹配，跳过"
                );
                return OrderOutcome::Skipped;
            }
        };

        // 步骤 2-4: 扣减数量与单价推导（qty ≥ 1，恒不除零）
        let qty = order.qty_to_deduct(self.config.default_order_quantity);
        let unit_price = order.sale_amount / qty as f64;
        let line_total = unit_price * qty as f64;
        let line_tax = line_total * product.gst_rate / 100.0;

        // 步骤 5: 单行发票，结算视为已收
        let invoice = Invoice {
            id: String::new(),
            date: Utc::now(),
            customer_id: order.channel.as_str().to_lowercase(),
            customer_name: format!("{} Customer", order.channel.as_str()),
            items: vec![InvoiceItem {
                product_id: product.id.clone(),
                product_name: product.title.clone(),
                quantity: qty,
                price: unit_price,
                tax: line_tax,
                total: line_total,
            }],
            sub_total: line_total,
            tax: line_tax,
            total_amount: line_total,
            channel: Some(order.channel),
            channel_order_id: Some(order.order_id.clone()),
            invoice_type: InvoiceType::Sales,
            status: InvoiceStatus::Paid,
        };

        // 步骤 6: 发票落库；失败计 errors，继续下一单
        let body = match encode(&invoice) {
            Ok(body) => body,
            Err(e) => {
                error!(order_id = %order.order_id, error = %e, "发票编码失败");
                return OrderOutcome::Error;
            }
        };
        if let Err(e) = self.store.add(collections::INVOICES, body).await {
            error!(
                channel = %order.channel,
                order_id = %order.order_id,
                error = %e,
                "发票写入失败，本单计入 errors"
            );
            return OrderOutcome::Error;
        }

        // 步骤 7: 影子扣减 + 库存落库（绝对值写入）
        // 发票已存在；库存写失败记入修复清单，后续同商品的
        // 成功写入会连带补上本次扣减
        let new_qty = shadow.deduct(&product.id, qty);
        if let Err(e) = self
            .store
            .update(
                collections::PRODUCTS,
                &product.id,
                json!({ "quantity": new_qty }),
            )
            .await
        {
            warn!(
                order_id = %order.order_id,
                product_id = %product.id,
                error = %e,
                "发票已落库但库存写入失败，记入修复清单"
            );
            return OrderOutcome::AddedWithStockMiss {
                product_id: product.id.clone(),
            };
        }

        OrderOutcome::Added
    }
}

/// 单笔订单的处理结论
enum OrderOutcome {
    Added,
    AddedWithStockMiss { product_id: String },
    Skipped,
    Error,
}
