// ==========================================
// 多渠道对账台账系统 - SyncReconciler 集成测试
// ==========================================
// 覆盖: 幂等运行、影子台账扣减、单笔失败收敛、进度发布
// ==========================================


use marketplace_ledger::config::EngineConfig;
use marketplace_ledger::domain::{Channel, Invoice, InvoiceStatus, InvoiceType, Product};
use marketplace_ledger::engine::{ChannelProgressSink, SyncReconciler};
use marketplace_ledger::store::memory::InMemoryStore;
use marketplace_ledger::store::{collections, list_typed};
use std::sync::Arc;
use test_helpers::*;

fn reconciler(store: &Arc<InMemoryStore>) -> SyncReconciler<InMemoryStore> {
    init_logging();
    SyncReconciler::new(store.clone(), EngineConfig::default())
}

async fn current_quantity(store: &InMemoryStore, product_id: &str) -> i64 {
    let doc = store.get(collections::PRODUCTS, product_id).expect("商品不存在");
    let product: Product = doc.decode().expect("商品解码失败");
    product.quantity
}

// ==========================================
// 基本流程: 两单同 SKU，影子台账连续扣减
// ==========================================
#[tokio::test]
async fn test_two_orders_same_sku_deduct_in_sequence() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 200.0, Some(2));
    seed_flipkart_order(&store, "FK-2", "SKU-1", 300.0, Some(3));

    let report = reconciler(&store).run().await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.added, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 0);
    assert!(report.stock_write_failures.is_empty());

    // 10 - 2 - 3 = 5，两单之间不经存储回读
    assert_eq!(current_quantity(&store, "p1").await, 5);

    let invoices: Vec<Invoice> = list_typed(store.as_ref(), collections::INVOICES)
        .await
        .unwrap();
    assert_eq!(invoices.len(), 2);
    for inv in &invoices {
        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert_eq!(inv.invoice_type, InvoiceType::Sales);
        assert_eq!(inv.channel, Some(Channel::Flipkart));
        assert_eq!(inv.items.len(), 1);
    }
}

// ==========================================
// SKU 无匹配: 计 skipped，不产生发票
// ==========================================
#[tokio::test]
async fn test_unmatched_sku_is_skipped() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 100.0, Some(1));
    seed_meesho_order(&store, "MS-1", "UNKNOWN-SKU", 50.0, Some(1));

    let report = reconciler(&store).run().await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.added, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors, 0);
    assert_eq!(current_quantity(&store, "p1").await, 9);
}

// ==========================================
// SKU 匹配区分大小写（按存储原样）
// ==========================================
#[tokio::test]
async fn test_sku_match_is_case_sensitive() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "sku-1", 100.0, Some(1));

    let report = reconciler(&store).run().await.unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.added, 0);
    assert_eq!(current_quantity(&store, "p1").await, 10);
}

// ==========================================
// 幂等: 已开票订单不进入候选；二次运行零新增
// ==========================================
#[tokio::test]
async fn test_already_invoiced_order_excluded_from_candidates() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 100.0, Some(1));
    seed_flipkart_order(&store, "FK-2", "SKU-1", 100.0, Some(1));
    seed_synced_invoice(&store, "inv-old", Channel::Flipkart, "FK-1");

    let report = reconciler(&store).run().await.unwrap();

    // FK-1 已有发票，甚至不计入 total
    assert_eq!(report.total, 1);
    assert_eq!(report.added, 1);
    assert_eq!(current_quantity(&store, "p1").await, 9);
}

#[tokio::test]
async fn test_duplicate_order_rows_invoiced_once() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    // 同一渠道订单号出现两行（重复导入等数据事故的残留）
    seed_flipkart_order(&store, "FK-1", "SKU-1", 200.0, Some(2));
    store.seed(
        collections::FLIPKART_ORDERS,
        "dup-row",
        serde_json::json!({
            "orderItemId": "FK-1",
            "sku": "SKU-1",
            "saleAmount": 200.0,
            "quantity": 2
        }),
    );

    let report = reconciler(&store).run().await.unwrap();

    // 订单号入选即占位: 第二行不进入候选
    assert_eq!(report.total, 1);
    assert_eq!(report.added, 1);
    assert_eq!(current_quantity(&store, "p1").await, 8);

    let invoices: Vec<Invoice> = list_typed(store.as_ref(), collections::INVOICES)
        .await
        .unwrap();
    let fk1_count = invoices
        .iter()
        .filter(|i| i.channel_order_id.as_deref() == Some("FK-1"))
        .count();
    assert_eq!(fk1_count, 1);
}

#[tokio::test]
async fn test_second_run_adds_nothing() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 200.0, Some(2));
    seed_meesho_order(&store, "MS-1", "SKU-1", 100.0, Some(1));

    let first = reconciler(&store).run().await.unwrap();
    assert_eq!(first.added, 2);
    assert_eq!(current_quantity(&store, "p1").await, 7);

    let second = reconciler(&store).run().await.unwrap();
    assert_eq!(second.total, 0);
    assert_eq!(second.added, 0);
    assert_eq!(current_quantity(&store, "p1").await, 7);
}

// ==========================================
// 数量缺失或为 0: 按默认数量 1 扣减
// ==========================================
#[tokio::test]
async fn test_missing_or_zero_quantity_defaults_to_one() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 150.0, None);
    seed_meesho_order(&store, "MS-1", "SKU-1", 80.0, Some(0));

    let report = reconciler(&store).run().await.unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(current_quantity(&store, "p1").await, 8);

    // 数量 1 时单价即订单金额
    let invoices: Vec<Invoice> = list_typed(store.as_ref(), collections::INVOICES)
        .await
        .unwrap();
    let fk = invoices
        .iter()
        .find(|i| i.channel_order_id.as_deref() == Some("FK-1"))
        .unwrap();
    assert_eq!(fk.items[0].quantity, 1);
    assert!((fk.items[0].price - 150.0).abs() < 1e-9);
}

// ==========================================
// 金额恒等: 单价 x 数量 == 订单金额
// ==========================================
#[tokio::test]
async fn test_invoice_amount_identity() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_meesho_order(&store, "MS-1", "SKU-1", 299.0, Some(3));

    reconciler(&store).run().await.unwrap();

    let invoices: Vec<Invoice> = list_typed(store.as_ref(), collections::INVOICES)
        .await
        .unwrap();
    let inv = &invoices[0];
    assert_eq!(inv.items[0].quantity, 3);
    assert!((inv.items[0].price * 3.0 - 299.0).abs() < 1e-9);
    assert!((inv.total_amount - 299.0).abs() < 1e-9);
}

// ==========================================
// 渠道顺序: Flipkart 先于 Meesho
// ==========================================
#[tokio::test]
async fn test_flipkart_processed_before_meesho() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_meesho_order(&store, "MS-1", "SKU-1", 100.0, Some(1));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 100.0, Some(1));

    reconciler(&store).run().await.unwrap();

    let invoices: Vec<Invoice> = list_typed(store.as_ref(), collections::INVOICES)
        .await
        .unwrap();
    assert_eq!(invoices[0].channel_order_id.as_deref(), Some("FK-1"));
    assert_eq!(invoices[1].channel_order_id.as_deref(), Some("MS-1"));
}

// ==========================================
// 单笔发票写入失败: 计 errors，不中断后续订单
// ==========================================
#[tokio::test]
async fn test_invoice_write_failure_contained_per_order() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 100.0, Some(2));
    seed_flipkart_order(&store, "FK-2", "SKU-1", 100.0, Some(3));
    // 第一次发票 add 注入失败
    store.fail_add_at(collections::INVOICES, 1);

    let report = reconciler(&store).run().await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.added, 1);
    assert_eq!(report.errors, 1);
    assert_eq!(report.added + report.skipped + report.errors, report.total);

    // 失败单未扣库存，成功单正常扣减
    assert_eq!(current_quantity(&store, "p1").await, 7);

    let invoices: Vec<Invoice> = list_typed(store.as_ref(), collections::INVOICES)
        .await
        .unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].channel_order_id.as_deref(), Some("FK-2"));
}

// ==========================================
// 库存写入失败: 发票保留，记入修复清单；后续同商品
// 订单按影子台账继续推进（绝对值写入自愈）
// ==========================================
#[tokio::test]
async fn test_stock_write_failure_recorded_and_self_heals() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 100.0, Some(2));
    seed_flipkart_order(&store, "FK-2", "SKU-1", 100.0, Some(3));
    store.fail_update_for(collections::PRODUCTS, "p1");

    let report = reconciler(&store).run().await.unwrap();

    // 两单均已开票；库存写入两次都失败
    assert_eq!(report.added, 2);
    assert_eq!(report.errors, 0);
    assert_eq!(report.stock_write_failures.len(), 2);
    assert_eq!(report.stock_write_failures[0].channel_order_id, "FK-1");
    assert_eq!(report.stock_write_failures[0].product_id, "p1");

    // 存储侧库存未动
    assert_eq!(current_quantity(&store, "p1").await, 10);

    let invoices: Vec<Invoice> = list_typed(store.as_ref(), collections::INVOICES)
        .await
        .unwrap();
    assert_eq!(invoices.len(), 2);
}

// ==========================================
// 进度发布: 初始快照 + 每单一次
// ==========================================
#[tokio::test]
async fn test_progress_reported_after_each_order() {
    let store = Arc::new(InMemoryStore::new());
    seed_product(&store, &make_product("p1", "SKU-1", 10, 100.0));
    seed_flipkart_order(&store, "FK-1", "SKU-1", 100.0, Some(1));
    seed_meesho_order(&store, "MS-1", "UNKNOWN", 50.0, Some(1));

    let (sink, mut rx) = ChannelProgressSink::new();
    let report = reconciler(&store).with_progress(sink).run().await.unwrap();
    assert_eq!(report.total, 2);

    let mut snapshots = Vec::new();
    while let Ok(p) = rx.try_recv() {
        snapshots.push(p);
    }

    // 一次初始发布 + 每单之后各一次
    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[0].current, 0);
    assert_eq!(snapshots[0].total, 2);
    assert_eq!(snapshots[1].current, 1);
    assert_eq!(snapshots[2].current, 2);
    assert_eq!(snapshots[2].added, 1);
    assert_eq!(snapshots[2].skipped, 1);
}

// ==========================================
// 空输入: 零候选的平凡运行
// ==========================================
#[tokio::test]
async fn test_empty_store_yields_empty_report() {
    let store = Arc::new(InMemoryStore::new());

    let report = reconciler(&store).run().await.unwrap();

    assert_eq!(report.total, 0);
    assert_eq!(report.added, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 0);
    assert!(!report.summary_text.is_empty());
}
