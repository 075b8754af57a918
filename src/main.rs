// ==========================================
// 多渠道对账与库存台账引擎 - 命令行入口
// ==========================================
// 用法:
//   marketplace-ledger import <文件...>            导入商品目录
//   marketplace-ledger import-orders <渠道> <文件>  导入渠道订单 (flipkart|meesho)
//   marketplace-ledger sync                        运行渠道订单对账
//   marketplace-ledger history <商品ID>            查看商品台账
// ==========================================

use anyhow::{bail, Context, Result};
use marketplace_ledger::app::{get_default_db_path, AppState};
use marketplace_ledger::domain::Channel;
use marketplace_ledger::engine::ChannelProgressSink;
use marketplace_ledger::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", marketplace_ledger::APP_NAME);
    tracing::info!("系统版本: {}", marketplace_ledger::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("无法创建数据目录: {}", parent.display()))?;
    }
    tracing::info!(db_path = %db_path.display(), "使用数据库");

    let state = AppState::new(db_path.to_string_lossy().into_owned())
        .map_err(|e| anyhow::anyhow!(e))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("import") => {
            let files = &args[1..];
            if files.is_empty() {
                bail!("用法: marketplace-ledger import <文件...>");
            }
            for file in files {
                let report = state.import_api.import_products(file).await?;
                println!("{}: {}", file, report.summary_text);
            }
        }
        Some("import-orders") => {
            let (channel, file) = match (args.get(1), args.get(2)) {
                (Some(c), Some(f)) => (c, f),
                _ => bail!("用法: marketplace-ledger import-orders <flipkart|meesho> <文件>"),
            };
            let channel = Channel::parse(channel)
                .with_context(|| format!("未知渠道: {}", channel))?;
            let count = state.import_api.import_orders(channel, file).await?;
            println!("{} 订单落库: {} 条", channel.as_str(), count);
        }
        Some("sync") => {
            let (sink, mut rx) = ChannelProgressSink::new();
            let printer = tokio::spawn(async move {
                while let Some(p) = rx.recv().await {
                    println!(
                        "进度 {}/{} 新增 {} 跳过 {} 失败 {}",
                        p.current, p.total, p.added, p.skipped, p.errors
                    );
                }
            });

            let report = state.sync_api.run_with_progress(sink).await?;
            let _ = printer.await;

            println!("{}", report.summary_text);
            for miss in &report.stock_write_failures {
                println!(
                    "库存写入失败待修复: 订单 {} 商品 {}",
                    miss.channel_order_id, miss.product_id
                );
            }
        }
        Some("history") => {
            let product_id = args
                .get(1)
                .context("用法: marketplace-ledger history <商品ID>")?;
            let history = state.history_api.product_history(product_id).await?;
            println!(
                "商品 {}: 采购 {} 件 / {:.2} 元, 销售 {} 件 / {:.2} 元",
                history.product_id,
                history.total_purchased,
                history.total_spent,
                history.total_sold,
                history.total_revenue
            );
            for tx in &history.transactions {
                println!(
                    "{} {:?} {} x{} @{:.2} = {:.2} ({})",
                    tx.date.format("%Y-%m-%d"),
                    tx.kind,
                    tx.entity_name,
                    tx.quantity,
                    tx.unit_price,
                    tx.total_amount,
                    tx.reference
                );
            }
        }
        _ => {
            println!("{} v{}", marketplace_ledger::APP_NAME, marketplace_ledger::VERSION);
            println!();
            println!("用法:");
            println!("  marketplace-ledger import <文件...>");
            println!("  marketplace-ledger import-orders <flipkart|meesho> <文件>");
            println!("  marketplace-ledger sync");
            println!("  marketplace-ledger history <商品ID>");
        }
    }

    Ok(())
}
