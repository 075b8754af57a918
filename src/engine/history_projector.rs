// ==========================================
// 多渠道对账台账系统 - 商品台账投影
// ==========================================
// 职责: 读侧聚合——采购单与发票全扫描，合并为按时间
//       降序的商品流水并给出累计汇总
// 口径: 每次调用全量重算，O(采购单 + 发票)；仅适用于
//       两个集合都较小的规模，生产级数据量需要按商品
//       物化台账替代（这是记录在案的使用边界）
// ==========================================

use crate::domain::{
    Invoice, ProductHistory, PurchaseBill, Transaction, TransactionKind,
};
use crate::engine::error::SyncResult;
use crate::store::{collections, list_typed, DocumentStore};
use std::sync::Arc;
use tracing::debug;

// ==========================================
// HistoryProjector - 台账投影器
// ==========================================
pub struct HistoryProjector<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> HistoryProjector<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 投影指定商品的完整台账
    pub async fn project(&self, product_id: &str) -> SyncResult<ProductHistory> {
        let bills: Vec<PurchaseBill> =
            list_typed(self.store.as_ref(), collections::PURCHASE_BILLS).await?;
        let invoices: Vec<Invoice> =
            list_typed(self.store.as_ref(), collections::INVOICES).await?;

        let mut history = ProductHistory {
            product_id: product_id.to_string(),
            ..ProductHistory::default()
        };

        // 采购侧流水
        for bill in &bills {
            for item in bill.items.iter().filter(|i| i.product_id == product_id) {
                history.total_purchased += item.quantity;
                history.total_spent += item.total;
                history.transactions.push(Transaction {
                    kind: TransactionKind::Purchase,
                    date: bill.date,
                    entity_name: bill.vendor_name.clone(),
                    reference: bill.id.clone(),
                    quantity: item.quantity,
                    unit_price: item.price,
                    total_amount: item.total,
                });
            }
        }

        // 销售侧流水
        for invoice in &invoices {
            for item in invoice.items_for_product(product_id) {
                history.total_sold += item.quantity;
                history.total_revenue += item.total;
                history.transactions.push(Transaction {
                    kind: TransactionKind::Sale,
                    date: invoice.date,
                    entity_name: invoice.customer_name.clone(),
                    reference: invoice.id.clone(),
                    quantity: item.quantity,
                    unit_price: item.price,
                    total_amount: item.total,
                });
            }
        }

        // 合并后按时间降序
        history
            .transactions
            .sort_by(|a, b| b.date.cmp(&a.date));

        debug!(
            product_id = %product_id,
            transactions = history.transactions.len(),
            "台账投影完成"
        );
        Ok(history)
    }
}
