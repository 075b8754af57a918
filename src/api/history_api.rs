// ==========================================
// 多渠道对账台账系统 - 台账 API
// ==========================================
// 职责: 面向展示层的商品台账查询入口
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::ProductHistory;
use crate::engine::HistoryProjector;
use crate::store::DocumentStore;
use std::sync::Arc;

// ==========================================
// HistoryApi - 台账接口
// ==========================================
pub struct HistoryApi<S: DocumentStore> {
    projector: HistoryProjector<S>,
}

impl<S: DocumentStore> HistoryApi<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            projector: HistoryProjector::new(store),
        }
    }

    /// 查询指定商品的交易台账（按需全量重算）
    pub async fn product_history(&self, product_id: &str) -> ApiResult<ProductHistory> {
        if product_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("商品 ID 不能为空".to_string()));
        }
        Ok(self.projector.project(product_id).await?)
    }
}
