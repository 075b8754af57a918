// ==========================================
// 多渠道对账台账系统 - 导入 API
// ==========================================
// 职责: 面向展示层的目录/订单导入入口
// ==========================================

use crate::api::error::ApiResult;
use crate::config::EngineConfig;
use crate::domain::Channel;
use crate::importer::{ImportReport, ProductImporter};
use crate::store::DocumentStore;
use std::path::Path;
use std::sync::Arc;

// ==========================================
// ImportApi - 导入接口
// ==========================================
pub struct ImportApi<S: DocumentStore> {
    importer: ProductImporter<S>,
}

impl<S: DocumentStore> ImportApi<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            importer: ProductImporter::new(store, config),
        }
    }

    /// 导入商品目录文件
    pub async fn import_products<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ApiResult<ImportReport> {
        Ok(self.importer.import_file(file_path).await?)
    }

    /// 批量导入多个目录文件（并发）
    pub async fn import_products_many<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportReport, String>> {
        self.importer.import_many(file_paths).await
    }

    /// 导入渠道订单导出文件，返回落库订单数
    pub async fn import_orders<P: AsRef<Path> + Send>(
        &self,
        channel: Channel,
        file_path: P,
    ) -> ApiResult<usize> {
        Ok(self.importer.import_orders_file(channel, file_path).await?)
    }
}
