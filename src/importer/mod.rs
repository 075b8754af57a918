// ==========================================
// 多渠道对账台账系统 - 导入层
// ==========================================
// 职责: 外部表格数据导入，生成规范记录
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod alias;
pub mod deduplicator;
pub mod error;
pub mod file_parser;
pub mod product_importer;
pub mod schema_normalizer;

// 重导出核心类型
pub use deduplicator::{DedupOutcome, ImportDeduplicator};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawRow, UniversalFileParser};
pub use product_importer::{ImportReport, ImportSummary, ProductImporter};
pub use schema_normalizer::{NormalizedProducts, SchemaNormalizer, DEFAULT_IMPORT_CATEGORY};
