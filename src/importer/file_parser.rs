// ==========================================
// 多渠道对账台账系统 - 文件解析器实现
// ==========================================
// 职责: 表格文件 → 有序行序列（首个工作表，要求表头行）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 红线: 行内保持列的原始顺序——别名匹配的先到先得
//       语义依赖表头顺序，禁止使用无序 Map
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 有序的原始行: (表头, 单元格值)，按源文件列顺序排列
pub type RawRow = Vec<(String, String)>;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse_to_raw_rows(&self, path: &Path) -> ImportResult<Vec<RawRow>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: RawRow = record
                .iter()
                .enumerate()
                .filter_map(|(col_idx, value)| {
                    headers
                        .get(col_idx)
                        .map(|h| (h.clone(), value.trim().to_string()))
                })
                .collect();

            // 跳过完全空白的行
            if row.iter().all(|(_, v)| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    pub fn parse_to_raw_rows(&self, path: &Path) -> ImportResult<Vec<RawRow>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 按文件内容自动识别格式，旧式二进制 .xls 同样可读
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 仅读取第一个工作表
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }
        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let row: RawRow = data_row
                .iter()
                .enumerate()
                .filter_map(|(col_idx, cell)| {
                    headers
                        .get(col_idx)
                        .map(|h| (h.clone(), cell.to_string().trim().to_string()))
                })
                .collect();

            // 跳过完全空白的行
            if row.iter().all(|(_, v)| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_rows(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_rows(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
