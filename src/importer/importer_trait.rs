// ==========================================
// 葡萄酒贸易数据分析 - 导入 Trait
// ==========================================
// 职责: 定义表格加载接口（不包含实现）
// ==========================================

use crate::domain::RawTable;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// TableLoader Trait
// ==========================================
// 用途: 文件 → RawTable
// 实现者: CsvTableLoader
pub trait TableLoader {
    /// 加载整个文件为原始文本表
    ///
    /// # 返回
    /// - Ok(RawTable): 所有单元格均为文本
    /// - Err(ImportError::FileNotFound): 文件不存在（由调用方决定是否静默跳过）
    /// - Err(ImportError::LoadExhausted): 所有加载策略都失败
    fn load(&self, path: &Path) -> ImportResult<RawTable>;
}
