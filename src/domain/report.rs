// ==========================================
// 葡萄酒贸易数据分析 - 报告实体
// ==========================================
// 职责: 三类分析的输出记录（质量审计 / CAGR / 单价序列）
// 红线: 生成后不再修改
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ColumnStat - 单列质量统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStat {
    pub column: String,   // 列名（原样）
    pub missing: usize,   // 缺失数（空或仅空白）
    pub missing_pct: f64, // missing / max(1, rows)
    pub unique: usize,    // 非缺失值的去重计数
}

// ==========================================
// FileQualityReport - 单文件质量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileQualityReport {
    pub file: String,
    pub rows: usize,
    pub cols: usize,
    pub duplicate_rows: usize,
    pub columns: Vec<ColumnStat>,
}

impl FileQualityReport {
    pub fn summary_row(&self) -> QualitySummaryRow {
        QualitySummaryRow {
            file: self.file.clone(),
            rows: self.rows,
            cols: self.cols,
            duplicate_rows: self.duplicate_rows,
        }
    }
}

/// data_quality_summary.csv 的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySummaryRow {
    pub file: String,
    pub rows: usize,
    pub cols: usize,
    pub duplicate_rows: usize,
}

// ==========================================
// CagrRecord - 实体复合年增长率
// ==========================================
/// `cagr` 为 None 表示无法定义（起始值非正、终值为负或只有一个年份）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CagrRecord {
    #[serde(rename = "País")]
    pub entity: String,
    pub start_year: String,
    pub start_val: f64,
    pub end_year: String,
    pub end_val: f64,
    #[serde(rename = "CAGR")]
    pub cagr: Option<f64>,
}

// ==========================================
// PriceRecord - 实体年度平均单价
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub entity: String,
    /// 年份标签 → 平均单价；None 表示该年无可用单价
    pub prices: BTreeMap<String, Option<f64>>,
}

impl PriceRecord {
    pub fn price(&self, year: &str) -> Option<f64> {
        self.prices.get(year).copied().flatten()
    }
}

/// 单价分析结果：国家列名 + 计算出的年份 + 按实体排序的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub entity_column: String,
    pub years: Vec<String>,
    pub records: Vec<PriceRecord>,
}

impl PriceTable {
    /// 输出表头：国家列 + avg_price_<year>
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(self.entity_column.clone())
            .chain(self.years.iter().map(|y| format!("avg_price_{}", y)))
            .collect()
    }

    pub fn record(&self, entity: &str) -> Option<&PriceRecord> {
        self.records.iter().find(|r| r.entity == entity)
    }
}
