// ==========================================
// 葡萄酒贸易数据分析 - 运行配置快照
// ==========================================
// 职责: 一次运行所需的目录、年份区间与输入/输出文件名
// ==========================================

use crate::domain::YearRange;
use std::path::{Path, PathBuf};

// ===== 输入文件（按名称查找，均可缺失） =====

/// 商业化数据，按顺序取第一个存在的文件
pub const COMMERCIALIZATION_FILES: [&str; 2] =
    ["comercializacao_filtrada.csv", "Comercializacao.csv"];

pub const EXPORT_QUANTITY_FILE: &str = "exportacao_qtd.csv";
pub const EXPORT_VALUE_FILE: &str = "exportacao_valor.csv";

/// 质量审计覆盖的全部文件
pub const QUALITY_AUDIT_FILES: [&str; 8] = [
    "comercializacao_filtrada.csv",
    "Comercializacao.csv",
    "exportacao_qtd.csv",
    "exportacao_valor.csv",
    "importacao_qtd.csv",
    "importacao_valor.csv",
    "producao_filtrada.csv",
    "processamento_filtrado.csv",
];

// ===== 输出文件 =====
pub const QUALITY_REPORT_FILE: &str = "data_quality_report.json";
pub const QUALITY_SUMMARY_FILE: &str = "data_quality_summary.csv";
pub const CAGR_FILE: &str = "cagr_comercializacao.csv";
pub const PRICE_FILE: &str = "price_per_liter_exportacao.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub years: YearRange,
    pub loose_entity_match: bool,
}

impl AnalysisConfig {
    /// 数据目录与输出目录相同的便捷构造
    pub fn for_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            data_dir: dir.as_ref().to_path_buf(),
            output_dir: dir.as_ref().to_path_buf(),
            years: YearRange::default(),
            loose_entity_match: true,
        }
    }

    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::for_dir(".")
    }
}
