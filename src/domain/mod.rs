// ==========================================
// 葡萄酒贸易数据分析 - 领域模型层
// ==========================================
// 职责: 定义原始表格、报告实体、阶段结果
// 红线: 不含文件读写逻辑,不含分析逻辑
// ==========================================

pub mod outcome;
pub mod report;
pub mod table;
pub mod types;

// 重导出核心类型
pub use outcome::{Resolution, SkipReason, Stage, StageOutcome};
pub use report::{
    CagrRecord, ColumnStat, FileQualityReport, PriceRecord, PriceTable, QualitySummaryRow,
};
pub use table::RawTable;
pub use types::YearRange;
