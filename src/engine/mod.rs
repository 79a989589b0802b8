// ==========================================
// 葡萄酒贸易数据分析 - 引擎层
// ==========================================
// 职责: 质量审计、增长率、出口单价三类分析与编排
// 红线: 引擎不读写文件（编排器除外），无法完成时返回跳过原因
// ==========================================

pub mod growth;
pub mod join;
pub mod orchestrator;
pub mod price;
pub mod quality_auditor;

// 重导出核心引擎
pub use growth::{cagr, sort_by_cagr, GrowthAnalyzer};
pub use join::{inner_join, resolve_join_keys, JoinKeyStrategy, MergedTable, SidePair};
pub use orchestrator::AnalysisOrchestrator;
pub use price::PriceAnalyzer;
pub use quality_auditor::QualityAuditor;
