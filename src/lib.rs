// ==========================================
// 葡萄酒贸易数据分析 - 核心库
// ==========================================
// 输入: Embrapa Vitibrasil 导出的 CSV（商业化 / 进出口 / 生产 / 加工）
// 输出: 数据质量报告、商业化 CAGR、出口年度单价
// 运行方式: 单次批处理，顺序执行，无外部服务
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格与报告实体
pub mod domain;

// 导入层 - CSV 加载与列识别
pub mod importer;

// 引擎层 - 分析规则与编排
pub mod engine;

// 输出层 - 报告写出
pub mod output;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{AnalysisConfig, ConfigManager};
pub use domain::{
    CagrRecord, FileQualityReport, PriceTable, RawTable, SkipReason, Stage, StageOutcome,
    YearRange,
};
pub use engine::{AnalysisOrchestrator, GrowthAnalyzer, PriceAnalyzer, QualityAuditor};
pub use importer::{ColumnResolver, CsvTableLoader, ImportError, TableLoader};
pub use output::ReportWriter;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "vitibrasil-analysis";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
