// ==========================================
// 葡萄酒贸易数据分析 - 配置层
// ==========================================
// 职责: 运行配置管理（目录 / 年份区间 / 识别规则开关）
// 存储: 环境变量，无配置文件
// ==========================================

pub mod analysis_config;
pub mod config_manager;

// 重导出核心配置管理器
pub use analysis_config::AnalysisConfig;
pub use config_manager::{config_keys, ConfigManager};
