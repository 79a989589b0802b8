// ==========================================
// 葡萄酒贸易数据分析 - 命令行入口
// ==========================================
// 无命令行参数；目录与年份区间由 VITIBRASIL_* 环境变量配置
// stdout: 每个阶段一行状态；stderr: 日志
// ==========================================

use anyhow::Result;
use vitibrasil_analysis::{logging, AnalysisOrchestrator, ConfigManager};

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", vitibrasil_analysis::APP_NAME, vitibrasil_analysis::VERSION);
    tracing::info!("==================================================");

    let manager = ConfigManager::from_env();
    tracing::info!(config = %manager.get_config_snapshot(), "配置已加载");

    let orchestrator = AnalysisOrchestrator::new(manager.analysis_config());
    for outcome in orchestrator.run()? {
        println!("{}", outcome);
    }

    println!("Analysis finished.");
    Ok(())
}
