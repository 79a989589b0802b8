// ==========================================
// 葡萄酒贸易数据分析 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、默认值回退
// 来源: 环境变量 VITIBRASIL_<KEY>，或显式传入的键值表
// ==========================================

use crate::config::analysis_config::AnalysisConfig;
use crate::domain::YearRange;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "VITIBRASIL_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 从环境变量读取配置（VITIBRASIL_DATA_DIR → data_dir）
    pub fn from_env() -> Self {
        let values = std::env::vars()
            .filter_map(|(k, v)| {
                k.strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_lowercase(), v))
            })
            .collect();
        Self { values }
    }

    /// 从显式键值表创建（测试或嵌入调用使用）
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(&str): 配置值（已 trim，空值视为未配置）
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key).unwrap_or(default).to_string()
    }

    /// 读取可解析配置；解析失败时记录警告并回退默认值
    fn get_parsed_or_default<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
                warn!(key, value = raw, "配置值格式错误，使用默认值");
                default
            }),
        }
    }

    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(config_keys::DATA_DIR, "."))
    }

    pub fn get_output_dir(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(config_keys::OUTPUT_DIR, "."))
    }

    pub fn get_year_range(&self) -> YearRange {
        let start = self.get_parsed_or_default(config_keys::YEAR_START, YearRange::DEFAULT_START);
        let end = self.get_parsed_or_default(config_keys::YEAR_END, YearRange::DEFAULT_END);
        YearRange::new(start, end)
    }

    pub fn get_loose_entity_match(&self) -> bool {
        match self.get_config_value(config_keys::LOOSE_ENTITY_MATCH) {
            None => true,
            Some(v) => is_true(v),
        }
    }

    /// 生成一次运行使用的配置快照
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            data_dir: self.get_data_dir(),
            output_dir: self.get_output_dir(),
            years: self.get_year_range(),
            loose_entity_match: self.get_loose_entity_match(),
        }
    }

    /// 生效配置的 JSON 快照（写入启动日志）
    pub fn get_config_snapshot(&self) -> String {
        let cfg = self.analysis_config();
        let mut map = Map::new();
        map.insert(
            config_keys::DATA_DIR.to_string(),
            json!(cfg.data_dir.display().to_string()),
        );
        map.insert(
            config_keys::OUTPUT_DIR.to_string(),
            json!(cfg.output_dir.display().to_string()),
        );
        map.insert(config_keys::YEAR_START.to_string(), json!(cfg.years.start));
        map.insert(config_keys::YEAR_END.to_string(), json!(cfg.years.end));
        map.insert(
            config_keys::LOOSE_ENTITY_MATCH.to_string(),
            json!(cfg.loose_entity_match),
        );
        Value::Object(map).to_string()
    }
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 目录
    pub const DATA_DIR: &str = "data_dir";
    pub const OUTPUT_DIR: &str = "output_dir";

    // 参考年份区间
    pub const YEAR_START: &str = "year_start";
    pub const YEAR_END: &str = "year_end";

    // 实体列识别: 是否启用 "pa" 片段匹配
    pub const LOOSE_ENTITY_MATCH: &str = "loose_entity_match";
}
