// ==========================================
// 葡萄酒贸易数据分析 - 阶段结果
// ==========================================
// 职责: 把"无法完成"表达为值，而不是错误
// 红线: 跳过的阶段不写任何输出文件
// ==========================================

use std::fmt;
use std::path::PathBuf;

// ==========================================
// SkipReason - 跳过原因
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 两个商业化文件都不存在
    CommercializationMissing,
    /// 出口数量/金额文件不成对
    ExportPairMissing,
    /// 所有加载策略都失败
    LoadFailed { file: String, reason: String },
    NoEntityColumn { file: String },
    NoYearColumns { file: String },
    NoJoinKeys,
    NoCountryKey,
    NoPriceColumns,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::CommercializationMissing => {
                write!(f, "No comercializacao CSV found; skipping CAGR")
            }
            SkipReason::ExportPairMissing => write!(
                f,
                "Exportacao qtd/valor CSVs not both present; skipping price per liter"
            ),
            SkipReason::LoadFailed { file, reason } => {
                write!(f, "Could not load {}; skipping ({})", file, reason)
            }
            SkipReason::NoEntityColumn { file } => {
                write!(f, "Country column not found for {}; skipping CAGR", file)
            }
            SkipReason::NoYearColumns { file } => {
                write!(f, "No year columns present for {}", file)
            }
            SkipReason::NoJoinKeys => {
                write!(f, "No join keys found between exportacao qtd and valor")
            }
            SkipReason::NoCountryKey => write!(f, "No country key found to aggregate prices"),
            SkipReason::NoPriceColumns => write!(f, "No price columns computed"),
        }
    }
}

/// 分析函数的返回类型：成功结果或明确的跳过原因
pub type Resolution<T> = Result<T, SkipReason>;

// ==========================================
// Stage / StageOutcome - 阶段与其结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    QualityAudit,
    Growth,
    Price,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::QualityAudit => write!(f, "quality_audit"),
            Stage::Growth => write!(f, "growth"),
            Stage::Price => write!(f, "price"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Written {
        stage: Stage,
        artifacts: Vec<PathBuf>,
    },
    Skipped {
        stage: Stage,
        reason: SkipReason,
    },
}

impl StageOutcome {
    pub fn stage(&self) -> Stage {
        match self {
            StageOutcome::Written { stage, .. } | StageOutcome::Skipped { stage, .. } => *stage,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, StageOutcome::Written { .. })
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            StageOutcome::Skipped { reason, .. } => Some(reason),
            StageOutcome::Written { .. } => None,
        }
    }
}

/// 单行状态文本（打印到 stdout）
impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Skipped { reason, .. } => write!(f, "{}", reason),
            StageOutcome::Written { stage, artifacts } => {
                let names: Vec<String> = artifacts
                    .iter()
                    .map(|p| {
                        p.file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| p.display().to_string())
                    })
                    .collect();
                match stage {
                    Stage::QualityAudit => {
                        write!(f, "Data quality report written: {}", names.join(" and "))
                    }
                    Stage::Growth => {
                        write!(f, "CAGR comercializacao saved to {}", names.join(", "))
                    }
                    Stage::Price => write!(
                        f,
                        "Price per liter exportacao saved to {}",
                        names.join(", ")
                    ),
                }
            }
        }
    }
}
