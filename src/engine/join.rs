// ==========================================
// 葡萄酒贸易数据分析 - 数量/金额表合并
// ==========================================
// 职责: 推断合并键，内连接两张表，按年份配对数量与金额
// 红线: 合并后同名年份列以 SidePair 明确区分数量侧与金额侧，
//       不依赖列名后缀推断
// ==========================================

use crate::domain::{RawTable, YearRange};
use crate::importer::numeric::to_number;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// 候选合并键（标识列 + 实体名称列），按优先级排列
pub const CANDIDATE_JOIN_KEYS: [&str; 4] = ["Id", "País", "Pais", "Country"];

// ==========================================
// JoinKeyStrategy - 合并键推断策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKeyStrategy {
    /// 候选列表中两表都有的列
    CandidateKeys(&'static [&'static str]),
    /// 两表共有的全部非年份列（数量表列序）
    SharedNonYearColumns,
}

impl JoinKeyStrategy {
    pub fn default_strategies() -> Vec<JoinKeyStrategy> {
        vec![
            JoinKeyStrategy::CandidateKeys(&CANDIDATE_JOIN_KEYS),
            JoinKeyStrategy::SharedNonYearColumns,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            JoinKeyStrategy::CandidateKeys(_) => "candidate_keys",
            JoinKeyStrategy::SharedNonYearColumns => "shared_non_year_columns",
        }
    }

    pub fn resolve(&self, quantity: &RawTable, value: &RawTable, range: &YearRange) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        match self {
            JoinKeyStrategy::CandidateKeys(candidates) => {
                for key in candidates.iter() {
                    if quantity.has_column(key) && value.has_column(key) {
                        push_unique(&mut keys, key);
                    }
                }
            }
            JoinKeyStrategy::SharedNonYearColumns => {
                for column in quantity.columns() {
                    if !range.contains_label(column) && value.has_column(column) {
                        push_unique(&mut keys, column);
                    }
                }
            }
        }
        keys
    }
}

fn push_unique(keys: &mut Vec<String>, key: &str) {
    if !keys.iter().any(|k| k == key) {
        keys.push(key.to_string());
    }
}

/// 按策略顺序推断合并键，第一个非空结果胜出
pub fn resolve_join_keys(
    strategies: &[JoinKeyStrategy],
    quantity: &RawTable,
    value: &RawTable,
    range: &YearRange,
) -> Option<Vec<String>> {
    for strategy in strategies {
        let keys = strategy.resolve(quantity, value, range);
        if !keys.is_empty() {
            debug!(strategy = strategy.name(), keys = ?keys, "合并键推断完成");
            return Some(keys);
        }
    }
    None
}

// ==========================================
// SidePair - 同一年份的数量/金额配对
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidePair {
    pub quantity: Option<f64>,
    pub value: Option<f64>,
}

impl SidePair {
    /// 单价 = 金额 / 数量；数量为 0 或缺失、金额缺失时为 None
    pub fn ratio(&self) -> Option<f64> {
        let quantity = self.quantity.filter(|q| *q != 0.0)?;
        let value = self.value?;
        let ratio = value / quantity;
        ratio.is_finite().then_some(ratio)
    }
}

// ==========================================
// MergedTable - 内连接结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    /// 与 MergedTable::keys 一一对应的键值
    pub keys: Vec<String>,
    pub years: BTreeMap<String, SidePair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    pub keys: Vec<String>,
    /// 两侧都有的年份（区间顺序）
    pub years: Vec<String>,
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    pub fn key_index(&self, name: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == name)
    }
}

/// 在给定键上内连接；输出顺序为数量表行序，同一数量行的多个匹配按金额表行序
pub fn inner_join(
    quantity: &RawTable,
    value: &RawTable,
    keys: &[String],
    range: &YearRange,
) -> MergedTable {
    let years: Vec<String> = range
        .labels()
        .into_iter()
        .filter(|y| quantity.has_column(y) && value.has_column(y))
        .filter(|y| !keys.contains(y))
        .collect();

    let q_keys: Vec<usize> = keys.iter().filter_map(|k| quantity.column_index(k)).collect();
    let v_keys: Vec<usize> = keys.iter().filter_map(|k| value.column_index(k)).collect();
    if q_keys.len() != keys.len() || v_keys.len() != keys.len() {
        return MergedTable {
            keys: keys.to_vec(),
            years,
            rows: Vec::new(),
        };
    }

    let q_years: Vec<usize> = years.iter().filter_map(|y| quantity.column_index(y)).collect();
    let v_years: Vec<usize> = years.iter().filter_map(|y| value.column_index(y)).collect();

    let mut index: HashMap<Vec<&str>, Vec<usize>> = HashMap::new();
    for (pos, row) in value.rows().iter().enumerate() {
        let key: Vec<&str> = v_keys.iter().map(|&i| row[i].as_str()).collect();
        index.entry(key).or_default().push(pos);
    }

    let mut rows = Vec::new();
    for q_row in quantity.rows() {
        let key: Vec<&str> = q_keys.iter().map(|&i| q_row[i].as_str()).collect();
        let Some(matches) = index.get(&key) else {
            continue;
        };
        for &pos in matches {
            let v_row = &value.rows()[pos];
            let pairs = years
                .iter()
                .enumerate()
                .map(|(slot, year)| {
                    (
                        year.clone(),
                        SidePair {
                            quantity: to_number(&q_row[q_years[slot]]),
                            value: to_number(&v_row[v_years[slot]]),
                        },
                    )
                })
                .collect();
            rows.push(MergedRow {
                keys: key.iter().map(|k| k.to_string()).collect(),
                years: pairs,
            });
        }
    }

    debug!(keys = ?keys, years = years.len(), rows = rows.len(), "内连接完成");
    MergedTable {
        keys: keys.to_vec(),
        years,
        rows,
    }
}
