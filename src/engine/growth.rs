// ==========================================
// 葡萄酒贸易数据分析 - 复合年增长率引擎
// ==========================================
// 职责: 按实体分组求年度合计，计算首末年份间的 CAGR
// 口径: 无法解析的年度值按 0 计入（未申报视为无交易）
// 红线: CAGR 无法定义时为 None，而不是 0
// ==========================================

use crate::domain::{CagrRecord, RawTable};
use crate::importer::numeric::to_number_or_zero;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

pub struct GrowthAnalyzer;

impl GrowthAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 计算每个实体的 CAGR，结果按 CAGR 降序（None 在最后）
    ///
    /// # 返回
    /// - None: years 为空，或实体列/年份列不在表中（调用方需报告"跳过"，不写空文件）
    /// - Some(records): 每个实体一条记录
    ///
    /// 实体列值为空的行不参与分组。
    pub fn compute_cagr(
        &self,
        table: &RawTable,
        entity_column: &str,
        years: &[String],
    ) -> Option<Vec<CagrRecord>> {
        let (first_year, last_year) = match (years.first(), years.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return None,
        };

        let entity_idx = table.column_index(entity_column)?;
        let year_idx: Vec<usize> = years
            .iter()
            .filter_map(|y| table.column_index(y))
            .collect();
        if year_idx.len() != years.len() {
            return None;
        }

        // 实体 → 各年度合计（BTreeMap 保证分组顺序确定）
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for row in table.rows() {
            let entity = row[entity_idx].as_str();
            if entity.trim().is_empty() {
                continue;
            }
            let sums = groups
                .entry(entity)
                .or_insert_with(|| vec![0.0; year_idx.len()]);
            for (slot, &idx) in year_idx.iter().enumerate() {
                sums[slot] += to_number_or_zero(&row[idx]);
            }
        }

        let steps = years.len() - 1;
        let mut records: Vec<CagrRecord> = groups
            .into_iter()
            .map(|(entity, sums)| {
                let start = sums[0];
                let end = sums[sums.len() - 1];
                CagrRecord {
                    entity: entity.to_string(),
                    start_year: first_year.clone(),
                    start_val: start,
                    end_year: last_year.clone(),
                    end_val: end,
                    cagr: cagr(start, end, steps),
                }
            })
            .collect();

        sort_by_cagr(&mut records);
        debug!(entities = records.len(), years = years.len(), "CAGR 计算完成");
        Some(records)
    }
}

impl Default for GrowthAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// (end/start)^(1/n) - 1，仅当 start > 0、end >= 0、n > 0 时有定义
pub fn cagr(start: f64, end: f64, steps: usize) -> Option<f64> {
    if start > 0.0 && end >= 0.0 && steps > 0 {
        let value = (end / start).powf(1.0 / steps as f64) - 1.0;
        value.is_finite().then_some(value)
    } else {
        None
    }
}

/// 降序比较，None 排在所有数值之后
pub fn compare_cagr(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 稳定排序：并列（含 None 之间）保持原有的实体顺序
pub fn sort_by_cagr(records: &mut [CagrRecord]) {
    records.sort_by(|a, b| compare_cagr(a.cagr, b.cagr));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn years(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|y| y.to_string()).collect()
    }

    #[test]
    fn test_cagr_ten_percent() {
        let table = RawTable::new(
            row(&["País", "2009", "2010", "2011"]),
            vec![row(&["X", "100", "110", "121"])],
        );

        let records = GrowthAnalyzer::new()
            .compute_cagr(&table, "País", &years(&["2009", "2010", "2011"]))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_year, "2009");
        assert_eq!(records[0].end_year, "2011");
        assert_eq!(records[0].start_val, 100.0);
        assert_eq!(records[0].end_val, 121.0);
        assert!((records[0].cagr.unwrap() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_zero_start_is_undefined() {
        assert_eq!(cagr(0.0, 121.0, 2), None);
        assert_eq!(cagr(0.0, 0.0, 2), None);
        assert_eq!(cagr(100.0, -1.0, 2), None);
        assert_eq!(cagr(100.0, 121.0, 0), None);
        assert_eq!(cagr(100.0, 0.0, 2), Some(-1.0));
    }

    #[test]
    fn test_groups_sum_rows_and_missing_counts_as_zero() {
        let table = RawTable::new(
            row(&["País", "2009", "2010"]),
            vec![
                row(&["Chile", "1.000", "n/d"]),
                row(&["Chile", "500", "3.000"]),
                row(&["", "999", "999"]),
                row(&["Peru", "", "10"]),
            ],
        );

        let records = GrowthAnalyzer::new()
            .compute_cagr(&table, "País", &years(&["2009", "2010"]))
            .unwrap();

        assert_eq!(records.len(), 2);
        let chile = records.iter().find(|r| r.entity == "Chile").unwrap();
        assert_eq!(chile.start_val, 1500.0);
        assert_eq!(chile.end_val, 3000.0);
        assert!((chile.cagr.unwrap() - 1.0).abs() < 1e-12);

        let peru = records.iter().find(|r| r.entity == "Peru").unwrap();
        assert_eq!(peru.start_val, 0.0);
        assert_eq!(peru.cagr, None);
    }

    #[test]
    fn test_empty_years_produce_no_output() {
        let table = RawTable::new(row(&["País"]), vec![row(&["Chile"])]);
        assert_eq!(GrowthAnalyzer::new().compute_cagr(&table, "País", &[]), None);
    }

    #[test]
    fn test_absent_columns_produce_no_output() {
        let table = RawTable::new(row(&["País", "2009"]), vec![row(&["Chile", "5"])]);
        let analyzer = GrowthAnalyzer::new();

        assert_eq!(analyzer.compute_cagr(&table, "Country", &years(&["2009"])), None);
        assert_eq!(
            analyzer.compute_cagr(&table, "País", &years(&["2009", "2010"])),
            None
        );
    }

    #[test]
    fn test_single_year_is_undefined() {
        let table = RawTable::new(row(&["País", "2009"]), vec![row(&["Chile", "5"])]);
        let records = GrowthAnalyzer::new()
            .compute_cagr(&table, "País", &years(&["2009"]))
            .unwrap();
        assert_eq!(records[0].cagr, None);
    }

    #[test]
    fn test_sort_descending_with_undefined_last() {
        let mut records: Vec<CagrRecord> = [Some(0.2), None, Some(0.5), Some(-0.1)]
            .iter()
            .enumerate()
            .map(|(i, c)| CagrRecord {
                entity: format!("E{}", i),
                start_year: "2009".to_string(),
                start_val: 1.0,
                end_year: "2023".to_string(),
                end_val: 1.0,
                cagr: *c,
            })
            .collect();

        sort_by_cagr(&mut records);

        let order: Vec<Option<f64>> = records.iter().map(|r| r.cagr).collect();
        assert_eq!(order, vec![Some(0.5), Some(0.2), Some(-0.1), None]);
    }

    #[test]
    fn test_undefined_ties_keep_entity_order() {
        let table = RawTable::new(
            row(&["País", "2009", "2010"]),
            vec![
                row(&["Zambia", "0", "1"]),
                row(&["Angola", "0", "1"]),
                row(&["Brasil", "1", "2"]),
            ],
        );

        let records = GrowthAnalyzer::new()
            .compute_cagr(&table, "País", &years(&["2009", "2010"]))
            .unwrap();

        let entities: Vec<&str> = records.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, vec!["Brasil", "Angola", "Zambia"]);
    }
}
