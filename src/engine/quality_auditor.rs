// ==========================================
// 葡萄酒贸易数据分析 - 数据质量审计
// ==========================================
// 职责: 文件级（行数/列数/重复行）与列级（缺失/去重）统计
// 红线: 不抛错；零行表格得到全零统计
// ==========================================

use crate::domain::{ColumnStat, FileQualityReport, RawTable};
use std::collections::HashSet;
use tracing::debug;

pub struct QualityAuditor;

impl QualityAuditor {
    pub fn new() -> Self {
        Self
    }

    /// 审计单个文件
    ///
    /// # 口径
    /// - 重复行: 与前面某行逐字节相同的行（首次出现不计）
    /// - 缺失: trim 后为空的单元格
    /// - 去重数: 不含缺失值
    /// - 缺失率: missing / max(1, rows)
    pub fn audit(&self, table: &RawTable, file_name: &str) -> FileQualityReport {
        let rows = table.row_count();
        let denominator = rows.max(1) as f64;

        let columns = table
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut missing = 0usize;
                let mut distinct: HashSet<&str> = HashSet::new();
                for value in table.column_values(idx) {
                    if is_missing(value) {
                        missing += 1;
                    } else {
                        distinct.insert(value);
                    }
                }
                ColumnStat {
                    column: name.clone(),
                    missing,
                    missing_pct: missing as f64 / denominator,
                    unique: distinct.len(),
                }
            })
            .collect();

        let report = FileQualityReport {
            file: file_name.to_string(),
            rows,
            cols: table.column_count(),
            duplicate_rows: count_duplicate_rows(table),
            columns,
        };

        debug!(
            file = file_name,
            rows = report.rows,
            cols = report.cols,
            duplicate_rows = report.duplicate_rows,
            "质量审计完成"
        );
        report
    }
}

impl Default for QualityAuditor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_missing(value: &str) -> bool {
    value.trim().is_empty()
}

fn count_duplicate_rows(table: &RawTable) -> usize {
    let mut seen: HashSet<&[String]> = HashSet::with_capacity(table.row_count());
    table
        .rows()
        .iter()
        .filter(|row| !seen.insert(row.as_slice()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_table() -> RawTable {
        RawTable::new(
            row(&["Id", "País", "2009"]),
            vec![
                row(&["1", "Chile", "10"]),
                row(&["2", "Peru", "  "]),
                row(&["3", "Chile", ""]),
            ],
        )
    }

    #[test]
    fn test_missing_counts_blank_and_empty() {
        let report = QualityAuditor::new().audit(&sample_table(), "x.csv");

        let year = &report.columns[2];
        assert_eq!(year.column, "2009");
        assert_eq!(year.missing, 2);
        assert!((year.missing_pct - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(year.unique, 1);
    }

    #[test]
    fn test_unique_excludes_missing() {
        let report = QualityAuditor::new().audit(&sample_table(), "x.csv");
        assert_eq!(report.columns[1].unique, 2);
        assert_eq!(report.columns[1].missing, 0);
    }

    #[test]
    fn test_missing_pct_bounds_and_formula() {
        let report = QualityAuditor::new().audit(&sample_table(), "x.csv");
        for stat in &report.columns {
            assert!((0.0..=1.0).contains(&stat.missing_pct));
            assert_eq!(
                stat.missing_pct,
                stat.missing as f64 / report.rows.max(1) as f64
            );
        }
    }

    #[test]
    fn test_duplicate_rows() {
        let auditor = QualityAuditor::new();
        let distinct = sample_table();
        assert_eq!(auditor.audit(&distinct, "x.csv").duplicate_rows, 0);

        let mut rows = distinct.rows().to_vec();
        rows.push(rows[0].clone());
        let with_dup = RawTable::new(distinct.columns().to_vec(), rows);
        assert_eq!(auditor.audit(&with_dup, "x.csv").duplicate_rows, 1);
    }

    #[test]
    fn test_zero_rows_yields_zero_stats() {
        let empty = RawTable::new(row(&["Id", "País"]), vec![]);
        let report = QualityAuditor::new().audit(&empty, "empty.csv");

        assert_eq!(report.rows, 0);
        assert_eq!(report.cols, 2);
        assert_eq!(report.duplicate_rows, 0);
        assert!(report
            .columns
            .iter()
            .all(|c| c.missing == 0 && c.missing_pct == 0.0 && c.unique == 0));
    }
}
