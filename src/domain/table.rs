// ==========================================
// 葡萄酒贸易数据分析 - 原始表格
// ==========================================
// 职责: 以纯文本形式承载一个输入文件的全部单元格
// 红线: 构造后不可变，消费方只派生新结构
// ==========================================

use serde::Serialize;

// ==========================================
// RawTable - 原始文本表
// ==========================================
/// 一个已加载文件的列名与行数据，所有单元格保持原始文本。
///
/// 不变式: 每一行的单元格数量都等于列数；缺失单元格以空字符串表示。
/// 列名可能重复，按名称查找时取第一个同名列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 构造表格，短行补齐空单元格，超长行截断到列数
    ///
    /// 加载器在调用前已拒绝超长行，这里的截断只用于保证不变式。
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 列名 → 第一个同名列的位置
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// 读取某行某列（按列名）的原始文本
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// 按列位置遍历整列原始文本
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |r| r[idx].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = RawTable::new(
            cols(&["Id", "País", "2009"]),
            vec![vec!["1".to_string()], vec!["2".to_string(), "Chile".to_string()]],
        );

        assert_eq!(table.row_count(), 2);
        assert!(table.rows().iter().all(|r| r.len() == 3));
        assert_eq!(table.value(0, "País"), Some(""));
        assert_eq!(table.value(1, "País"), Some("Chile"));
    }

    #[test]
    fn test_duplicate_column_names_resolve_to_first() {
        let table = RawTable::new(
            cols(&["País", "País"]),
            vec![vec!["A".to_string(), "B".to_string()]],
        );

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_index("País"), Some(0));
        assert_eq!(table.value(0, "País"), Some("A"));
    }

    #[test]
    fn test_missing_lookups_return_none() {
        let table = RawTable::new(cols(&["Id"]), vec![]);

        assert_eq!(table.value(0, "Id"), None);
        assert_eq!(table.value(0, "País"), None);
        assert!(!table.has_column("País"));
    }
}
