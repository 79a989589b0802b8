// ==========================================
// 葡萄酒贸易数据分析 - 报告写出
// ==========================================
// 职责: 把内存中已完成的结果写成 JSON / CSV 文件
// 红线: 先写临时文件再重命名，失败时不留下半截文件
// ==========================================

use crate::config::analysis_config::{
    CAGR_FILE, PRICE_FILE, QUALITY_REPORT_FILE, QUALITY_SUMMARY_FILE,
};
use crate::domain::{CagrRecord, FileQualityReport, PriceTable};
use anyhow::{anyhow, Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CAGR_HEADERS: [&str; 6] = ["País", "start_year", "start_val", "end_year", "end_val", "CAGR"];
const SUMMARY_HEADERS: [&str; 4] = ["file", "rows", "cols", "duplicate_rows"];

pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// data_quality_report.json（2 空格缩进，UTF-8 原样输出）
    pub fn write_quality_report(&self, reports: &[FileQualityReport]) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(reports).context("序列化质量报告失败")?;
        self.write_atomic(QUALITY_REPORT_FILE, json.as_bytes())
    }

    /// data_quality_summary.csv（每个文件一行）
    pub fn write_quality_summary(&self, reports: &[FileQualityReport]) -> Result<PathBuf> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        wtr.write_record(SUMMARY_HEADERS)?;
        for report in reports {
            wtr.serialize(report.summary_row())?;
        }
        let data = finish(wtr)?;
        self.write_atomic(QUALITY_SUMMARY_FILE, &data)
    }

    /// cagr_comercializacao.csv（调用方负责排序）
    pub fn write_cagr(&self, records: &[CagrRecord]) -> Result<PathBuf> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        wtr.write_record(CAGR_HEADERS)?;
        for record in records {
            wtr.serialize(record)?;
        }
        let data = finish(wtr)?;
        self.write_atomic(CAGR_FILE, &data)
    }

    /// price_per_liter_exportacao.csv（国家列 + avg_price_<year>，缺失为空）
    pub fn write_price_table(&self, table: &PriceTable) -> Result<PathBuf> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        wtr.write_record(table.headers())?;
        for record in &table.records {
            let mut fields = Vec::with_capacity(table.years.len() + 1);
            fields.push(record.entity.clone());
            for year in &table.years {
                fields.push(record.price(year).map(format_float).unwrap_or_default());
            }
            wtr.write_record(&fields)?;
        }
        let data = finish(wtr)?;
        self.write_atomic(PRICE_FILE, &data)
    }

    fn write_atomic(&self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("创建输出目录失败: {}", self.output_dir.display()))?;

        let target = self.output_dir.join(file_name);
        let temp = self.output_dir.join(format!(".{}.tmp", file_name));
        fs::write(&temp, data).with_context(|| format!("写入临时文件失败: {}", temp.display()))?;
        fs::rename(&temp, &target)
            .with_context(|| format!("重命名输出文件失败: {}", target.display()))?;

        debug!(path = %target.display(), bytes = data.len(), "输出文件已写入");
        Ok(target)
    }
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    wtr.into_inner()
        .map_err(|e| anyhow!("CSV 缓冲区刷新失败: {}", e))
}

/// 整数值保留一位小数（与 CSV 序列化的浮点格式一致）
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnStat, PriceRecord};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_cagr_csv_layout() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());
        let records = vec![
            CagrRecord {
                entity: "Chile".to_string(),
                start_year: "2009".to_string(),
                start_val: 100.0,
                end_year: "2011".to_string(),
                end_val: 121.0,
                cagr: Some(0.5),
            },
            CagrRecord {
                entity: "Peru".to_string(),
                start_year: "2009".to_string(),
                start_val: 0.0,
                end_year: "2011".to_string(),
                end_val: 3.0,
                cagr: None,
            },
        ];

        let path = writer.write_cagr(&records).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "País,start_year,start_val,end_year,end_val,CAGR");
        assert_eq!(lines[1], "Chile,2009,100.0,2011,121.0,0.5");
        assert_eq!(lines[2], "Peru,2009,0.0,2011,3.0,");
    }

    #[test]
    fn test_empty_cagr_still_has_header() {
        let dir = tempdir().unwrap();
        let path = ReportWriter::new(dir.path()).write_cagr(&[]).unwrap();
        assert_eq!(
            fs::read_to_string(path).unwrap().trim_end(),
            "País,start_year,start_val,end_year,end_val,CAGR"
        );
    }

    #[test]
    fn test_quality_outputs() {
        let dir = tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());
        let reports = vec![FileQualityReport {
            file: "producao_filtrada.csv".to_string(),
            rows: 3,
            cols: 1,
            duplicate_rows: 1,
            columns: vec![ColumnStat {
                column: "Produto".to_string(),
                missing: 0,
                missing_pct: 0.0,
                unique: 2,
            }],
        }];

        let json_path = writer.write_quality_report(&reports).unwrap();
        let json = fs::read_to_string(json_path).unwrap();
        assert!(json.starts_with("[\n  {"));
        let parsed: Vec<FileQualityReport> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reports);

        let csv_path = writer.write_quality_summary(&reports).unwrap();
        assert_eq!(
            fs::read_to_string(csv_path).unwrap(),
            "file,rows,cols,duplicate_rows\nproducao_filtrada.csv,3,1,1\n"
        );
    }

    #[test]
    fn test_price_csv_blank_for_missing() {
        let dir = tempdir().unwrap();
        let mut prices = BTreeMap::new();
        prices.insert("2009".to_string(), Some(5.0));
        prices.insert("2010".to_string(), None);
        let table = PriceTable {
            entity_column: "País".to_string(),
            years: vec!["2009".to_string(), "2010".to_string()],
            records: vec![PriceRecord {
                entity: "A".to_string(),
                prices,
            }],
        };

        let path = ReportWriter::new(dir.path()).write_price_table(&table).unwrap();
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "País,avg_price_2009,avg_price_2010\nA,5.0,\n"
        );
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        ReportWriter::new(dir.path()).write_cagr(&[]).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec![CAGR_FILE.to_string()]);
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(5.0), "5.0");
        assert_eq!(format_float(7.25), "7.25");
    }
}
