// ==========================================
// 葡萄酒贸易数据分析 - 表格加载器实现
// ==========================================
// 职责: 文件 → RawTable，所有单元格保持文本
// 策略: 分隔符/编码按固定优先级逐个尝试，第一个成功者胜出
//   1. ';' + UTF-8
//   2. ';' + Windows-1252（旧版带重音字符的导出文件）
//   3. 自动探测分隔符 + UTF-8，失败后 Windows-1252（不做有损替换）
// ==========================================

use crate::domain::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::TableLoader;
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// 分隔符探测的候选项（按优先级）
const SNIFF_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// 分隔符探测读取的非空行数
const SNIFF_SAMPLE_LINES: usize = 20;

// ==========================================
// 加载策略
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// 严格 UTF-8，遇到非法字节即失败
    Utf8Strict,
    /// Windows-1252（常被称作 "latin1"），任何字节序列都可解码
    Windows1252,
    /// 先严格 UTF-8，失败后按 Windows-1252 解码（不产生替换字符）
    Utf8OrWindows1252,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterChoice {
    Fixed(u8),
    Sniffed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStrategy {
    pub name: &'static str,
    pub delimiter: DelimiterChoice,
    pub encoding: TextEncoding,
}

impl LoadStrategy {
    /// 默认三级回退
    pub fn default_cascade() -> Vec<LoadStrategy> {
        vec![
            LoadStrategy {
                name: "semicolon/utf-8",
                delimiter: DelimiterChoice::Fixed(b';'),
                encoding: TextEncoding::Utf8Strict,
            },
            LoadStrategy {
                name: "semicolon/windows-1252",
                delimiter: DelimiterChoice::Fixed(b';'),
                encoding: TextEncoding::Windows1252,
            },
            LoadStrategy {
                name: "sniffed/utf-8-or-windows-1252",
                delimiter: DelimiterChoice::Sniffed,
                encoding: TextEncoding::Utf8OrWindows1252,
            },
        ]
    }

    /// 用本策略解析整个文件内容
    pub fn apply(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let text = decode(bytes, self.encoding)?;
        let delimiter = match self.delimiter {
            DelimiterChoice::Fixed(d) => d,
            DelimiterChoice::Sniffed => sniff_delimiter(&text),
        };
        let table = parse_text(&text, delimiter)?;

        // 固定分隔符只解析出一列、表头却含其他候选分隔符 → 视为分隔符不匹配
        if let DelimiterChoice::Fixed(d) = self.delimiter {
            if table.column_count() == 1 {
                let header = &table.columns()[0];
                let foreign = SNIFF_CANDIDATES
                    .iter()
                    .filter(|c| **c != d)
                    .any(|c| header.contains(*c as char));
                if foreign {
                    return Err(ImportError::DelimiterMismatch {
                        delimiter: d as char,
                    });
                }
            }
        }

        Ok(table)
    }
}

// ==========================================
// CsvTableLoader - 级联加载器
// ==========================================
pub struct CsvTableLoader {
    strategies: Vec<LoadStrategy>,
}

impl CsvTableLoader {
    pub fn new() -> Self {
        Self {
            strategies: LoadStrategy::default_cascade(),
        }
    }

    /// 使用自定义策略列表（按顺序尝试）
    pub fn with_strategies(strategies: Vec<LoadStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[LoadStrategy] {
        &self.strategies
    }
}

impl Default for CsvTableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableLoader for CsvTableLoader {
    fn load(&self, path: &Path) -> ImportResult<RawTable> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let bytes = fs::read(path)?;
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match strategy.apply(&bytes) {
                Ok(table) => {
                    debug!(
                        path = %path.display(),
                        strategy = strategy.name,
                        rows = table.row_count(),
                        cols = table.column_count(),
                        "文件加载完成"
                    );
                    return Ok(table);
                }
                Err(e) => {
                    debug!(path = %path.display(), strategy = strategy.name, error = %e, "加载策略失败");
                    attempts.push(format!("{}: {}", strategy.name, e));
                }
            }
        }

        warn!(path = %path.display(), "所有加载策略均失败");
        Err(ImportError::LoadExhausted {
            path: path.display().to_string(),
            attempts,
        })
    }
}

// ==========================================
// 解码 / 解析 / 探测
// ==========================================

fn decode(bytes: &[u8], encoding: TextEncoding) -> ImportResult<Cow<'_, str>> {
    match encoding {
        TextEncoding::Utf8Strict => {
            let text = decode_strict(bytes, UTF_8)?;
            Ok(strip_bom(text))
        }
        TextEncoding::Windows1252 => decode_strict(bytes, WINDOWS_1252),
        TextEncoding::Utf8OrWindows1252 => match decode_strict(bytes, UTF_8) {
            Ok(text) => Ok(strip_bom(text)),
            Err(_) => decode_strict(bytes, WINDOWS_1252),
        },
    }
}

fn decode_strict<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> ImportResult<Cow<'a, str>> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| ImportError::EncodingError {
            encoding: encoding.name().to_string(),
        })
}

fn strip_bom(text: Cow<'_, str>) -> Cow<'_, str> {
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_prefix('\u{feff}').unwrap_or(s)),
        Cow::Owned(s) => match s.strip_prefix('\u{feff}') {
            Some(rest) => Cow::Owned(rest.to_string()),
            None => Cow::Owned(s),
        },
    }
}

/// 按给定分隔符解析文本；超长行视为解析失败，短行由 RawTable 补齐
fn parse_text(text: &str, delimiter: u8) -> ImportResult<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(ImportError::CsvParseError("文件无表头".to_string()));
    }

    let width = headers.len();
    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            return Err(ImportError::RaggedRow {
                row,
                expected: width,
                actual: record.len(),
            });
        }
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// 在样本行上为每个候选分隔符打分，选出字段数最一致且多于一列的那个
///
/// 得分 = (众数字段数所占比例, 众数字段数)；并列时保留候选顺序靠前者。
/// 没有候选能切出多列时回退为 ','。
pub fn sniff_delimiter(text: &str) -> u8 {
    let sample: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_SAMPLE_LINES)
        .collect();
    if sample.is_empty() {
        return b',';
    }
    let sample = sample.join("\n");

    let mut best: Option<(u8, f64, usize)> = None;
    for &candidate in SNIFF_CANDIDATES.iter() {
        let mut reader = ReaderBuilder::new()
            .delimiter(candidate)
            .has_headers(false)
            .flexible(true)
            .from_reader(sample.as_bytes());

        let mut counts: Vec<usize> = Vec::new();
        let mut failed = false;
        for result in reader.records() {
            match result {
                Ok(record) => counts.push(record.len()),
                Err(_) => {
                    failed = true;
                    break;
                }
            }
        }
        if failed || counts.is_empty() {
            continue;
        }

        let (mode, freq) = mode_of(&counts);
        if mode <= 1 {
            continue;
        }
        let uniformity = freq as f64 / counts.len() as f64;

        let better = match best {
            None => true,
            Some((_, u, m)) => uniformity > u || (uniformity == u && mode > m),
        };
        if better {
            best = Some((candidate, uniformity, mode));
        }
    }

    best.map(|(d, _, _)| d).unwrap_or(b',')
}

/// 众数及其出现次数；并列时取较大的字段数
fn mode_of(counts: &[usize]) -> (usize, usize) {
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for &c in counts {
        match tally.iter_mut().find(|(v, _)| *v == c) {
            Some((_, n)) => *n += 1,
            None => tally.push((c, 1)),
        }
    }
    tally
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
        .unwrap_or((0, 0))
}

/// 只读取表头（供列名打印工具使用）
pub fn read_header(path: &Path, delimiter: u8) -> ImportResult<Vec<String>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let bytes = fs::read(path)?;
    let text = decode(&bytes, TextEncoding::Utf8Strict)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    Ok(reader.headers()?.iter().map(|h| h.to_string()).collect())
}
