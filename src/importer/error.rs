// ==========================================
// 葡萄酒贸易数据分析 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 解析错误（单个加载策略内） =====
    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文本解码失败 (编码 {encoding}): 存在无法解码的字节")]
    EncodingError { encoding: String },

    #[error("分隔符 '{delimiter}' 不匹配: 表头只解析出一列，但包含其他分隔符")]
    DelimiterMismatch { delimiter: char },

    #[error("行字段数超出表头 (行 {row}): 期望 {expected}，实际 {actual}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    // ===== 加载失败（全部策略耗尽） =====
    #[error("所有加载策略均失败: {path} [{}]", attempts.join("; "))]
    LoadExhausted { path: String, attempts: Vec<String> },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
