// ==========================================
// 葡萄酒贸易数据分析 - 导入层
// ==========================================
// 职责: 外部 CSV 文件 → RawTable，列识别，数值转换
// 支持: ';' / ',' / '\t' / '|' 分隔，UTF-8 / Windows-1252 编码
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod numeric;
pub mod text_normalizer;

// 重导出核心类型
pub use column_resolver::{find_year_columns, ColumnResolver, EntityMatcher, ENTITY_LITERALS};
pub use error::{ImportError, ImportResult};
pub use file_parser::{
    read_header, sniff_delimiter, CsvTableLoader, DelimiterChoice, LoadStrategy, TextEncoding,
};
pub use numeric::{to_number, to_number_or_zero};
pub use text_normalizer::{normalize, normalize_opt};

// 重导出 Trait 接口
pub use importer_trait::TableLoader;
