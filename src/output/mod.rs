// ==========================================
// 葡萄酒贸易数据分析 - 输出层
// ==========================================
// 职责: 报告文件的序列化与原子写出
// ==========================================

pub mod writer;

pub use writer::ReportWriter;
