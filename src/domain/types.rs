// ==========================================
// 葡萄酒贸易数据分析 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 参考年份区间 (Year Range)
// ==========================================
// 年份列以字符串标签出现在表头中（如 "2009"）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: u16,
    pub end: u16,
}

impl YearRange {
    pub const DEFAULT_START: u16 = 2009;
    pub const DEFAULT_END: u16 = 2023;

    /// 闭区间 [start, end]；start > end 时交换
    pub fn new(start: u16, end: u16) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// 按升序生成年份标签
    pub fn labels(&self) -> Vec<String> {
        (self.start..=self.end).map(|y| y.to_string()).collect()
    }

    /// 判断列名是否为区间内的年份标签（精确匹配）
    pub fn contains_label(&self, label: &str) -> bool {
        label
            .parse::<u16>()
            .map(|y| y >= self.start && y <= self.end && y.to_string() == label)
            .unwrap_or(false)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_START, Self::DEFAULT_END)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
