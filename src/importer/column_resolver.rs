// ==========================================
// 葡萄酒贸易数据分析 - 列识别器
// ==========================================
// 职责: 识别实体（国家）列与年份列
// 策略: 有序匹配器列表，按匹配器优先级扫描全部列，第一个命中者胜出
// 红线: 识别失败返回 None，由调用方转换为"跳过 + 提示"
// ==========================================

use crate::domain::{RawTable, YearRange};
use crate::importer::text_normalizer::normalize;
use tracing::{debug, warn};

/// 实体列的已知表头写法（精确匹配，不做规范化）
pub const ENTITY_LITERALS: [&str; 5] = ["País", "Pais", "pais", "country", "Country"];

// ==========================================
// EntityMatcher - 单个匹配规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityMatcher {
    /// 规范化后与关键字完全相等
    NormalizedEquals(&'static [&'static str]),
    /// 规范化后包含关键字
    NormalizedContains(&'static [&'static str]),
    /// 规范化后包含短片段（容忍截断/乱码表头，误报风险高）
    LooseFragment(&'static str),
    /// 原样列名在已知写法列表中
    ExactLiteral(&'static [&'static str]),
}

impl EntityMatcher {
    pub fn name(&self) -> &'static str {
        match self {
            EntityMatcher::NormalizedEquals(_) => "normalized_equals",
            EntityMatcher::NormalizedContains(_) => "normalized_contains",
            EntityMatcher::LooseFragment(_) => "loose_fragment",
            EntityMatcher::ExactLiteral(_) => "exact_literal",
        }
    }

    pub fn matches(&self, column: &str) -> bool {
        match self {
            EntityMatcher::NormalizedEquals(keys) => {
                let n = normalize(column);
                keys.iter().any(|k| n == *k)
            }
            EntityMatcher::NormalizedContains(keys) => {
                let n = normalize(column);
                keys.iter().any(|k| n.contains(k))
            }
            EntityMatcher::LooseFragment(fragment) => normalize(column).contains(fragment),
            EntityMatcher::ExactLiteral(literals) => literals.iter().any(|l| *l == column),
        }
    }
}

// ==========================================
// ColumnResolver - 列识别器
// ==========================================
/// 按匹配器优先级扫描: 先用第一个匹配器检查全部列，再换下一个。
///
/// 这与"逐列依次套用全部匹配器"不同，是有意为之: 较弱的 "pa" 片段
/// 不会抢在后面真正的国家列之前命中（如 ["Capacidade", "País"] 得到 "País"）。
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    matchers: Vec<EntityMatcher>,
}

impl ColumnResolver {
    /// 构造默认匹配器序列
    ///
    /// # 参数
    /// - loose_fragment: 是否启用 "pa" 片段匹配（源数据兼容用，可能误报）
    pub fn new(loose_fragment: bool) -> Self {
        let mut matchers = vec![
            EntityMatcher::NormalizedEquals(&["pais", "country"]),
            EntityMatcher::NormalizedContains(&["pais", "country"]),
        ];
        if loose_fragment {
            matchers.push(EntityMatcher::LooseFragment("pa"));
        }
        matchers.push(EntityMatcher::ExactLiteral(&ENTITY_LITERALS));

        Self { matchers }
    }

    pub fn with_matchers(matchers: Vec<EntityMatcher>) -> Self {
        Self { matchers }
    }

    pub fn matchers(&self) -> &[EntityMatcher] {
        &self.matchers
    }

    /// 在表格列中识别实体列
    pub fn find_entity_column(&self, table: &RawTable) -> Option<String> {
        self.find_entity_in(table.columns())
    }

    /// 在任意列名序列中识别实体列（也用于合并键）
    pub fn find_entity_in<S: AsRef<str>>(&self, names: &[S]) -> Option<String> {
        for matcher in &self.matchers {
            if let Some(hit) = names.iter().find(|c| matcher.matches((*c).as_ref())) {
                let hit: &str = hit.as_ref();
                let hit = hit.to_string();
                if matches!(matcher, EntityMatcher::LooseFragment(_)) {
                    warn!(column = %hit, "实体列仅由宽松片段匹配命中，可能误报");
                } else {
                    debug!(column = %hit, matcher = matcher.name(), "实体列识别完成");
                }
                return Some(hit);
            }
        }

        debug!("未识别到实体列");
        None
    }
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new(true)
    }
}

/// 参考年份区间与表格列的有序交集（精确匹配）
pub fn find_year_columns(table: &RawTable, range: &YearRange) -> Vec<String> {
    range
        .labels()
        .into_iter()
        .filter(|label| table.has_column(label))
        .collect()
}
