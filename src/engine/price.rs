// ==========================================
// 葡萄酒贸易数据分析 - 出口单价引擎
// ==========================================
// 流程: 合并键推断 → 内连接 → 国家键识别 → 年度单价 → 按国家求均值
//       → 各年度结果逐个外连接
// 红线: 任何一步无法完成都返回 SkipReason，不产生输出
// ==========================================

use crate::domain::{PriceRecord, PriceTable, RawTable, Resolution, SkipReason, YearRange};
use crate::engine::join::{inner_join, resolve_join_keys, JoinKeyStrategy, MergedTable};
use crate::importer::column_resolver::ColumnResolver;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// 实体 → (年份 → 平均单价)
type EntityYearPrices = BTreeMap<String, BTreeMap<String, Option<f64>>>;

pub struct PriceAnalyzer {
    range: YearRange,
    resolver: ColumnResolver,
    join_strategies: Vec<JoinKeyStrategy>,
}

impl PriceAnalyzer {
    pub fn new(range: YearRange, resolver: ColumnResolver) -> Self {
        Self {
            range,
            resolver,
            join_strategies: JoinKeyStrategy::default_strategies(),
        }
    }

    pub fn with_join_strategies(mut self, strategies: Vec<JoinKeyStrategy>) -> Self {
        self.join_strategies = strategies;
        self
    }

    /// 由数量表与金额表计算每个国家的年度平均单价
    ///
    /// # 返回
    /// - Ok(PriceTable): 每个国家一条记录，按国家名排序
    /// - Err(SkipReason::NoJoinKeys): 两表没有可用的合并键
    /// - Err(SkipReason::NoCountryKey): 合并键中没有国家列
    /// - Err(SkipReason::NoPriceColumns): 两表没有共同的年份列
    pub fn compute_price_per_unit(
        &self,
        quantity: &RawTable,
        value: &RawTable,
    ) -> Resolution<PriceTable> {
        let keys = resolve_join_keys(&self.join_strategies, quantity, value, &self.range)
            .ok_or(SkipReason::NoJoinKeys)?;

        let merged = inner_join(quantity, value, &keys, &self.range);

        let entity_column = self
            .resolver
            .find_entity_in(&merged.keys)
            .ok_or(SkipReason::NoCountryKey)?;

        if merged.years.is_empty() {
            return Err(SkipReason::NoPriceColumns);
        }

        let entity_idx = merged
            .key_index(&entity_column)
            .ok_or(SkipReason::NoCountryKey)?;

        let mut prices: EntityYearPrices = BTreeMap::new();
        let mut joined_years: Vec<String> = Vec::with_capacity(merged.years.len());
        for year in &merged.years {
            let aggregate = average_by_entity(&merged, entity_idx, year);
            outer_join_year(&mut prices, &joined_years, year, aggregate);
            joined_years.push(year.clone());
        }

        let records: Vec<PriceRecord> = prices
            .into_iter()
            .map(|(entity, prices)| PriceRecord { entity, prices })
            .collect();

        info!(
            entity_column = %entity_column,
            entities = records.len(),
            years = joined_years.len(),
            "单价计算完成"
        );
        Ok(PriceTable {
            entity_column,
            years: joined_years,
            records,
        })
    }
}

/// 某年份按国家分组的平均单价；该组没有任何可用单价时为 None
fn average_by_entity(
    merged: &MergedTable,
    entity_idx: usize,
    year: &str,
) -> BTreeMap<String, Option<f64>> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in &merged.rows {
        let entity = row.keys[entity_idx].as_str();
        if entity.trim().is_empty() {
            continue;
        }
        let slot = groups.entry(entity).or_insert((0.0, 0));
        if let Some(price) = row.years.get(year).and_then(|pair| pair.ratio()) {
            slot.0 += price;
            slot.1 += 1;
        }
    }

    debug!(year, groups = groups.len(), "年度均价分组完成");
    groups
        .into_iter()
        .map(|(entity, (sum, count))| {
            let avg = (count > 0).then(|| sum / count as f64);
            (entity.to_string(), avg)
        })
        .collect()
}

/// 把单个年份的聚合结果外连接进累计表
///
/// 新实体在此前年份补 None；累计表中本年份缺席的实体补 None。
fn outer_join_year(
    acc: &mut EntityYearPrices,
    joined_years: &[String],
    year: &str,
    aggregate: BTreeMap<String, Option<f64>>,
) {
    for (entity, avg) in aggregate {
        let entry = acc.entry(entity).or_insert_with(|| {
            joined_years
                .iter()
                .map(|y| (y.clone(), None))
                .collect()
        });
        entry.insert(year.to_string(), avg);
    }
    for prices in acc.values_mut() {
        prices.entry(year.to_string()).or_insert(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(row(columns), rows.iter().map(|r| row(r)).collect())
    }

    fn analyzer() -> PriceAnalyzer {
        PriceAnalyzer::new(YearRange::default(), ColumnResolver::default())
    }

    #[test]
    fn test_price_is_value_over_quantity() {
        let q = table(&["Id", "País", "2009"], &[&["1", "A", "10"]]);
        let v = table(&["Id", "País", "2009"], &[&["1", "A", "50"]]);

        let result = analyzer().compute_price_per_unit(&q, &v).unwrap();

        assert_eq!(result.entity_column, "País");
        assert_eq!(result.years, vec!["2009"]);
        assert_eq!(result.record("A").unwrap().price("2009"), Some(5.0));
    }

    #[test]
    fn test_zero_quantity_is_missing_not_infinite() {
        let q = table(&["Id", "País", "2009"], &[&["1", "A", "0"]]);
        let v = table(&["Id", "País", "2009"], &[&["1", "A", "50"]]);

        let result = analyzer().compute_price_per_unit(&q, &v).unwrap();

        let record = result.record("A").unwrap();
        assert_eq!(record.prices.get("2009"), Some(&None));
    }

    #[test]
    fn test_average_ignores_missing_prices() {
        let q = table(
            &["Id", "País", "2009", "2010"],
            &[&["1", "A", "10", "0"], &["2", "A", "20", "0"], &["3", "B", "", "4"]],
        );
        let v = table(
            &["Id", "País", "2009", "2010"],
            &[&["1", "A", "50", "9"], &["2", "A", "200", "9"], &["3", "B", "1", "8"]],
        );

        let result = analyzer().compute_price_per_unit(&q, &v).unwrap();

        let a = result.record("A").unwrap();
        assert_eq!(a.price("2009"), Some(7.5));
        assert_eq!(a.prices.get("2010"), Some(&None));

        let b = result.record("B").unwrap();
        assert_eq!(b.prices.get("2009"), Some(&None));
        assert_eq!(b.price("2010"), Some(2.0));

        let entities: Vec<&str> = result.records.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, vec!["A", "B"]);
    }

    #[test]
    fn test_thousands_formatted_values() {
        let q = table(&["País", "2009"], &[&["A", "1.000"]]);
        let v = table(&["País", "2009"], &[&["A", "2.500,00"]]);

        let result = analyzer().compute_price_per_unit(&q, &v).unwrap();
        assert_eq!(result.record("A").unwrap().price("2009"), Some(2.5));
    }

    #[test]
    fn test_no_join_keys() {
        let q = table(&["A", "2009"], &[]);
        let v = table(&["B", "2009"], &[]);
        assert_eq!(
            analyzer().compute_price_per_unit(&q, &v),
            Err(SkipReason::NoJoinKeys)
        );
    }

    #[test]
    fn test_no_country_key_among_merge_keys() {
        let q = table(&["Id", "País", "2009"], &[&["1", "A", "1"]]);
        let v = table(&["Id", "Country name", "2009"], &[&["1", "A", "1"]]);
        // 候选键只剩 Id；"País" 不在合并键中
        let strict = PriceAnalyzer::new(YearRange::default(), ColumnResolver::new(false));
        assert_eq!(
            strict.compute_price_per_unit(&q, &v),
            Err(SkipReason::NoCountryKey)
        );
    }

    #[test]
    fn test_custom_join_strategies() {
        let q = table(&["Id", "País", "Produto", "2009"], &[&["1", "A", "tinto", "10"]]);
        let v = table(&["Id", "País", "Produto", "2009"], &[&["1", "A", "branco", "50"]]);

        // 只按 Id 合并时，国家列不在合并键中
        let id_only = analyzer().with_join_strategies(vec![JoinKeyStrategy::CandidateKeys(&["Id"])]);
        assert_eq!(
            id_only.compute_price_per_unit(&q, &v),
            Err(SkipReason::NoCountryKey)
        );

        // 按全部共有的非年份列合并: Produto 不同，没有匹配行
        let shared = analyzer().with_join_strategies(vec![JoinKeyStrategy::SharedNonYearColumns]);
        let result = shared.compute_price_per_unit(&q, &v).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.years, vec!["2009"]);
    }

    #[test]
    fn test_no_shared_years() {
        let q = table(&["País", "2009"], &[&["A", "1"]]);
        let v = table(&["País", "2010"], &[&["A", "1"]]);
        assert_eq!(
            analyzer().compute_price_per_unit(&q, &v),
            Err(SkipReason::NoPriceColumns)
        );
    }

    #[test]
    fn test_outer_join_fills_absent_years() {
        let mut acc: EntityYearPrices = BTreeMap::new();
        let mut first = BTreeMap::new();
        first.insert("A".to_string(), Some(1.0));
        outer_join_year(&mut acc, &[], "2009", first);

        let mut second = BTreeMap::new();
        second.insert("B".to_string(), Some(2.0));
        outer_join_year(&mut acc, &["2009".to_string()], "2010", second);

        assert_eq!(acc["A"].get("2010"), Some(&None));
        assert_eq!(acc["B"].get("2009"), Some(&None));
        assert_eq!(acc["B"].get("2010"), Some(&Some(2.0)));
    }
}
