//! (名前, 単価) 単位の集計

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::collection::ItemRecord;

/// 集計結果の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedGroup {
    pub name: String,
    pub unit_price: Decimal,
    pub total_quantity: u64,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    /// total_value の降順
    pub groups: Vec<AggregatedGroup>,
    pub grand_total: Decimal,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// レコードを (名前, 単価) でグループ化し、数量と金額を合算する
///
/// 同額のグループは (名前, 単価) の昇順。合計は Decimal::MAX で頭打ち。
pub fn aggregate(records: &[ItemRecord]) -> Aggregation {
    let mut by_key: BTreeMap<(&str, Decimal), (u64, Decimal)> = BTreeMap::new();
    for record in records {
        let entry = by_key
            .entry((record.name.as_str(), record.unit_price))
            .or_insert((0, Decimal::ZERO));
        entry.0 = entry.0.saturating_add(u64::from(record.quantity));
        entry.1 = entry.1.saturating_add(record.line_total);
    }

    let mut groups: Vec<AggregatedGroup> = by_key
        .into_iter()
        .map(|((name, unit_price), (total_quantity, total_value))| AggregatedGroup {
            name: name.to_string(),
            unit_price,
            total_quantity,
            total_value,
        })
        .collect();
    groups.sort_by(|a, b| b.total_value.cmp(&a.total_value));

    let grand_total = groups
        .iter()
        .fold(Decimal::ZERO, |acc, g| acc.saturating_add(g.total_value));

    Aggregation {
        groups,
        grand_total,
    }
}

/// 単価が閾値以上のレコードのみ
pub fn filter_by_min_price(records: &[ItemRecord], threshold: Decimal) -> Vec<ItemRecord> {
    records
        .iter()
        .filter(|r| r.unit_price >= threshold)
        .cloned()
        .collect()
}
