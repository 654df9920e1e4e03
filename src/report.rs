//! 評価レポートの組み立てと出力用フォーマット

use std::io::Write;

use chrono::{DateTime, Local};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::aggregate::{aggregate, filter_by_min_price, AggregatedGroup};
use crate::collection::CollectionResult;
use crate::error::ScraperError;
use crate::valuation::{CollectionSummary, ValuationPolicy};

/// 1回の評価結果
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub source_url: String,
    pub total_pages: u32,
    pub record_count: usize,
    pub failed_pages: Vec<u32>,
    pub summary: CollectionSummary,
    pub all_groups: Vec<AggregatedGroup>,
    pub filtered_groups: Vec<AggregatedGroup>,
    pub generated_at: DateTime<Local>,
}

impl CollectionReport {
    /// 収集結果を全件・閾値以上の2通りで集計してレポート化
    pub fn build(collection: CollectionResult, policy: &ValuationPolicy) -> Self {
        let all = aggregate(&collection.records);
        let filtered = aggregate(&filter_by_min_price(
            &collection.records,
            policy.price_threshold,
        ));

        Self {
            summary: policy.summarize(all.grand_total, filtered.grand_total),
            record_count: collection.records.len(),
            source_url: collection.base_url,
            total_pages: collection.total_pages,
            failed_pages: collection.failed_pages,
            all_groups: all.groups,
            filtered_groups: filtered.groups,
            generated_at: Local::now(),
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.failed_pages.is_empty()
    }
}

/// 桁区切り・小数2桁（例: 1,234.50）
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// 集計グループをCSVで書き出す
pub fn write_groups_csv<W: Write>(groups: &[AggregatedGroup], writer: W) -> Result<(), ScraperError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["name", "unit_price", "total_quantity", "total_value"])
        .map_err(csv_error)?;
    for group in groups {
        let unit_price = group.unit_price.to_string();
        let total_quantity = group.total_quantity.to_string();
        let total_value = group.total_value.to_string();
        wtr.write_record([
            group.name.as_str(),
            unit_price.as_str(),
            total_quantity.as_str(),
            total_value.as_str(),
        ])
        .map_err(csv_error)?;
    }

    wtr.flush()?;
    Ok(())
}

fn csv_error(err: csv::Error) -> ScraperError {
    ScraperError::FileIO(std::io::Error::other(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::collection::ItemRecord;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(Decimal::new(125, 1)), "12.50");
        assert_eq!(format_amount(Decimal::new(123456789, 2)), "1,234,567.89");
        assert_eq!(format_amount(Decimal::from(100000)), "100,000.00");
        assert_eq!(format_amount(Decimal::new(9995, 3)), "10.00");
        assert_eq!(format_amount(Decimal::new(-150000, 2)), "-1,500.00");
    }

    #[test]
    fn test_build_report() {
        let collection = CollectionResult {
            base_url: "https://cards.test/sets/42".to_string(),
            total_pages: 2,
            records: vec![
                ItemRecord::new("Bolt", 3, Decimal::new(250, 2)),
                ItemRecord::new("Bolt", 2, Decimal::new(250, 2)),
                ItemRecord::new("Washer", 3, Decimal::new(100, 2)),
            ],
            failed_pages: vec![2],
        };

        let report = CollectionReport::build(collection, &ValuationPolicy::default());

        assert_eq!(report.record_count, 3);
        assert!(report.is_partial());
        assert_eq!(report.all_groups.len(), 2);
        assert_eq!(report.filtered_groups.len(), 1);
        assert_eq!(report.filtered_groups[0].total_quantity, 5);
        assert_eq!(report.summary.grand_total_value, Decimal::new(1550, 2));
        assert_eq!(report.summary.filtered_total_value, Decimal::new(1250, 2));
        assert_eq!(report.summary.offer_amount, Decimal::from(5));
        assert_eq!(report.summary.credit_amount_converted, Decimal::new(1125, 1));
    }

    #[test]
    fn test_write_groups_csv() {
        let groups = vec![AggregatedGroup {
            name: "Bolt, Lightning".to_string(),
            unit_price: Decimal::new(250, 2),
            total_quantity: 5,
            total_value: Decimal::new(1250, 2),
        }];
        let mut out = Vec::new();
        write_groups_csv(&groups, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,unit_price,total_quantity,total_value\n\"Bolt, Lightning\",2.50,5,12.50\n"
        );
    }
}
