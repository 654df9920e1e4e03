//! 評価額サマリーの計算

use rust_decimal::Decimal;
use serde::Serialize;

/// 固定の換算・買取ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValuationPolicy {
    /// 基準通貨→換算通貨のレート
    pub conversion_rate: Decimal,
    /// フィルター対象の最低単価
    pub price_threshold: Decimal,
    /// 買取額の割合
    pub offer_rate: Decimal,
    /// ストアクレジットの割合
    pub credit_rate: Decimal,
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        Self {
            conversion_rate: Decimal::from(18),
            price_threshold: Decimal::new(20, 1),
            offer_rate: Decimal::new(4, 1),
            credit_rate: Decimal::new(5, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub grand_total_value: Decimal,
    pub grand_total_value_converted: Decimal,
    pub filtered_total_value: Decimal,
    pub filtered_total_value_converted: Decimal,
    pub offer_amount: Decimal,
    pub offer_amount_converted: Decimal,
    pub credit_amount: Decimal,
    pub credit_amount_converted: Decimal,
}

impl ValuationPolicy {
    pub fn convert(&self, amount: Decimal) -> Decimal {
        amount.saturating_mul(self.conversion_rate)
    }

    /// 全体合計とフィルター後合計からサマリーを算出
    pub fn summarize(&self, grand_total: Decimal, filtered_total: Decimal) -> CollectionSummary {
        let offer_amount = filtered_total.saturating_mul(self.offer_rate);
        let credit_amount = filtered_total.saturating_mul(self.credit_rate);

        CollectionSummary {
            grand_total_value: grand_total,
            grand_total_value_converted: self.convert(grand_total),
            filtered_total_value: filtered_total,
            filtered_total_value_converted: self.convert(filtered_total),
            offer_amount,
            offer_amount_converted: self.convert(offer_amount),
            credit_amount,
            credit_amount_converted: self.convert(credit_amount),
        }
    }
}
