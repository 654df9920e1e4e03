//! コレクション関連の型定義

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 一覧テーブルの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl ItemRecord {
    /// 数量×単価が桁あふれする場合は単価を解析不能と同じく0として扱う
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        let (unit_price, line_total) = match Decimal::from(quantity).checked_mul(unit_price) {
            Some(total) => (unit_price, total),
            None => (Decimal::ZERO, Decimal::ZERO),
        };
        Self {
            name: name.into(),
            quantity,
            unit_price,
            line_total,
        }
    }
}

/// 1ページ目の解析診断情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DebugSnapshot {
    /// ページ内の<table>数
    pub table_count: usize,
    /// 先頭テーブルのHTML（切り詰め済み）
    pub table_preview: Option<String>,
    /// 先頭3行のセルテキスト
    pub first_rows: Vec<Vec<String>>,
}

/// 全ページの収集結果
#[derive(Debug, Clone, Default)]
pub struct CollectionResult {
    /// 基底URL（`?p=`除去済み）
    pub base_url: String,
    pub total_pages: u32,
    /// ページ順に連結したレコード
    pub records: Vec<ItemRecord>,
    /// 取得に失敗したページ番号
    pub failed_pages: Vec<u32>,
}
