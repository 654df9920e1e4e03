//! コレクション一覧スクレイパーモジュール
//!
//! ページ数を検出し、全ページのアイテムテーブルを順番に抽出する

mod collector;
pub mod parser;
mod types;

pub use collector::CollectionScraper;
pub use types::{CollectionResult, DebugSnapshot, ItemRecord};

#[cfg(test)]
pub(crate) use collector::tests as test_support;
