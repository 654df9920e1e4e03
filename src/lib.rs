//! コレクション評価ライブラリ
//!
//! - ページ分割された一覧ページからアイテム（数量・名前・単価）を収集
//! - (名前, 単価) 単位で集計し、換算額・買取額・クレジット額を算出
//!
//! # 使用例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use collection_valuer::{NoopObserver, ScraperConfig, ValuationRequest, ValuationService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service =
//!         ValuationService::http(ScraperConfig::default(), Arc::new(NoopObserver)).unwrap();
//!
//!     let report = service
//!         .call(ValuationRequest::new("https://deckbox.org/sets/12345"))
//!         .await
//!         .unwrap();
//!     println!("Total: {}", report.summary.grand_total_value);
//! }
//! ```

pub mod aggregate;
pub mod collection;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod report;
pub mod service;
pub mod traits;
pub mod valuation;

// 主要な型をリエクスポート
pub use aggregate::{aggregate, AggregatedGroup, Aggregation};
pub use collection::{CollectionResult, CollectionScraper, DebugSnapshot, ItemRecord};
pub use config::ScraperConfig;
pub use error::ScraperError;
pub use fetcher::HttpFetcher;
pub use report::{format_amount, CollectionReport};
pub use service::{ValuationRequest, ValuationService};
pub use traits::{NoopObserver, PageFetcher, ScrapeObserver};
pub use valuation::{CollectionSummary, ValuationPolicy};
