//! コレクション全ページの収集

use std::collections::HashMap;
use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::{PageFetcher, ScrapeObserver};

use super::parser::{self, PageExtraction};
use super::types::{CollectionResult, ItemRecord};

/// 一覧ページを順番に取得・解析するスクレイパー
///
/// ページ数と抽出結果はURL単位でメモ化する（セッション内のみ、破棄なし）。
pub struct CollectionScraper<F> {
    config: ScraperConfig,
    fetcher: F,
    observer: Arc<dyn ScrapeObserver>,
    page_count_cache: HashMap<String, u32>,
    extraction_cache: HashMap<(String, bool), PageExtraction>,
}

impl<F: PageFetcher> CollectionScraper<F> {
    pub fn new(config: ScraperConfig, fetcher: F, observer: Arc<dyn ScrapeObserver>) -> Self {
        Self {
            config,
            fetcher,
            observer,
            page_count_cache: HashMap::new(),
            extraction_cache: HashMap::new(),
        }
    }

    /// 総ページ数（取得失敗時は1）
    pub async fn total_pages(&mut self, base_url: &str) -> u32 {
        if let Some(&total) = self.page_count_cache.get(base_url) {
            debug!("Page count cache hit: {}", base_url);
            return total;
        }

        let total = match self.fetcher.fetch(base_url).await {
            Ok(html) => parser::discover_total_pages(&html),
            Err(e) => {
                debug!("Page count discovery failed, assuming 1 page: {}", e);
                1
            }
        };

        self.page_count_cache.insert(base_url.to_string(), total);
        total
    }

    /// 1ページ分のレコードを抽出
    ///
    /// 成功した結果のみキャッシュする。debug時は診断情報をオブザーバーへ渡す。
    pub async fn scrape_page(
        &mut self,
        url: &str,
        with_debug: bool,
    ) -> Result<Vec<ItemRecord>, ScraperError> {
        let key = (url.to_string(), with_debug);

        let extraction = match self.extraction_cache.get(&key) {
            Some(cached) => {
                debug!("Extraction cache hit: {} (debug={})", url, with_debug);
                cached.clone()
            }
            None => {
                let html = self.fetcher.fetch(url).await?;
                let extraction = parser::extract_rows(&html, with_debug, self.config.debug_preview_len);
                self.extraction_cache.insert(key, extraction.clone());
                extraction
            }
        };

        if let Some(snapshot) = &extraction.debug {
            self.observer.on_debug(snapshot);
        }

        Ok(extraction.records)
    }

    /// コレクション全体を収集
    ///
    /// 失敗したページは警告を出してスキップし、残りのページを続行する。
    pub async fn scrape_collection(&mut self, url: &str) -> CollectionResult {
        let base_url = parser::strip_page_param(url);
        let total_pages = self.total_pages(&base_url).await;
        info!("Scraping {} ({} pages)", base_url, total_pages);

        let mut records = Vec::new();
        let mut failed_pages = Vec::new();

        for page in 1..=total_pages {
            let page_url = parser::page_url(&base_url, page);

            match self.scrape_page(&page_url, page == 1).await {
                Ok(page_records) => {
                    debug!("Page {}: {} records", page, page_records.len());
                    records.extend(page_records);
                }
                Err(e) => {
                    warn!("Failed to scrape page {}: {}", page, e);
                    self.observer
                        .on_warning(&format!("Failed to scrape page {}: {}", page, e));
                    failed_pages.push(page);
                }
            }

            self.observer.on_progress(page, total_pages);

            if page < total_pages && !self.config.page_delay.is_zero() {
                sleep(self.config.page_delay).await;
            }
        }

        info!(
            "Scrape completed: {} records, {} failed pages",
            records.len(),
            failed_pages.len()
        );

        CollectionResult {
            base_url,
            total_pages,
            records,
            failed_pages,
        }
    }
}
