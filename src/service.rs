use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::Mutex;
use tower::Service;
use tracing::info;
use url::Url;

use crate::collection::CollectionScraper;
use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::fetcher::HttpFetcher;
use crate::report::CollectionReport;
use crate::traits::{PageFetcher, ScrapeObserver};
use crate::valuation::ValuationPolicy;

/// 評価リクエスト
#[derive(Debug, Clone)]
pub struct ValuationRequest {
    /// 一覧URL（末尾の `?p=<n>` は無視される）
    pub url: String,
}

impl ValuationRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// http(s) の絶対URLであることを確認
    fn validate(&self) -> Result<(), ScraperError> {
        let url = Url::parse(self.url.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ScraperError::InvalidUrl(format!(
                "未対応のスキーム: {}",
                other
            ))),
        }
    }
}

/// tower::Serviceを実装した評価サービス
///
/// 同一サービス（およびそのクローン）への呼び出しはスクレイパーのキャッシュを共有する。
pub struct ValuationService<F> {
    scraper: Arc<Mutex<CollectionScraper<F>>>,
    policy: ValuationPolicy,
}

impl<F> Clone for ValuationService<F> {
    fn clone(&self) -> Self {
        Self {
            scraper: Arc::clone(&self.scraper),
            policy: self.policy,
        }
    }
}

impl ValuationService<HttpFetcher> {
    /// reqwestで取得するサービス
    pub fn http(
        config: ScraperConfig,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Result<Self, ScraperError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(config, fetcher, observer))
    }
}

impl<F: PageFetcher> ValuationService<F> {
    pub fn new(config: ScraperConfig, fetcher: F, observer: Arc<dyn ScrapeObserver>) -> Self {
        Self {
            scraper: Arc::new(Mutex::new(CollectionScraper::new(config, fetcher, observer))),
            policy: ValuationPolicy::default(),
        }
    }

    pub fn policy(&self) -> &ValuationPolicy {
        &self.policy
    }
}

impl<F: PageFetcher + 'static> Service<ValuationRequest> for ValuationService<F> {
    type Response = CollectionReport;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ValuationRequest) -> Self::Future {
        info!("Valuation request: {}", req.url);

        let scraper = Arc::clone(&self.scraper);
        let policy = self.policy;

        Box::pin(async move {
            req.validate()?;

            let collection = scraper.lock().await.scrape_collection(req.url.trim()).await;
            let report = CollectionReport::build(collection, &policy);

            info!(
                "Valuation completed: {} groups, total={}, filtered={}",
                report.all_groups.len(),
                report.summary.grand_total_value,
                report.summary.filtered_total_value
            );

            Ok(report)
        })
    }
}
