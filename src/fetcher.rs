//! reqwestによるページ取得

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::PageFetcher;

/// 素のHTTP GETでページを取得する（ヘッダー・認証・クッキーなし）
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ScraperError::Fetch(format!("HTTPクライアント初期化エラー: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
