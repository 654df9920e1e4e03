use async_trait::async_trait;

use crate::collection::DebugSnapshot;
use crate::error::ScraperError;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// URLのHTML本文を取得（非2xxはエラー）
    async fn fetch(&self, url: &str) -> Result<String, ScraperError>;
}

/// 進捗・警告・デバッグ情報の通知先
pub trait ScrapeObserver: Send + Sync {
    /// ページ処理後に毎回呼ばれる（成功・失敗を問わない）
    fn on_progress(&self, _current: u32, _total: u32) {}

    /// ページ単位の致命的でない失敗
    fn on_warning(&self, _message: &str) {}

    /// 1ページ目の解析診断情報
    fn on_debug(&self, _snapshot: &DebugSnapshot) {}
}

/// 何も通知しないオブザーバー
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScrapeObserver for NoopObserver {}
