use std::time::Duration;

/// ページ間の待機時間（ミリ秒）
pub const DEFAULT_PAGE_DELAY_MS: u64 = 200;
/// デバッグ表示するテーブルHTMLの最大文字数
pub const DEFAULT_DEBUG_PREVIEW_LEN: usize = 2000;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub page_delay: Duration,
    pub debug_preview_len: usize,
    pub request_timeout: Option<Duration>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            debug_preview_len: DEFAULT_DEBUG_PREVIEW_LEN,
            request_timeout: None,
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_debug_preview_len(mut self, len: usize) -> Self {
        self.debug_preview_len = len;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScraperConfig::default();
        assert_eq!(config.page_delay, Duration::from_millis(200));
        assert_eq!(config.debug_preview_len, 2000);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ScraperConfig::new()
            .with_page_delay(Duration::ZERO)
            .with_debug_preview_len(64)
            .with_request_timeout(Duration::from_secs(10));

        assert_eq!(config.page_delay, Duration::ZERO);
        assert_eq!(config.debug_preview_len, 64);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
    }
}
