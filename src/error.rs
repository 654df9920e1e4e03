use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("URLが不正です: {0}")]
    InvalidUrl(String),

    #[error("ページ取得エラー: {0}")]
    Fetch(String),

    #[error("HTTPステータスエラー: {url} ({status})")]
    HttpStatus { url: String, status: u16 },

    #[error("解析エラー: {0}")]
    Parse(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),
}

impl From<reqwest::Error> for ScraperError {
    fn from(err: reqwest::Error) -> Self {
        match (err.url(), err.status()) {
            (Some(url), Some(status)) => ScraperError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            },
            _ => ScraperError::Fetch(err.to_string()),
        }
    }
}

impl From<url::ParseError> for ScraperError {
    fn from(err: url::ParseError) -> Self {
        ScraperError::InvalidUrl(err.to_string())
    }
}
