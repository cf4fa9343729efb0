use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Which page of a run is being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// The page given on the command line; a non-HTML response is only a warning
    Main,
    /// A discovered subpage; a non-HTML response is rejected
    Subpage,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {0} timed out")]
    Timeout(String),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("{url} is not an HTML page (content-type: {content_type})")]
    NotHtml { url: String, content_type: String },
}

/// Source of raw page HTML
#[async_trait]
pub trait PageSource {
    /// Fetch the HTML body of `url`
    async fn fetch(&self, url: &str, kind: PageKind) -> Result<String, FetchError>;
}
