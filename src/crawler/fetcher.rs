//! HTTP fetcher implementation
//!
//! This module handles the HTTP side of the crawler:
//! - Building the shared client with a browser-like header set
//! - GET requests for page HTML
//! - Error classification for failed pages

use crate::config::HttpConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

const ACCEPT_VALUE: &str =
    "text/html,application/xml,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// Reasons a page could not be fetched
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}")]
    Status { status: u16 },
}

impl PageError {
    /// Short classification used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(e) if e.is_connect() => "unreachable",
            Self::Http(_) => "network",
            Self::Status { .. } => "status",
        }
    }
}

/// Builds the HTTP client shared by sitemap, page and image requests
///
/// Every request carries the configured User-Agent plus the Accept,
/// Accept-Language and keep-alive headers a desktop browser would send.
///
/// # Example
///
/// ```no_run
/// use pixel_sift::config::HttpConfig;
/// use pixel_sift::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the HTML of one page
///
/// Redirects are followed by the client. Any non-success final status is a
/// failure; the body of an error page is never returned.
pub async fn fetch_page_html(client: &Client, url: &str) -> Result<String, PageError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(PageError::Status {
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}
