//! Sitemap loading
//!
//! Fetches a sitemap over HTTP and turns it into the ordered list of page URLs
//! to crawl. Responses that are really HTML (a bot-protection page, a login
//! wall) are rejected before any XML parsing is attempted.

mod parser;

pub use parser::{parse_sitemap, SITEMAP_NAMESPACE};

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;

/// Errors that can occur while loading a sitemap
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to fetch sitemap: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sitemap request returned HTTP {status}")]
    Status { status: u16 },

    #[error("Received HTML instead of XML - likely blocked (content type: {content_type})")]
    Blocked { content_type: String },

    #[error("Failed to parse sitemap: {0}")]
    Parse(String),
}

/// Fetches and parses the sitemap at `url`
///
/// # Arguments
///
/// * `client` - HTTP client carrying the browser header set
/// * `url` - Absolute URL of the sitemap document
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Page URLs in document order
/// * `Err(SitemapError)` - The sitemap could not be fetched or parsed
pub async fn load_sitemap(client: &Client, url: &str) -> Result<Vec<String>, SitemapError> {
    tracing::info!("Fetching sitemap from {}", url);

    let response = client.get(url).send().await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = response.bytes().await?;

    if looks_like_html(&content_type, &body) {
        return Err(SitemapError::Blocked { content_type });
    }

    if !status.is_success() {
        return Err(SitemapError::Status {
            status: status.as_u16(),
        });
    }

    let urls = parse_sitemap(&body).map_err(SitemapError::Parse)?;
    tracing::info!("Sitemap lists {} pages", urls.len());

    Ok(urls)
}

/// Returns true when a response is an HTML page rather than an XML document
pub fn looks_like_html(content_type: &str, body: &[u8]) -> bool {
    if content_type.to_ascii_lowercase().contains("html") {
        return true;
    }

    let start = body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|i| &body[i..])
        .unwrap_or(&[]);
    let head = String::from_utf8_lossy(&start[..start.len().min(32)]).to_ascii_lowercase();

    head.starts_with("<!doctype html") || head.starts_with("<html")
}
