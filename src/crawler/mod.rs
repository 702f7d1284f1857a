//! Crawler module for page fetching and image matching
//!
//! This module contains the core crawling logic, including:
//! - HTTP client setup and page fetching
//! - HTML parsing and image extraction
//! - A bounded worker pool for per-page image batches
//! - Overall crawl coordination in exhaustive or sampling mode

mod coordinator;
mod fetcher;
mod parser;
mod pool;

pub use coordinator::{short_page_path, CrawlMode, CrawlReport, PageCrawler};
pub use fetcher::{build_http_client, fetch_page_html, PageError};
pub use parser::{extract_images, ImageRef, ImageScope};
pub use pool::WorkerPool;

use crate::cache::{ImageCache, PageCache};
use crate::config::Config;
use crate::images::ImageFetcher;
use crate::matcher::{ImageMatcher, SearchTerms};
use crate::ocr::{TesseractRecognizer, TextExtractor};
use crate::sitemap::load_sitemap;
use reqwest::Client;
use std::sync::Arc;

/// Wires the recognizer, image fetcher and matcher into a crawler
///
/// Warns once when the recognizer executable cannot be started; matching then
/// relies on image URLs and alt text.
pub async fn build_crawler(
    config: &Config,
    client: Client,
    page_cache: PageCache,
    image_cache: ImageCache,
) -> crate::Result<PageCrawler> {
    let recognizer = TesseractRecognizer::from_config(&config.ocr);
    if !recognizer.is_available().await {
        tracing::warn!(
            "'{}' could not be started; matching will rely on image URLs and alt text only",
            config.ocr.command
        );
    }

    let extractor = TextExtractor::new(Arc::new(recognizer), config.ocr.max_dimension);
    let fetcher = ImageFetcher::new(client.clone(), image_cache);
    let matcher = ImageMatcher::new(fetcher, extractor);

    Ok(PageCrawler::new(&config.crawler, client, page_cache, matcher)?)
}

/// Loads a sitemap and crawls every page it lists
///
/// This is the main entry point for a scan. It will:
/// 1. Fetch and parse the sitemap
/// 2. Visit the pages in the order `mode` dictates
/// 3. Return the collected matches and page counts
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran (individual pages may have failed)
/// * `Err(SiftError)` - The sitemap could not be loaded
pub async fn scan_sitemap(
    crawler: &PageCrawler,
    client: &Client,
    sitemap_url: &str,
    terms: &SearchTerms,
    mode: &CrawlMode,
) -> crate::Result<CrawlReport> {
    let pages = load_sitemap(client, sitemap_url).await?;
    Ok(crawler.run(&pages, terms, mode).await)
}
