//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the page loop that drives a crawl run:
//! - Choosing the next page (sitemap order or random sampling)
//! - Loading page HTML through the page cache
//! - Extracting images and matching them on the worker pool
//! - Collecting matches and per-page outcomes into a report

use crate::cache::PageCache;
use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{fetch_page_html, PageError};
use crate::crawler::parser::{extract_images, ImageScope};
use crate::crawler::pool::WorkerPool;
use crate::matcher::{ImageMatcher, MatchResult, SearchTerms};
use crate::state::{PageOutcome, SampleProgress};
use crate::ConfigError;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Longest page path shown next to the progress bar
const MAX_PATH_DISPLAY: usize = 100;

/// How pages are chosen from the sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlMode {
    /// Every page in sitemap order, images limited to the content container
    Exhaustive,

    /// Random pages, whole-page image search, stopping early
    Sampling {
        /// Upper bound on pages tried
        max_pages: usize,
        /// Stop once this many distinct pages matched
        target_matched_pages: usize,
        /// Fixed RNG seed, random when `None`
        seed: Option<u64>,
    },
}

impl CrawlMode {
    /// Sampling mode with limits taken from the crawler configuration
    pub fn sampling(config: &CrawlerConfig) -> Self {
        Self::Sampling {
            max_pages: config.sample_max_pages,
            target_matched_pages: config.sample_target_matched_pages,
            seed: config.sample_seed,
        }
    }
}

/// Everything a crawl run produced
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Matching images in the order their checks completed
    pub matches: Vec<MatchResult>,

    /// Pages visited, including failed ones
    pub pages_visited: usize,

    /// Pages whose HTML could not be fetched
    pub pages_failed: usize,

    /// Pages without the content container
    pub pages_skipped: usize,

    /// Distinct pages with at least one match
    pub matched_pages: usize,
}

impl CrawlReport {
    fn record(&mut self, outcome: PageOutcome, matches: Vec<MatchResult>) {
        self.pages_visited += 1;
        if outcome.is_error() {
            self.pages_failed += 1;
        }
        if outcome.is_skipped() {
            self.pages_skipped += 1;
        }
        if outcome.is_match() {
            self.matched_pages += 1;
        }
        self.matches.extend(matches);
    }
}

/// Result of visiting a single page
struct PageVisit {
    outcome: PageOutcome,
    matches: Vec<MatchResult>,
}

/// Drives a crawl over a list of page URLs
pub struct PageCrawler {
    client: Client,
    page_cache: PageCache,
    matcher: ImageMatcher,
    pool: WorkerPool,
    content_scope: ImageScope,
    show_progress: bool,
}

impl PageCrawler {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `config` - Worker count and content selector
    /// * `client` - HTTP client for page requests
    /// * `page_cache` - Cache consulted before every page request
    /// * `matcher` - Image matcher run on the worker pool
    ///
    /// # Returns
    ///
    /// * `Ok(PageCrawler)` - Ready to run
    /// * `Err(ConfigError)` - The content selector is not valid CSS
    pub fn new(
        config: &CrawlerConfig,
        client: Client,
        page_cache: PageCache,
        matcher: ImageMatcher,
    ) -> Result<Self, ConfigError> {
        let content_scope =
            ImageScope::within(&config.content_selector).map_err(ConfigError::Validation)?;

        Ok(Self {
            client,
            page_cache,
            matcher,
            pool: WorkerPool::new(config.workers),
            content_scope,
            show_progress: false,
        })
    }

    /// Shows a progress bar on stderr during exhaustive runs
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Runs the crawl
    ///
    /// Page failures are logged and counted; a run always completes.
    pub async fn run(&self, pages: &[String], terms: &SearchTerms, mode: &CrawlMode) -> CrawlReport {
        let terms = Arc::new(terms.clone());

        match mode {
            CrawlMode::Exhaustive => self.run_exhaustive(pages, &terms).await,
            CrawlMode::Sampling {
                max_pages,
                target_matched_pages,
                seed,
            } => {
                let progress = SampleProgress::new(*max_pages, *target_matched_pages);
                let rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                self.run_sampling(pages, &terms, progress, rng).await
            }
        }
    }

    async fn run_exhaustive(&self, pages: &[String], terms: &Arc<SearchTerms>) -> CrawlReport {
        tracing::info!("Scanning {} pages for matching images...", pages.len());

        let bar = self.progress_bar(pages.len());
        let mut report = CrawlReport::default();
        let start_time = Instant::now();

        for page_url in pages {
            bar.set_message(short_page_path(page_url));
            let visit = self.visit(page_url, &self.content_scope, terms, &bar).await;
            report.record(visit.outcome, visit.matches);
            bar.inc(1);

            // Progress reporting every 10 pages
            if report.pages_visited % 10 == 0 {
                let rate = report.pages_visited as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {}/{} pages, {} matches, {:.2} pages/sec",
                    report.pages_visited,
                    pages.len(),
                    report.matches.len(),
                    rate
                );
            }
        }

        bar.finish_and_clear();
        log_summary(&report);
        report
    }

    async fn run_sampling(
        &self,
        pages: &[String],
        terms: &Arc<SearchTerms>,
        mut progress: SampleProgress,
        mut rng: StdRng,
    ) -> CrawlReport {
        tracing::info!("Sampling random pages from {} sitemap entries", pages.len());

        let mut untried: Vec<&String> = pages.iter().collect();
        let mut report = CrawlReport::default();
        let hidden = ProgressBar::hidden();

        while !progress.is_done() && !untried.is_empty() {
            let page_url = untried.swap_remove(rng.gen_range(0..untried.len()));
            if !progress.mark_tried(page_url) {
                // Listed twice in the sitemap
                continue;
            }

            let visit = self
                .visit(page_url, &ImageScope::WholePage, terms, &hidden)
                .await;
            if visit.outcome.is_match() {
                progress.mark_matched(page_url);
            }
            report.record(visit.outcome, visit.matches);

            tracing::debug!(
                "Sampled {} pages, {} matched",
                progress.tried_count(),
                progress.matched_count()
            );
        }

        log_summary(&report);
        report
    }

    /// Loads one page and matches all of its images
    async fn visit(
        &self,
        page_url: &str,
        scope: &ImageScope,
        terms: &Arc<SearchTerms>,
        bar: &ProgressBar,
    ) -> PageVisit {
        let (html, cached) = match self.load_page(page_url).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("Failed to fetch {} ({}): {}", page_url, e.kind(), e);
                return PageVisit {
                    outcome: PageOutcome::Failed,
                    matches: Vec::new(),
                };
            }
        };

        let marker = if cached { "✓" } else { "↓" };
        bar.set_message(format!("{} {}", short_page_path(page_url), marker));
        tracing::debug!(
            "Page {} ({})",
            page_url,
            if cached { "cached" } else { "fetched" }
        );

        let images = match extract_images(&html, page_url, scope) {
            Some(images) => images,
            None => {
                tracing::debug!("No content container on {}", page_url);
                return PageVisit {
                    outcome: PageOutcome::NoContainer,
                    matches: Vec::new(),
                };
            }
        };

        tracing::debug!("Checking {} images on {}", images.len(), page_url);

        let matches: Vec<MatchResult> = self
            .pool
            .run_batch(images, |image| {
                let matcher = self.matcher.clone();
                let terms = Arc::clone(terms);
                async move { matcher.match_image(&image, &terms).await }
            })
            .await
            .into_iter()
            .flatten()
            .collect();

        let outcome = if matches.is_empty() {
            PageOutcome::NoMatches
        } else {
            PageOutcome::Matched
        };

        PageVisit { outcome, matches }
    }

    /// Returns the page HTML and whether it came from the cache
    async fn load_page(&self, page_url: &str) -> Result<(String, bool), PageError> {
        if let Some(html) = self.page_cache.get(page_url).await {
            return Ok((html, true));
        }

        let html = fetch_page_html(&self.client, page_url).await?;
        self.page_cache.put(page_url, &html).await;
        Ok((html, false))
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

fn log_summary(report: &CrawlReport) {
    tracing::info!(
        "Crawl finished: {} pages visited, {} failed, {} without content, {} with matches",
        report.pages_visited,
        report.pages_failed,
        report.pages_skipped,
        report.matched_pages
    );
}

/// Formats a page URL for display: path and query without the host, at most 100 characters
pub fn short_page_path(page_url: &str) -> String {
    let display = match Url::parse(page_url) {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        Err(_) => page_url.to_string(),
    };

    display.chars().take(MAX_PATH_DISPLAY).collect()
}
