//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a sitemap, pages and images and run the
//! full scan cycle end-to-end. Text recognition is replaced by a stub that
//! returns fixed text.

use async_trait::async_trait;
use image::{DynamicImage, GrayImage};
use pixel_sift::config::{CacheConfig, CrawlerConfig, HttpConfig};
use pixel_sift::crawler::build_http_client;
use pixel_sift::images::{encode_png, ImageFetcher};
use pixel_sift::ocr::OcrError;
use pixel_sift::output::{CsvReport, ReportSink};
use pixel_sift::sitemap::{load_sitemap, SitemapError};
use pixel_sift::{
    scan_sitemap, CrawlMode, ImageCache, ImageMatcher, PageCache, PageCrawler, SearchTerms,
    SiftError, TextExtractor, TextRecognizer,
};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Recognizer that "reads" the same text from every image
struct StaticText(&'static str);

#[async_trait]
impl TextRecognizer for StaticText {
    async fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        Ok(self.0.to_string())
    }
}

fn cache_config(dir: &Path) -> CacheConfig {
    CacheConfig {
        pages_dir: dir.join("pages").to_string_lossy().into_owned(),
        images_dir: dir.join("images").to_string_lossy().into_owned(),
        page_expiry_hours: 24,
    }
}

fn test_client() -> Client {
    build_http_client(&HttpConfig::default()).expect("Failed to build client")
}

/// Builds a crawler whose caches live under `dir`
fn create_crawler(dir: &Path, ocr_text: &'static str, config: &CrawlerConfig) -> PageCrawler {
    let client = test_client();
    let caches = cache_config(dir);
    let extractor = TextExtractor::new(Arc::new(StaticText(ocr_text)), 4000);
    let fetcher = ImageFetcher::new(client.clone(), ImageCache::from_config(&caches));
    let matcher = ImageMatcher::new(fetcher, extractor);

    PageCrawler::new(config, client, PageCache::from_config(&caches), matcher)
        .expect("Failed to create crawler")
}

fn sitemap_xml(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn png_bytes() -> Vec<u8> {
    encode_png(&DynamicImage::ImageLuma8(GrayImage::new(4, 4))).expect("Failed to encode PNG")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Docs</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_sitemap(server: &MockServer, urls: &[String]) {
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sitemap_xml(urls), "application/xml"))
        .mount(server)
        .await;
}

async fn mount_png(server: &MockServer, image_path: &str) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(), "image/png"))
        .mount(server)
        .await;
}

async fn scan(
    crawler: &PageCrawler,
    server: &MockServer,
    terms: &[&str],
    mode: &CrawlMode,
) -> pixel_sift::CrawlReport {
    let sitemap = format!("{}/sitemap.xml", server.uri());
    scan_sitemap(
        crawler,
        &test_client(),
        &sitemap,
        &SearchTerms::new(terms.iter().copied()),
        mode,
    )
    .await
    .expect("Scan failed")
}

#[tokio::test]
async fn test_end_to_end_alt_text_match() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = vec![format!("{}/docs/page1", base), format!("{}/docs/page2", base)];
    mount_sitemap(&server, &pages).await;

    Mock::given(method("GET"))
        .and(path("/docs/page1"))
        .respond_with(html(
            r#"<div class="entry-content"><img alt="Our Logo" src="logo.png"></div>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/page2"))
        .respond_with(html(
            r#"<div class="entry-content"><p>Nothing to see</p></div>"#,
        ))
        .mount(&server)
        .await;
    mount_png(&server, "/docs/logo.png").await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["logo"], &CrawlMode::Exhaustive).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.matches.len(), 1);
    let found = &report.matches[0];
    assert_eq!(found.page_url, pages[0]);
    assert_eq!(found.image_url, format!("{}/docs/logo.png", base));
    assert_eq!(found.matched_term, "logo");

    let csv_path = dir.path().join("matching_images.csv");
    CsvReport::new(&csv_path).write_report(&report).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(
        csv,
        format!(
            "page_url,image_url,matched_term\n{},{}/docs/logo.png,logo\n",
            pages[0], base
        )
    );
}

#[tokio::test]
async fn test_recognized_text_match() {
    let server = MockServer::start().await;
    let pages = vec![format!("{}/guide", server.uri())];
    mount_sitemap(&server, &pages).await;

    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html(
            r#"<div class="entry-content"><img src="/img/screenshot.png" alt="Screenshot"></div>"#,
        ))
        .mount(&server)
        .await;
    mount_png(&server, "/img/screenshot.png").await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "Welcome to ACME Cloud", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["Acme"], &CrawlMode::Exhaustive).await;

    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].matched_term, "Acme");
    assert_eq!(report.matches[0].source, pixel_sift::MatchSource::Text);
}

#[tokio::test]
async fn test_svg_images_are_never_requested() {
    let server = MockServer::start().await;
    let pages = vec![format!("{}/guide", server.uri())];
    mount_sitemap(&server, &pages).await;

    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html(
            r#"<div class="entry-content"><img src="/img/logo.svg" alt="Logo"></div>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/logo.svg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "logo", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["logo"], &CrawlMode::Exhaustive).await;

    assert!(report.matches.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn test_page_without_container_yields_no_images() {
    let server = MockServer::start().await;
    let pages = vec![format!("{}/landing", server.uri())];
    mount_sitemap(&server, &pages).await;

    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(html(r#"<main><img src="/img/logo.png" alt="Logo"></main>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(), "image/png"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "logo", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["logo"], &CrawlMode::Exhaustive).await;

    assert!(report.matches.is_empty());
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.pages_skipped, 1);
    server.verify().await;
}

#[tokio::test]
async fn test_page_cache_prevents_second_fetch() {
    let server = MockServer::start().await;
    let pages = vec![format!("{}/cached", server.uri())];
    mount_sitemap(&server, &pages).await;

    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(html(r#"<div class="entry-content"></div>"#))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    scan(&crawler, &server, &["logo"], &CrawlMode::Exhaustive).await;
    let second = scan(&crawler, &server, &["logo"], &CrawlMode::Exhaustive).await;

    assert_eq!(second.pages_visited, 1);
    assert_eq!(second.pages_failed, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_image_cache_prevents_second_download() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = vec![format!("{}/a", base), format!("{}/b", base)];
    mount_sitemap(&server, &pages).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/(a|b)$"))
        .respond_with(html(
            r#"<div class="entry-content"><img src="/img/banner.png" alt="Banner"></div>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/banner.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(), "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["banner"], &CrawlMode::Exhaustive).await;

    assert_eq!(report.matches.len(), 2);
    assert!(ImageCache::from_config(&cache_config(dir.path()))
        .store()
        .path_for(&format!("{}/img/banner.png", base))
        .exists());
    server.verify().await;
}

#[tokio::test]
async fn test_non_image_response_is_skipped_and_not_cached() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = vec![format!("{}/a", base), format!("{}/b", base)];
    mount_sitemap(&server, &pages).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/(a|b)$"))
        .respond_with(html(
            r#"<div class="entry-content"><img src="/img/banner.png" alt="Banner"></div>"#,
        ))
        .mount(&server)
        .await;
    // Served as HTML, so it is requested again for the second page
    Mock::given(method("GET"))
        .and(path("/img/banner.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(), "text/html"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "banner", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["banner"], &CrawlMode::Exhaustive).await;

    assert!(report.matches.is_empty());
    assert_eq!(report.pages_visited, 2);
    assert!(!ImageCache::from_config(&cache_config(dir.path()))
        .store()
        .path_for(&format!("{}/img/banner.png", base))
        .exists());
    server.verify().await;
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = vec![format!("{}/broken", base), format!("{}/fine", base)];
    mount_sitemap(&server, &pages).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine"))
        .respond_with(html(
            r#"<div class="entry-content"><img src="/img/widget.png"></div>"#,
        ))
        .mount(&server)
        .await;
    mount_png(&server, "/img/widget.png").await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["widget"], &CrawlMode::Exhaustive).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].page_url, pages[1]);

    // Error pages are not cached
    let page_cache = PageCache::from_config(&cache_config(dir.path()));
    assert!(!page_cache.store().path_for(&pages[0]).exists());
    assert!(page_cache.store().path_for(&pages[1]).exists());
}

#[tokio::test]
async fn test_blocked_sitemap_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<!DOCTYPE html><html><body>Checking your browser</body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    let result = scan_sitemap(
        &crawler,
        &test_client(),
        &format!("{}/sitemap.xml", server.uri()),
        &SearchTerms::new(["logo"]),
        &CrawlMode::Exhaustive,
    )
    .await;

    assert!(matches!(
        result,
        Err(SiftError::Sitemap(SitemapError::Blocked { .. }))
    ));
}

#[tokio::test]
async fn test_sitemap_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("missing", "text/plain"))
        .mount(&server)
        .await;

    let result = load_sitemap(&test_client(), &format!("{}/sitemap.xml", server.uri())).await;
    assert!(matches!(result, Err(SitemapError::Status { status: 404 })));
}

#[tokio::test]
async fn test_sitemap_with_html_entities() {
    let server = MockServer::start().await;
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://docs.x.test/caf&eacute;</loc></url>
  <url><loc>https://docs.x.test/a&nbsp;b</loc></url>
</urlset>"#;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(xml, "application/xml"))
        .mount(&server)
        .await;

    let urls = load_sitemap(&test_client(), &format!("{}/sitemap.xml", server.uri()))
        .await
        .unwrap();

    assert_eq!(
        urls,
        vec![
            "https://docs.x.test/café".to_string(),
            "https://docs.x.test/a\u{a0}b".to_string(),
        ]
    );
}

/// Mounts `count` sampled pages at `/p/<n>`; every page shows `body`
async fn mount_sample_site(server: &MockServer, count: usize, body: &'static str) -> Vec<String> {
    let pages: Vec<String> = (0..count)
        .map(|n| format!("{}/p/{}", server.uri(), n))
        .collect();
    mount_sitemap(server, &pages).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/p/\d+$"))
        .respond_with(html(body))
        .mount(server)
        .await;

    pages
}

fn seeded_sampling() -> CrawlMode {
    CrawlMode::sampling(&CrawlerConfig {
        sample_seed: Some(42),
        ..CrawlerConfig::default()
    })
}

#[tokio::test]
async fn test_sampling_stops_at_target_matches() {
    let server = MockServer::start().await;
    mount_sample_site(&server, 30, r#"<img src="/img/match.png">"#).await;
    mount_png(&server, "/img/match.png").await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["match"], &seeded_sampling()).await;

    assert_eq!(report.pages_visited, 5);
    assert_eq!(report.matched_pages, 5);
    assert_eq!(report.matches.len(), 5);
}

#[tokio::test]
async fn test_sampling_stops_at_page_limit() {
    let server = MockServer::start().await;
    mount_sample_site(&server, 30, "<p>no images here</p>").await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["match"], &seeded_sampling()).await;

    assert_eq!(report.pages_visited, 20);
    assert_eq!(report.matched_pages, 0);
}

#[tokio::test]
async fn test_sampling_exhausts_small_sitemap() {
    let server = MockServer::start().await;
    let pages = mount_sample_site(&server, 3, "<p>no images here</p>").await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["match"], &seeded_sampling()).await;

    assert_eq!(report.pages_visited, pages.len());
}

#[tokio::test]
async fn test_sampling_scans_whole_page() {
    let server = MockServer::start().await;
    mount_sample_site(&server, 2, r#"<header><img src="/img/brand.png"></header>"#).await;
    mount_png(&server, "/img/brand.png").await;

    let dir = TempDir::new().unwrap();
    let crawler = create_crawler(dir.path(), "", &CrawlerConfig::default());
    let report = scan(&crawler, &server, &["brand"], &seeded_sampling()).await;

    assert_eq!(report.matched_pages, 2);
}
