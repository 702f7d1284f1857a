use serde::Deserialize;

/// Browser-like user agent; some sites refuse requests from obvious bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Main configuration structure for Pixel-Sift
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
    pub ocr: OcrConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of images matched concurrently within one page
    pub workers: usize,

    /// CSS selector for the article body scanned in exhaustive mode
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// Upper bound on pages tried in sampling mode
    #[serde(rename = "sample-max-pages")]
    pub sample_max_pages: usize,

    /// Sampling stops once this many distinct pages had a match
    #[serde(rename = "sample-target-matched-pages")]
    pub sample_target_matched_pages: usize,

    /// Fixed RNG seed for reproducible sampling runs
    #[serde(rename = "sample-seed")]
    pub sample_seed: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            content_selector: "div.entry-content".to_string(),
            sample_max_pages: 20,
            sample_target_matched_pages: 5,
            sample_seed: None,
        }
    }
}

/// On-disk cache locations and expiry
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding cached page HTML
    #[serde(rename = "pages-dir")]
    pub pages_dir: String,

    /// Directory holding normalized images
    #[serde(rename = "images-dir")]
    pub images_dir: String,

    /// Age after which a cached page is refetched
    #[serde(rename = "page-expiry-hours")]
    pub page_expiry_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            pages_dir: "cache/pages".to_string(),
            images_dir: "cache/images".to_string(),
            page_expiry_hours: 24,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Text recognition configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path or name of the tesseract executable
    pub command: String,

    /// Tesseract language code
    pub language: String,

    /// Images with a longer side above this are downscaled before recognition
    #[serde(rename = "max-dimension")]
    pub max_dimension: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
            max_dimension: 4000,
        }
    }
}
