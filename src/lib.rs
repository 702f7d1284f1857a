//! Pixel-Sift: find images on a website that mention a set of terms
//!
//! This crate walks the pages listed in a sitemap, pulls every embedded image and
//! checks it against search terms using recognized text, the image URL and its alt
//! text. Pages and images are cached on disk between runs.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod images;
pub mod matcher;
pub mod ocr;
pub mod output;
pub mod sitemap;
pub mod state;

use thiserror::Error;

/// Main error type for Pixel-Sift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] sitemap::SitemapError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Pixel-Sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{cache_key, ImageCache, PageCache};
pub use config::Config;
pub use crawler::{build_crawler, scan_sitemap, CrawlMode, CrawlReport, ImageRef, PageCrawler};
pub use matcher::{ImageMatcher, MatchResult, MatchSource, SearchTerms};
pub use ocr::{TesseractRecognizer, TextExtractor, TextRecognizer};
