//! Configuration module for Pixel-Sift
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Without a file every setting takes its default.
//!
//! # Example
//!
//! ```no_run
//! use pixel_sift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pixel-sift.toml")).unwrap();
//! println!("Page cache lives in: {}", config.cache.pages_dir);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, CrawlerConfig, HttpConfig, OcrConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
pub use validation::{effective_workers, validate, MAX_PAGE_EXPIRY_HOURS, MAX_WORKERS};
