use crate::config::types::{CacheConfig, Config, CrawlerConfig, HttpConfig, OcrConfig};
use crate::ConfigError;
use scraper::Selector;

/// Upper bound on the image worker pool
pub const MAX_WORKERS: usize = 64;

/// Longest page cache expiry accepted, one hundred years
pub const MAX_PAGE_EXPIRY_HOURS: u64 = 24 * 365 * 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_cache_config(&config.cache)?;
    validate_http_config(&config.http)?;
    validate_ocr_config(&config.ocr)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_workers(config.workers)?;

    if Selector::parse(&config.content_selector).is_err() {
        return Err(ConfigError::Validation(format!(
            "content_selector is not a valid CSS selector: '{}'",
            config.content_selector
        )));
    }

    if config.sample_max_pages < 1 {
        return Err(ConfigError::Validation(
            "sample_max_pages must be >= 1".to_string(),
        ));
    }

    if config.sample_target_matched_pages < 1
        || config.sample_target_matched_pages > config.sample_max_pages
    {
        return Err(ConfigError::Validation(format!(
            "sample_target_matched_pages must be between 1 and sample_max_pages ({}), got {}",
            config.sample_max_pages, config.sample_target_matched_pages
        )));
    }

    Ok(())
}

/// Validates the configured worker count
fn validate_workers(workers: usize) -> Result<(), ConfigError> {
    if workers < 1 || workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

/// Worker count for a command-line override
///
/// Any value is accepted; zero is raised to one so the pool can make progress.
pub fn effective_workers(requested: usize) -> usize {
    if requested == 0 {
        tracing::warn!("--workers 0 is not usable, running with 1 worker");
    }
    requested.max(1)
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.pages_dir.is_empty() {
        return Err(ConfigError::Validation(
            "pages_dir cannot be empty".to_string(),
        ));
    }

    if config.images_dir.is_empty() {
        return Err(ConfigError::Validation(
            "images_dir cannot be empty".to_string(),
        ));
    }

    if config.pages_dir == config.images_dir {
        return Err(ConfigError::Validation(
            "pages_dir and images_dir must be different directories".to_string(),
        ));
    }

    if config.page_expiry_hours < 1 || config.page_expiry_hours > MAX_PAGE_EXPIRY_HOURS {
        return Err(ConfigError::Validation(format!(
            "page_expiry_hours must be between 1 and {}, got {}",
            MAX_PAGE_EXPIRY_HOURS, config.page_expiry_hours
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got timeout={}s connect={}s",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates text recognition configuration
fn validate_ocr_config(config: &OcrConfig) -> Result<(), ConfigError> {
    if config.command.trim().is_empty() {
        return Err(ConfigError::Validation(
            "ocr command cannot be empty".to_string(),
        ));
    }

    if config.language.is_empty()
        || !config
            .language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '+')
    {
        return Err(ConfigError::Validation(format!(
            "ocr language must be a tesseract language code, got '{}'",
            config.language
        )));
    }

    if config.max_dimension < 16 {
        return Err(ConfigError::Validation(format!(
            "max_dimension must be >= 16, got {}",
            config.max_dimension
        )));
    }

    Ok(())
}
