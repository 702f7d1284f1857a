//! Page HTML cache with time-based expiry

use crate::cache::{CacheResult, DiskStore};
use crate::config::CacheConfig;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One cached page as stored on disk
///
/// Serialized as `{"timestamp": "<RFC 3339>", "content": "<html>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    /// When the page was fetched
    pub timestamp: DateTime<Utc>,

    /// The page body
    pub content: String,
}

impl PageEntry {
    /// Creates an entry stamped with the current time
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            content: content.into(),
        }
    }

    /// Returns how long ago the page was fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.timestamp
    }

    /// Checks whether the entry is at least `expiry` old
    pub fn is_expired(&self, expiry: Duration) -> bool {
        self.age() >= expiry
    }
}

/// Cache of page HTML keyed by page URL
#[derive(Debug, Clone)]
pub struct PageCache {
    store: DiskStore,
    expiry: Duration,
}

impl PageCache {
    /// Creates a page cache in `dir` whose entries expire after `expiry`
    pub fn new(dir: impl Into<PathBuf>, expiry: Duration) -> Self {
        Self {
            store: DiskStore::new(dir, "json"),
            expiry,
        }
    }

    /// Creates the page cache described by the configuration
    ///
    /// An expiry too large for a `Duration` is clamped to the largest one.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(&config.pages_dir, expiry_from_hours(config.page_expiry_hours))
    }

    /// Underlying file store
    pub fn store(&self) -> &DiskStore {
        &self.store
    }

    /// Returns the cached HTML for `url` if present and not expired
    ///
    /// Unreadable or malformed entries are treated as absent.
    pub async fn get(&self, url: &str) -> Option<String> {
        match self.load(url).await {
            Ok(Some(entry)) if entry.is_expired(self.expiry) => {
                tracing::trace!("Page cache entry for {} expired ({:?} old)", url, entry.age());
                None
            }
            Ok(Some(entry)) => Some(entry.content),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Ignoring unreadable page cache entry for {}: {}", url, e);
                None
            }
        }
    }

    /// Stores `content` for `url` stamped with the current time
    pub async fn put(&self, url: &str, content: &str) {
        self.put_entry(url, &PageEntry::new(content)).await;
    }

    /// Removes every cached page
    pub async fn clear(&self) -> CacheResult<usize> {
        self.store.clear().await
    }

    /// Reads the raw entry for `url` without applying expiry
    pub async fn load(&self, url: &str) -> CacheResult<Option<PageEntry>> {
        match self.store.load(url).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn put_entry(&self, url: &str, entry: &PageEntry) {
        let result = match serde_json::to_vec(entry) {
            Ok(bytes) => self.store.save(url, &bytes).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            tracing::debug!("Failed to cache page {}: {}", url, e);
        }
    }
}

fn expiry_from_hours(hours: u64) -> Duration {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .unwrap_or(Duration::MAX)
}
