//! Normalized image cache

use crate::cache::{CacheResult, DiskStore};
use crate::config::CacheConfig;
use std::path::PathBuf;

/// Cache of normalized PNG images keyed by resolved image URL
///
/// Entries never expire; they are only removed by `clear`.
#[derive(Debug, Clone)]
pub struct ImageCache {
    store: DiskStore,
}

impl ImageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: DiskStore::new(dir, "png"),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(&config.images_dir)
    }

    /// Underlying file store
    pub fn store(&self) -> &DiskStore {
        &self.store
    }

    /// Returns the cached PNG bytes for `url`, if any
    pub async fn get(&self, url: &str) -> Option<Vec<u8>> {
        match self.store.load(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Ignoring unreadable image cache entry for {}: {}", url, e);
                None
            }
        }
    }

    /// Stores PNG bytes for `url`
    pub async fn put(&self, url: &str, png: &[u8]) {
        if let Err(e) = self.store.save(url, png).await {
            tracing::debug!("Failed to cache image {}: {}", url, e);
        }
    }

    /// Removes every cached image
    pub async fn clear(&self) -> CacheResult<usize> {
        self.store.clear().await
    }
}
