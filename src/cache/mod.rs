//! On-disk content caches
//!
//! Two caches sit between the crawler and the network:
//! - `PageCache`: page HTML wrapped with a fetch timestamp, expires after a fixed window
//! - `ImageCache`: normalized PNG bytes, never expires
//!
//! Both address entries by the SHA-256 of the URL and share the same file store.
//! The caches are an optimization only: every read or write failure is logged and
//! reported to callers as a miss.

mod image;
mod page;
mod store;

pub use image::ImageCache;
pub use page::{PageCache, PageEntry};
pub use store::DiskStore;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised inside the cache layer
///
/// These never leave the public `get`/`put` methods; they exist so the
/// internal paths can tell "absent" apart from "unreadable".
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Computes the content address for a URL
///
/// The key is the lowercase hex SHA-256 of the exact URL string, so it is
/// stable across runs and processes.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
