//! File-per-entry store backing both caches

use crate::cache::{cache_key, CacheResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes temporary files written concurrently for the same key
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// A directory of `<sha256>.<extension>` files
///
/// Writes land in a temporary file that is renamed into place, so a
/// concurrent reader sees either the old entry, the new one, or nothing.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
    extension: &'static str,
}

impl DiskStore {
    /// Creates a store rooted at `dir`; the directory is created lazily on first write
    pub fn new(dir: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            dir: dir.into(),
            extension,
        }
    }

    /// The directory holding this store's entries
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `url`, whether or not it exists
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", cache_key(url), self.extension))
    }

    /// Reads the raw entry for `url`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - Entry exists
    /// * `Ok(None)` - No entry for this URL
    /// * `Err(CacheError)` - The entry exists but could not be read
    pub async fn load(&self, url: &str) -> CacheResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(url)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the entry for `url`, replacing any previous one
    pub async fn save(&self, url: &str, bytes: &[u8]) -> CacheResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.path_for(url);
        let tmp = self.dir.join(format!(
            "{}.{}.{}.tmp",
            cache_key(url),
            std::process::id(),
            WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        tokio::fs::write(&tmp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(())
    }

    /// Removes every file in the store
    ///
    /// A missing directory counts as an empty store.
    ///
    /// # Returns
    ///
    /// The number of files removed
    pub async fn clear(&self) -> CacheResult<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
