//! Image download and decode
//!
//! This module resolves an image URL into decoded pixels:
//! - Image cache lookup
//! - Inline base64 `data:` URIs
//! - HTTP download with a Content-Type check
//! - Decode, color normalization and cache write-back

use crate::cache::ImageCache;
use crate::images::normalize::{encode_png, normalize};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;

/// Reasons an image could not be produced
///
/// Callers of `ImageFetcher::fetch` only ever see `None`; these variants
/// show up in debug logs.
#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Expected an image, got Content-Type '{content_type}'")]
    NotAnImage { content_type: String },

    #[error("Unsupported data URI (no base64 payload)")]
    UnsupportedDataUri,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Downloads, decodes and caches images
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
    cache: ImageCache,
}

impl ImageFetcher {
    pub fn new(client: Client, cache: ImageCache) -> Self {
        Self { client, cache }
    }

    /// Returns the normalized image at `url`, or `None` if it cannot be obtained
    ///
    /// A cache hit skips the network entirely. Freshly decoded images are
    /// written to the cache before being returned.
    pub async fn fetch(&self, url: &str) -> Option<DynamicImage> {
        if let Some(image) = self.cached(url).await {
            tracing::trace!("Image cache hit: {}", url);
            return Some(image);
        }

        match self.fetch_uncached(url).await {
            Ok((image, png)) => {
                self.cache.put(url, &png).await;
                Some(image)
            }
            Err(e) => {
                tracing::debug!("Skipping image {}: {}", url, e);
                None
            }
        }
    }

    async fn cached(&self, url: &str) -> Option<DynamicImage> {
        let bytes = self.cache.get(url).await?;
        match decode_cached(bytes).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::debug!("Cached image for {} is unreadable, refetching: {}", url, e);
                None
            }
        }
    }

    async fn fetch_uncached(&self, url: &str) -> Result<(DynamicImage, Vec<u8>), ImageFetchError> {
        let bytes = if url.starts_with("data:") {
            decode_data_uri(url)?
        } else {
            self.download(url).await?
        };

        decode_normalized(bytes).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ImageFetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !content_type.starts_with("image/") {
            return Err(ImageFetchError::NotAnImage { content_type });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Extracts the payload of a base64 `data:` URI
///
/// URIs without a `;base64` marker in the header are not supported.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageFetchError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or(ImageFetchError::UnsupportedDataUri)?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(ImageFetchError::UnsupportedDataUri)?;

    if !header.contains(";base64") {
        return Err(ImageFetchError::UnsupportedDataUri);
    }

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(payload)?)
}

/// Decodes and normalizes on the blocking pool, returning the image and its PNG encoding
async fn decode_normalized(bytes: Vec<u8>) -> Result<(DynamicImage, Vec<u8>), ImageFetchError> {
    tokio::task::spawn_blocking(move || {
        let image = normalize(image::load_from_memory(&bytes)?);
        let png = encode_png(&image)?;
        Ok::<_, ImageFetchError>((image, png))
    })
    .await
    .map_err(|e| ImageFetchError::Task(e.to_string()))?
}

/// Decodes a cached PNG on the blocking pool
async fn decode_cached(bytes: Vec<u8>) -> Result<DynamicImage, ImageFetchError> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| ImageFetchError::Task(e.to_string()))?
        .map_err(ImageFetchError::from)
}
