//! Text recognition
//!
//! The recognition engine sits behind the `TextRecognizer` trait so the rest
//! of the crate can run against a stub in tests. `TextExtractor` wraps any
//! recognizer with the size and color preparation every image gets.

mod extractor;
mod tesseract;

pub use extractor::{prepare_for_recognition, TextExtractor};
pub use tesseract::TesseractRecognizer;

use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;

/// Errors from a recognition backend
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Failed to run recognizer: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode image for recognizer: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Image encoding task failed: {0}")]
    Task(String),

    #[error("Recognizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// A black-box image → text engine
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Returns the raw text found in `image`
    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}
