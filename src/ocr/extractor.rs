//! Image preparation and text extraction
//!
//! Resizing and color conversion run on the blocking pool before the image
//! reaches the recognizer.

use crate::ocr::TextRecognizer;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage};
use std::sync::Arc;

/// Prepares images and runs them through a recognizer
#[derive(Clone)]
pub struct TextExtractor {
    recognizer: Arc<dyn TextRecognizer>,
    max_dimension: u32,
}

impl TextExtractor {
    /// Creates an extractor that downscales anything larger than `max_dimension`
    pub fn new(recognizer: Arc<dyn TextRecognizer>, max_dimension: u32) -> Self {
        Self {
            recognizer,
            max_dimension,
        }
    }

    /// Returns the lowercased text in `image`
    ///
    /// Recognition failures are logged and produce an empty string.
    pub async fn extract(&self, image: &DynamicImage) -> String {
        let image = image.clone();
        let max_dimension = self.max_dimension;
        let prepared = match tokio::task::spawn_blocking(move || {
            prepare_for_recognition(&image, max_dimension)
        })
        .await
        {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::debug!("Image preparation task failed: {}", e);
                return String::new();
            }
        };

        match self.recognizer.recognize(&prepared).await {
            Ok(text) => text.to_lowercase(),
            Err(e) => {
                tracing::debug!("Text recognition failed: {}", e);
                String::new()
            }
        }
    }
}

/// Converts `image` to grey or RGB and caps its longer side at `max_dimension`
///
/// Oversized images are scaled proportionally with a Lanczos filter; each side
/// is truncated to a whole pixel and never drops below one.
pub fn prepare_for_recognition(image: &DynamicImage, max_dimension: u32) -> DynamicImage {
    let image = match image.color() {
        ColorType::Rgb8 | ColorType::L8 => image.clone(),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    };

    let longest = image.width().max(image.height());
    if longest <= max_dimension {
        return image;
    }

    let ratio = max_dimension as f64 / longest as f64;
    let width = ((image.width() as f64 * ratio) as u32).max(1);
    let height = ((image.height() as f64 * ratio) as u32).max(1);

    image.resize_exact(width, height, FilterType::Lanczos3)
}
