//! Color normalization applied to every fetched image
//!
//! Palette images are expanded by the decoders, so by the time an image gets
//! here it is grey, RGB, or carries an alpha channel. Alpha is flattened onto
//! white so recognition always sees an opaque picture.

use image::{imageops, ColorType, DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Returns an opaque 8-bit grey or RGB version of `image`
pub fn normalize(image: DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        return flatten_onto_white(&image);
    }

    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => image,
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

/// Composites `image` over an opaque white canvas of the same size
pub fn flatten_onto_white(image: &DynamicImage) -> DynamicImage {
    let foreground = image.to_rgba8();
    let mut canvas = RgbaImage::from_pixel(
        foreground.width(),
        foreground.height(),
        Rgba([255, 255, 255, 255]),
    );
    imageops::overlay(&mut canvas, &foreground, 0, 0);

    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Encodes `image` as PNG, the image cache's on-disk format
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
