use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use thiserror::Error;

/// Longest side handed to the encoder; its own preprocessing crops to 224.
pub const DEFAULT_MAX_SIDE: u32 = 448;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image payload is empty")]
    Empty,
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has zero width or height")]
    ZeroSized,
}

/// Decode an uploaded image to RGB8, downscaling so neither side exceeds `max_side`.
pub fn decode_image(bytes: &[u8], max_side: u32) -> Result<RgbImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    let img = image::load_from_memory(bytes)?;
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(ImageError::ZeroSized);
    }
    let img = if w.max(h) > max_side.max(1) {
        // resize() keeps the aspect ratio inside the bounding box
        img.resize(max_side, max_side, FilterType::Triangle)
    } else {
        img
    };
    Ok(img.to_rgb8())
}

/// PNG bytes for shipping an image to a remote encoder.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.clone()).write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}
