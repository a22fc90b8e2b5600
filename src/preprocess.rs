//! Turns an uploaded base64 image into the model's input batch.

use base64::{engine::general_purpose, Engine as _};
use image::{imageops::FilterType, DynamicImage};
use tract_onnx::prelude::tract_ndarray::Array4;

use crate::error::PreprocessError;

pub const IMAGE_SIZE: u32 = 128;
pub const CHANNELS: usize = 3;

/// Decodes a base64 payload. A `data:image/...;base64,` prefix and embedded
/// whitespace or line breaks are tolerated.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, PreprocessError> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    };
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(general_purpose::STANDARD.decode(cleaned)?)
}

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, PreprocessError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Resizes to 128x128 regardless of aspect ratio and lays the pixels out as
/// NHWC `[1, 128, 128, 3]` with raw 0-255 values.
pub fn to_batch(image: &DynamicImage) -> Array4<f32> {
    let resized = image
        .resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::CatmullRom)
        .to_rgb8();
    let size = IMAGE_SIZE as usize;

    Array4::from_shape_fn((1, size, size, CHANNELS), |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32
    })
}

pub fn preprocess(payload: &str) -> Result<Array4<f32>, PreprocessError> {
    let bytes = decode_base64(payload)?;
    let image = decode_image(&bytes)?;
    Ok(to_batch(&image))
}
