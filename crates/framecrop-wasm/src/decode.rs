//! Stateless decoding helpers for JavaScript.
//!
//! - [`decode_jpeg`] - Decode file bytes as stored, without orientation
//! - [`exif_orientation`] - Read the EXIF orientation code (1 when unknown)
//! - [`normalize_jpeg`] - Decode and turn the pixels upright
//! - [`is_jpeg_file_name`] - Filter directory listings
//!
//! ```typescript
//! import { decode_jpeg, exif_orientation, is_jpeg_file_name } from '@framecrop/wasm';
//!
//! const names = entries.filter(is_jpeg_file_name);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! console.log(`orientation ${exif_orientation(bytes)}`);
//! ```

use framecrop_core::decode::{self, ImageInfo};
use framecrop_core::transform::{normalize, resolve_orientation};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, to_js_error, JsDecodedImage};

/// Decode image bytes to RGB pixels exactly as stored in the file.
#[wasm_bindgen]
pub fn decode_jpeg(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// EXIF orientation code of `bytes`, `1` when absent or invalid.
#[wasm_bindgen]
pub fn exif_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes).code()
}

/// Decode image bytes and apply their EXIF orientation.
#[wasm_bindgen]
pub fn normalize_jpeg(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    let decoded = decode::decode_image(bytes).map_err(to_js_error)?;
    let info = ImageInfo::new(decode::get_orientation(bytes), decoded.width, decoded.height);
    let upright = normalize(decoded, &resolve_orientation(&info));
    Ok(JsDecodedImage::from_decoded(upright))
}

/// Resize an image to exact dimensions.
///
/// `filter`: 0=Nearest, 1=Bilinear, 2=Lanczos3, 3=Bicubic.
#[wasm_bindgen]
pub fn resize(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    decode::resize(&image.to_decoded(), width, height, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Whether a file name ends in `.jpg` or `.jpeg` (any case).
#[wasm_bindgen]
pub fn is_jpeg_file_name(name: &str) -> bool {
    framecrop_core::is_jpeg_file_name(name)
}
