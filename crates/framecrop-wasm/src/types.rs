//! JavaScript-facing image and error types.

use framecrop_core::decode::{DecodedImage, FilterType};
use wasm_bindgen::prelude::*;

/// An RGB bitmap handed to JavaScript.
///
/// Used for the display bitmap the host paints and for the extracted crop.
/// The pixels live in WASM memory until `pixels()` copies them out.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Wrap RGB pixel data (3 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Copy of the RGB pixel data as a `Uint8Array`.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Copy of the pixel data as RGBA, ready for `ImageData`.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for rgb in self.pixels.chunks_exact(3) {
            rgba.extend_from_slice(rgb);
            rgba.push(255);
        }
        rgba
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Map a numeric filter id from JavaScript to a [`FilterType`].
///
/// 0 = Nearest, 1 = Bilinear, 2 = Lanczos3, 3 = Bicubic. Anything else is
/// Bicubic.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bicubic,
    }
}

/// Convert any error into a JavaScript `Error`.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decoded() {
        let js_img = JsDecodedImage::from_decoded(DecodedImage::filled(80, 48, [1, 2, 3]));
        assert_eq!(js_img.width(), 80);
        assert_eq!(js_img.height(), 48);
        assert_eq!(js_img.byte_length(), 80 * 48 * 3);
    }

    #[test]
    fn test_to_decoded_round_trip() {
        let image = DecodedImage::filled(4, 2, [9, 8, 7]);
        let js_img = JsDecodedImage::from_decoded(image.clone());
        assert_eq!(js_img.to_decoded(), image);
    }

    #[test]
    fn test_rgba_pixels() {
        let img = JsDecodedImage::new(2, 1, vec![255, 128, 64, 32, 16, 8]);
        assert_eq!(img.rgba_pixels(), vec![255, 128, 64, 255, 32, 16, 8, 255]);
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        assert_eq!(filter_from_u8(3), FilterType::Bicubic);
        assert_eq!(filter_from_u8(200), FilterType::Bicubic);
    }
}
