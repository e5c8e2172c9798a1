//! Extraction of the final crop from the working image.
//!
//! The crop is always taken from the full-scale working image. Display
//! scaling never influences the result.

use thiserror::Error;

use crate::decode::DecodedImage;

use super::CropState;

/// Errors from crop extraction.
///
/// Only reachable when a [`CropState`] violates its bounds invariant, which
/// the crop controller never produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(
        "Crop {width}x{height} at ({x}, {y}) exceeds working image {image_width}x{image_height}"
    )]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
}

/// Extract the `target_width x target_height` region selected by `crop`.
///
/// The origin is `(round(x_ratio * width), round(y_ratio * height))`.
///
/// # Errors
///
/// Returns [`ExtractError::OutOfBounds`] if the region does not lie fully
/// inside `image`.
pub fn extract_crop(
    image: &DecodedImage,
    crop: &CropState,
    target_width: u32,
    target_height: u32,
) -> Result<DecodedImage, ExtractError> {
    let (x, y) = crop.pixel_origin(image.width, image.height);

    let out_of_bounds = x < 0
        || y < 0
        || x + target_width as i64 > image.width as i64
        || y + target_height as i64 > image.height as i64;
    if out_of_bounds {
        return Err(ExtractError::OutOfBounds {
            x,
            y,
            width: target_width,
            height: target_height,
            image_width: image.width,
            image_height: image.height,
        });
    }

    let (left, top) = (x as usize, y as usize);
    let src_stride = image.width as usize * 3;
    let row_len = target_width as usize * 3;
    let mut output = Vec::with_capacity(row_len * target_height as usize);

    // Copy pixel data row by row
    for row in 0..target_height as usize {
        let start = (top + row) * src_stride + left * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(target_width, target_height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
