//! Crop rectangle position.

use serde::{Deserialize, Serialize};

/// Top-left corner of the crop rectangle as a fraction of the working image.
///
/// Ratios are independent of the display scale, so the same state drives both
/// the on-screen frame and the full-resolution extraction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropState {
    pub x_ratio: f64,
    pub y_ratio: f64,
}

impl CropState {
    pub fn new(x_ratio: f64, y_ratio: f64) -> Self {
        Self { x_ratio, y_ratio }
    }

    /// Center a `target_width x target_height` rectangle in the working image.
    pub fn centered(width: u32, height: u32, target_width: u32, target_height: u32) -> Self {
        Self {
            x_ratio: centered_ratio(width, target_width),
            y_ratio: centered_ratio(height, target_height),
        }
    }

    /// Pixel origin in the working image, rounded to the nearest pixel.
    ///
    /// Signed so that inconsistent states surface as out-of-bounds instead of
    /// wrapping.
    pub fn pixel_origin(&self, width: u32, height: u32) -> (i64, i64) {
        (
            (self.x_ratio * width as f64).round() as i64,
            (self.y_ratio * height as f64).round() as i64,
        )
    }
}

fn centered_ratio(dim: u32, target: u32) -> f64 {
    if dim == 0 {
        return 0.0;
    }
    (dim.saturating_sub(target) as f64 / 2.0) / dim as f64
}

/// Largest legal crop ratio on each axis for one working image.
///
/// A ratio `r` is legal when `r * dim + target <= dim`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropLimits {
    pub max_x_ratio: f64,
    pub max_y_ratio: f64,
}

impl CropLimits {
    pub fn new(width: u32, height: u32, target_width: u32, target_height: u32) -> Self {
        Self {
            max_x_ratio: max_ratio(width, target_width),
            max_y_ratio: max_ratio(height, target_height),
        }
    }

    pub fn clamp_x(&self, ratio: f64) -> f64 {
        ratio.clamp(0.0, self.max_x_ratio)
    }

    pub fn clamp_y(&self, ratio: f64) -> f64 {
        ratio.clamp(0.0, self.max_y_ratio)
    }

    /// Whether `crop` keeps the rectangle inside the working image.
    pub fn contains(&self, crop: &CropState) -> bool {
        (0.0..=self.max_x_ratio).contains(&crop.x_ratio)
            && (0.0..=self.max_y_ratio).contains(&crop.y_ratio)
    }
}

fn max_ratio(dim: u32, target: u32) -> f64 {
    if dim == 0 {
        return 0.0;
    }
    dim.saturating_sub(target) as f64 / dim as f64
}
