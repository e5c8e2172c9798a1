//! Display-space geometry for the working image and its crop frame.
//!
//! The working image is shown inside an arbitrary display area. It is shrunk
//! by `frame_scale` when it does not fit and is never enlarged. All values
//! here are in display pixels; nothing computed here feeds back into the
//! extracted crop.
//!
//! [`ViewportGeometry::compute`] is a pure function. [`Viewport`] caches the
//! display bitmap and only resamples when `frame_scale` changes.

use serde::{Deserialize, Serialize};

use crate::crop::CropState;
use crate::decode::{resize, DecodedImage, FilterType};

/// On-screen rectangle of the crop frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Geometry for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportGeometry {
    /// Shrink factor from working image to display bitmap (`>= 1.0`).
    pub frame_scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub scaled_target_width: u32,
    pub scaled_target_height: u32,
    /// Largest display-space x offset the frame may reach.
    pub max_rect_x: u32,
    /// Largest display-space y offset the frame may reach.
    pub max_rect_y: u32,
    /// Left edge of the display bitmap inside the display area.
    pub origin_x: u32,
    /// Top edge of the display bitmap inside the display area.
    pub origin_y: u32,
    /// Crop frame for the state the geometry was computed with.
    pub frame: FrameRect,
}

impl ViewportGeometry {
    /// Compute the geometry of a `width x height` working image shown in a
    /// `display_width x display_height` area.
    ///
    /// Display dimensions below one pixel are treated as one pixel.
    pub fn compute(
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
        display_width: u32,
        display_height: u32,
        crop: &CropState,
    ) -> Self {
        let display_width = display_width.max(1);
        let display_height = display_height.max(1);

        let frame_scale = (width as f64 / display_width as f64)
            .max(height as f64 / display_height as f64)
            .max(1.0);

        let scaled_width = scale_down(width, frame_scale);
        let scaled_height = scale_down(height, frame_scale);
        let scaled_target_width = scale_down(target_width, frame_scale);
        let scaled_target_height = scale_down(target_height, frame_scale);

        let mut geometry = Self {
            frame_scale,
            scaled_width,
            scaled_height,
            scaled_target_width,
            scaled_target_height,
            max_rect_x: scaled_width.saturating_sub(scaled_target_width),
            max_rect_y: scaled_height.saturating_sub(scaled_target_height),
            origin_x: center_offset(display_width, scaled_width),
            origin_y: center_offset(display_height, scaled_height),
            frame: FrameRect::default(),
        };
        geometry.frame = geometry.frame_for(crop);
        geometry
    }

    /// Crop frame rectangle for `crop` under this geometry.
    pub fn frame_for(&self, crop: &CropState) -> FrameRect {
        FrameRect {
            x: self.origin_x + self.offset_x(crop),
            y: self.origin_y + self.offset_y(crop),
            width: self.scaled_target_width,
            height: self.scaled_target_height,
        }
    }

    /// Same geometry with the frame moved to `crop`.
    pub fn with_crop(mut self, crop: &CropState) -> Self {
        self.frame = self.frame_for(crop);
        self
    }

    /// Display-space x offset of the frame relative to the bitmap origin.
    pub fn offset_x(&self, crop: &CropState) -> u32 {
        to_offset(crop.x_ratio, self.scaled_width)
    }

    /// Display-space y offset of the frame relative to the bitmap origin.
    pub fn offset_y(&self, crop: &CropState) -> u32 {
        to_offset(crop.y_ratio, self.scaled_height)
    }
}

#[inline]
fn scale_down(dim: u32, frame_scale: f64) -> u32 {
    if frame_scale == 1.0 {
        dim
    } else {
        (dim as f64 / frame_scale) as u32
    }
}

#[inline]
fn center_offset(display: u32, content: u32) -> u32 {
    (display as i64 / 2 - content as i64 / 2).max(0) as u32
}

#[inline]
fn to_offset(ratio: f64, scaled: u32) -> u32 {
    (ratio * scaled as f64).max(0.0) as u32
}

/// Memoized display state for one working image.
///
/// Holds the last geometry and, when the image is shrunk, the resampled
/// display bitmap. At `frame_scale == 1.0` the working image itself is the
/// display bitmap and no copy is kept.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    geometry: Option<ViewportGeometry>,
    display: Option<DecodedImage>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last computed geometry, if the viewport has been laid out.
    pub fn geometry(&self) -> Option<&ViewportGeometry> {
        self.geometry.as_ref()
    }

    /// Recompute geometry for a display area, resampling only when the frame
    /// scale changed.
    pub fn update(
        &mut self,
        working: &DecodedImage,
        target_width: u32,
        target_height: u32,
        display_width: u32,
        display_height: u32,
        crop: &CropState,
    ) -> ViewportGeometry {
        let geometry = ViewportGeometry::compute(
            working.width,
            working.height,
            target_width,
            target_height,
            display_width,
            display_height,
            crop,
        );

        let scale_changed = self
            .geometry
            .map_or(true, |previous| previous.frame_scale != geometry.frame_scale);

        if scale_changed {
            tracing::debug!(
                frame_scale = geometry.frame_scale,
                "rescaling display bitmap to {}x{}",
                geometry.scaled_width,
                geometry.scaled_height
            );
            self.display = render_display(working, &geometry);
        }

        self.geometry = Some(geometry);
        geometry
    }

    /// Move the cached frame to `crop` without touching the display bitmap.
    pub fn refresh_frame(&mut self, crop: &CropState) -> Option<ViewportGeometry> {
        let geometry = self.geometry?.with_crop(crop);
        self.geometry = Some(geometry);
        Some(geometry)
    }

    /// The bitmap to draw at the geometry origin.
    pub fn display_image<'a>(&'a self, working: &'a DecodedImage) -> &'a DecodedImage {
        self.display.as_ref().unwrap_or(working)
    }

    /// Whether a separate downscaled copy is held.
    pub fn has_scaled_copy(&self) -> bool {
        self.display.is_some()
    }
}

fn render_display(working: &DecodedImage, geometry: &ViewportGeometry) -> Option<DecodedImage> {
    if geometry.frame_scale == 1.0 {
        return None;
    }
    if geometry.scaled_width == 0 || geometry.scaled_height == 0 {
        return Some(DecodedImage::new(0, 0, Vec::new()));
    }

    match resize(
        working,
        geometry.scaled_width,
        geometry.scaled_height,
        FilterType::Bilinear,
    ) {
        Ok(display) => Some(display),
        Err(err) => {
            tracing::warn!("Display resample failed, drawing full size: {err}");
            None
        }
    }
}
