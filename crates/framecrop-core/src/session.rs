//! One loaded file and everything needed to position and save its crop.
//!
//! A [`Session`] owns the working image, the crop state and the display cache.
//! The host feeds it layout and pointer events and asks it for the crop when
//! the user saves.

use thiserror::Error;

use crate::config::{ConfigError, CropConfig};
use crate::crop::{extract_crop, CropController, CropLimits, CropState, ExtractError};
use crate::decode::{
    decode_image, read_image_info, DecodeError, DecodedImage, ImageInfo, MetadataError,
};
use crate::encode::{encode_image, EncodeError};
use crate::transform::{fit_to_target, normalize, resolve_orientation, FitResult, Orientation};
use crate::viewport::{Viewport, ViewportGeometry};

/// Errors that prevent a session from being created.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid crop configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from saving the current crop.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Decode `bytes` and build a session for a `target_width x target_height` crop.
pub fn load_image(bytes: &[u8], target_width: u32, target_height: u32) -> Result<Session, LoadError> {
    load_image_with_config(bytes, &CropConfig::with_target(target_width, target_height))
}

/// Decode `bytes` and build a session using `config`.
///
/// A missing or invalid EXIF orientation does not fail the load; it is
/// available afterwards through [`Session::metadata_warning`].
pub fn load_image_with_config(bytes: &[u8], config: &CropConfig) -> Result<Session, LoadError> {
    config.validate()?;

    let decoded = decode_image(bytes)?;
    let (info, warning) = read_image_info(bytes, &decoded);

    let mut session = Session::from_decoded(decoded, info, config)?;
    session.metadata_warning = warning;
    Ok(session)
}

/// The live state for the currently displayed file.
#[derive(Debug, Clone)]
pub struct Session {
    info: ImageInfo,
    working: DecodedImage,
    fit: FitResult,
    target_width: u32,
    target_height: u32,
    jpeg_quality: u8,
    crop: CropState,
    limits: CropLimits,
    controller: CropController,
    viewport: Viewport,
    metadata_warning: Option<MetadataError>,
}

impl Session {
    /// Build a session from already-decoded raw pixels.
    ///
    /// `info` carries the orientation to correct; its dimensions must match
    /// `decoded`.
    pub fn from_decoded(
        decoded: DecodedImage,
        info: ImageInfo,
        config: &CropConfig,
    ) -> Result<Self, LoadError> {
        config.validate()?;
        if decoded.is_empty() {
            return Err(DecodeError::EmptyImage {
                width: decoded.width,
                height: decoded.height,
            }
            .into());
        }

        let orientation = resolve_orientation(&info);
        let upright = normalize(decoded, &orientation);
        let (working, fit) = fit_to_target(
            &upright,
            config.target_width,
            config.target_height,
            config.working_filter,
        )?;

        let crop = CropState::centered(
            working.width,
            working.height,
            config.target_width,
            config.target_height,
        );
        let limits = CropLimits::new(
            working.width,
            working.height,
            config.target_width,
            config.target_height,
        );

        tracing::info!(
            exif = info.orientation.code(),
            orientation = ?fit.orientation,
            "loaded {}x{} image, working size {}x{}",
            info.width,
            info.height,
            working.width,
            working.height
        );

        Ok(Self {
            info,
            working,
            fit,
            target_width: config.target_width,
            target_height: config.target_height,
            jpeg_quality: config.jpeg_quality,
            crop,
            limits,
            controller: CropController::new(fit.orientation),
            viewport: Viewport::new(),
            metadata_warning: None,
        })
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    /// The upright, fit-scaled image the crop is taken from.
    pub fn working_image(&self) -> &DecodedImage {
        &self.working
    }

    pub fn fit(&self) -> &FitResult {
        &self.fit
    }

    pub fn orientation(&self) -> Orientation {
        self.fit.orientation
    }

    pub fn target_size(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    pub fn crop(&self) -> &CropState {
        &self.crop
    }

    pub fn limits(&self) -> &CropLimits {
        &self.limits
    }

    pub fn controller(&self) -> &CropController {
        &self.controller
    }

    /// Metadata problem that forced identity orientation, if any.
    pub fn metadata_warning(&self) -> Option<&MetadataError> {
        self.metadata_warning.as_ref()
    }

    /// Last computed geometry, `None` before the first resize notification.
    pub fn geometry(&self) -> Option<&ViewportGeometry> {
        self.viewport.geometry()
    }

    /// The bitmap to draw at the geometry origin.
    pub fn display_image(&self) -> &DecodedImage {
        self.viewport.display_image(&self.working)
    }

    /// Lay out the image for a display area of `display_width x display_height`.
    ///
    /// Call on first paint and whenever the area changes size.
    pub fn on_viewport_resize(
        &mut self,
        display_width: u32,
        display_height: u32,
    ) -> ViewportGeometry {
        self.viewport.update(
            &self.working,
            self.target_width,
            self.target_height,
            display_width,
            display_height,
            &self.crop,
        )
    }

    /// Pointer pressed at display coordinates `(x, y)`.
    ///
    /// Ignored before the first layout.
    pub fn on_press_at(&mut self, x: i32, y: i32) {
        if let Some(geometry) = self.viewport.geometry() {
            self.controller.press(&self.crop, geometry, x, y);
        }
    }

    /// Pointer dragged to display coordinates `(x, y)`.
    ///
    /// Returns the geometry with the frame at its new position, or `None`
    /// before the first layout.
    pub fn on_drag_to(&mut self, x: i32, y: i32) -> Option<ViewportGeometry> {
        let geometry = *self.viewport.geometry()?;
        if self
            .controller
            .drag_to(&mut self.crop, &geometry, &self.limits, x, y)
        {
            return self.viewport.refresh_frame(&self.crop);
        }
        Some(geometry)
    }

    /// Pointer released.
    pub fn on_release(&mut self) {
        self.controller.release();
    }

    /// The `target_width x target_height` crop from the working image.
    pub fn extract_crop(&self) -> Result<DecodedImage, ExtractError> {
        extract_crop(&self.working, &self.crop, self.target_width, self.target_height)
    }

    /// The crop encoded as JPEG with the configured quality.
    pub fn export_jpeg(&self) -> Result<Vec<u8>, ExportError> {
        self.export_jpeg_with_quality(self.jpeg_quality)
    }

    /// The crop encoded as JPEG at `quality`.
    pub fn export_jpeg_with_quality(&self, quality: u8) -> Result<Vec<u8>, ExportError> {
        let cropped = self.extract_crop()?;
        Ok(encode_image(&cropped, quality)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ExifOrientation;
    use crate::test_fixtures::{encoded_jpeg, jpeg_with_orientation};

    fn session(width: u32, height: u32, target: (u32, u32)) -> Session {
        let decoded = DecodedImage::filled(width, height, [100, 150, 200]);
        let info = ImageInfo::new(ExifOrientation::Normal, width, height);
        Session::from_decoded(decoded, info, &CropConfig::with_target(target.0, target.1))
            .unwrap()
    }

    #[test]
    fn test_landscape_photo_example() {
        let s = session(1600, 1200, (800, 480));

        assert_eq!(s.orientation(), Orientation::Portrait);
        assert_eq!(
            (s.working_image().width, s.working_image().height),
            (800, 600)
        );
        assert_eq!(s.crop().x_ratio, 0.0);
        assert!((s.crop().y_ratio - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_source_swaps_before_fit() {
        // Stored 1200x1600 but tagged as rotated: upright it is 1600x1200.
        let decoded = DecodedImage::filled(1200, 1600, [0, 0, 0]);
        let info = ImageInfo::new(ExifOrientation::Rotate90CW, 1200, 1600);
        let s = Session::from_decoded(decoded, info, &CropConfig::default()).unwrap();

        assert_eq!(s.orientation(), Orientation::Portrait);
        assert_eq!(
            (s.working_image().width, s.working_image().height),
            (800, 600)
        );
    }

    #[test]
    fn test_zero_target_rejected() {
        let decoded = DecodedImage::filled(10, 10, [0, 0, 0]);
        let info = ImageInfo::new(ExifOrientation::Normal, 10, 10);
        let err = Session::from_decoded(decoded, info, &CropConfig::with_target(0, 5)).unwrap_err();
        assert!(matches!(err, LoadError::Config(ConfigError::ZeroTarget { .. })));
    }

    #[test]
    fn test_drag_before_layout_is_ignored() {
        let mut s = session(256, 96, (80, 48));
        let before = *s.crop();

        s.on_press_at(10, 10);
        assert!(s.on_drag_to(60, 10).is_none());
        assert!(!s.controller().is_dragging());
        assert_eq!(*s.crop(), before);
    }

    #[test]
    fn test_drag_updates_frame() {
        // 256x96 fit to 80x48 -> 128x48 working image, height tight.
        let mut s = session(256, 96, (80, 48));
        assert_eq!(s.orientation(), Orientation::Landscape);
        assert_eq!(s.working_image().width, 128);

        let g = s.on_viewport_resize(400, 400);
        assert_eq!(g.frame_scale, 1.0);
        assert_eq!(g.origin_x, 136);
        assert_eq!(g.frame.x, g.origin_x + 24);

        s.on_press_at(100, 100);
        let moved = s.on_drag_to(90, 300).unwrap();
        assert_eq!(moved.frame.x, g.origin_x + 14);
        assert_eq!(s.crop().x_ratio, 14.0 / 128.0);
        assert_eq!(moved.frame.y, g.frame.y);

        s.on_release();
        let after = s.on_drag_to(0, 0).unwrap();
        assert_eq!(after.frame, moved.frame);
    }

    #[test]
    fn test_display_scale_does_not_change_extraction() {
        let mut s = session(256, 96, (80, 48));
        let full = s.extract_crop().unwrap();

        s.on_viewport_resize(40, 40);
        assert!(s.geometry().unwrap().frame_scale > 1.0);
        assert_eq!(s.display_image().width, s.geometry().unwrap().scaled_width);

        let after = s.extract_crop().unwrap();
        assert_eq!(full, after);
        assert_eq!((after.width, after.height), (80, 48));
    }

    #[test]
    fn test_load_image_from_jpeg_bytes() {
        let bytes = encoded_jpeg(160, 120);
        let s = load_image(&bytes, 80, 48).unwrap();

        assert_eq!(s.orientation(), Orientation::Portrait);
        assert_eq!(s.info().orientation, ExifOrientation::Normal);
        assert!(s.metadata_warning().is_some());
        assert_eq!(
            (s.working_image().width, s.working_image().height),
            (80, 60)
        );
    }

    #[test]
    fn test_load_image_applies_exif_orientation() {
        let bytes = jpeg_with_orientation(&encoded_jpeg(120, 160), 6);
        let s = load_image(&bytes, 80, 48).unwrap();

        assert_eq!(s.info().orientation, ExifOrientation::Rotate90CW);
        assert!(s.metadata_warning().is_none());
        // Upright 160x120, same as the unrotated landscape case.
        assert_eq!(
            (s.working_image().width, s.working_image().height),
            (80, 60)
        );
    }

    #[test]
    fn test_load_image_decode_error() {
        let err = load_image(&[1, 2, 3], 80, 48).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn test_export_jpeg() {
        let s = session(200, 100, (80, 48));
        let bytes = s.export_jpeg().unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (80, 48));
    }
}
