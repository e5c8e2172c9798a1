//! Fitting an upright image to the crop target.
//!
//! The image is scaled uniformly so that it covers the target box exactly on one
//! axis (the *tight* axis) and with slack on the other. The crop frame can then
//! only slide along the slack axis.

use serde::{Deserialize, Serialize};

use crate::decode::{resize, DecodeError, DecodedImage, FilterType};

/// Which axis of the working image has slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Width is tight; the crop frame moves vertically.
    Portrait,
    /// Height is tight; the crop frame moves horizontally.
    Landscape,
}

/// Result of fitting `(width, height)` to a target box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Factor the source is divided by (`> 1.0` shrinks).
    pub scale: f64,
    pub orientation: Orientation,
    /// Working image width.
    pub width: u32,
    /// Working image height.
    pub height: u32,
}

/// Compute the fit of a `width x height` image to `target_width x target_height`.
///
/// `scale = min(width / target_width, height / target_height)`. When both
/// ratios are equal (the aspect ratio matches the target exactly) the result
/// is [`Orientation::Portrait`].
///
/// The tight axis equals its target exactly; the slack axis is rounded and
/// never smaller than its target.
///
/// All four dimensions must be non-zero.
pub fn compute_fit(width: u32, height: u32, target_width: u32, target_height: u32) -> FitResult {
    let width_scale = width as f64 / target_width as f64;
    let height_scale = height as f64 / target_height as f64;

    if width_scale <= height_scale {
        let scaled_height = (height as f64 / width_scale).round() as u32;
        FitResult {
            scale: width_scale,
            orientation: Orientation::Portrait,
            width: target_width,
            height: scaled_height.max(target_height),
        }
    } else {
        let scaled_width = (width as f64 / height_scale).round() as u32;
        FitResult {
            scale: height_scale,
            orientation: Orientation::Landscape,
            width: scaled_width.max(target_width),
            height: target_height,
        }
    }
}

/// Resample an upright image into the working image for the target size.
///
/// # Errors
///
/// Propagates resize failures; with a well-formed image and non-zero target
/// this does not fail.
pub fn fit_to_target(
    image: &DecodedImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<(DecodedImage, FitResult), DecodeError> {
    let fit = compute_fit(image.width, image.height, target_width, target_height);
    tracing::debug!(
        scale = fit.scale,
        orientation = ?fit.orientation,
        "fit {}x{} to {}x{}",
        image.width,
        image.height,
        fit.width,
        fit.height
    );

    let working = resize(image, fit.width, fit.height, filter)?;
    Ok((working, fit))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: exactly the tight axis matches its target, the other has slack >= 0.
        #[test]
        fn prop_one_axis_tight(
            width in 1u32..=8000,
            height in 1u32..=8000,
            target_width in 1u32..=2000,
            target_height in 1u32..=2000,
        ) {
            let fit = compute_fit(width, height, target_width, target_height);

            prop_assert!(fit.width >= target_width);
            prop_assert!(fit.height >= target_height);
            match fit.orientation {
                Orientation::Portrait => prop_assert_eq!(fit.width, target_width),
                Orientation::Landscape => prop_assert_eq!(fit.height, target_height),
            }
        }

        /// Property: the slack axis is within one pixel of the exact scaled size.
        #[test]
        fn prop_slack_axis_preserves_aspect(
            width in 1u32..=8000,
            height in 1u32..=8000,
            target_width in 1u32..=2000,
            target_height in 1u32..=2000,
        ) {
            let fit = compute_fit(width, height, target_width, target_height);
            let exact_w = width as f64 / fit.scale;
            let exact_h = height as f64 / fit.scale;

            prop_assert!((fit.width as f64 - exact_w).abs() <= 1.0);
            prop_assert!((fit.height as f64 - exact_h).abs() <= 1.0);
        }
    }
}
