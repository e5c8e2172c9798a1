//! Geometric transforms that turn a decoded file into the working image.
//!
//! # Transform Order
//!
//! When a file is loaded, transforms are applied in this order:
//! 1. Orientation resolution (EXIF code to affine transform)
//! 2. Normalization (upright bitmap at full resolution)
//! 3. Fit scaling (working image sized to the crop target)
//!
//! # Coordinate System
//!
//! - Origin is top-left corner, y grows downwards
//! - Transforms map raw pixel coordinates to upright pixel coordinates

mod fit;
mod normalize;
mod orientation;

pub use fit::{compute_fit, fit_to_target, FitResult, Orientation};
pub use normalize::{apply_affine, normalize, BACKGROUND};
pub use orientation::{resolve_orientation, AffineTransform, OrientationTransform};
