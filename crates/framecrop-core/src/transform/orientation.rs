//! EXIF orientation resolution.
//!
//! Each of the eight EXIF orientation codes maps to an element of the dihedral
//! group of the rectangle. The correction is expressed as an [`AffineTransform`]
//! built from translate/rotate/scale steps so that the corrected image keeps its
//! top-left origin: every source pixel lands in non-negative coordinates.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downwards
//! - Positive angles rotate clockwise on screen
//! - Pixel `(x, y)` covers the unit square starting at `(x, y)`

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::decode::{ExifOrientation, ImageInfo};

/// A 2D affine transform `p' = M * p + t`.
///
/// Builder methods post-concatenate: in
/// `AffineTransform::identity().translate(w, 0.0).rotate(a)` the rotation is
/// applied to a point first, then the translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    /// The identity transform.
    pub const fn identity() -> Self {
        Self {
            m00: 1.0,
            m01: 0.0,
            m02: 0.0,
            m10: 0.0,
            m11: 1.0,
            m12: 0.0,
        }
    }

    /// Return `self ∘ other`: `other` is applied to a point first.
    pub fn concat(self, other: AffineTransform) -> Self {
        Self {
            m00: self.m00 * other.m00 + self.m01 * other.m10,
            m01: self.m00 * other.m01 + self.m01 * other.m11,
            m02: self.m00 * other.m02 + self.m01 * other.m12 + self.m02,
            m10: self.m10 * other.m00 + self.m11 * other.m10,
            m11: self.m10 * other.m01 + self.m11 * other.m11,
            m12: self.m10 * other.m02 + self.m11 * other.m12 + self.m12,
        }
    }

    /// Apply `self` first, then `next`.
    pub fn then(self, next: AffineTransform) -> Self {
        next.concat(self)
    }

    /// Append a translation.
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        self.concat(Self {
            m02: tx,
            m12: ty,
            ..Self::identity()
        })
    }

    /// Append a rotation by `theta` radians.
    ///
    /// Multiples of a quarter turn produce exact 0/±1 entries.
    pub fn rotate(self, theta: f64) -> Self {
        let cos = snap(theta.cos());
        let sin = snap(theta.sin());
        self.concat(Self {
            m00: cos,
            m01: -sin,
            m02: 0.0,
            m10: sin,
            m11: cos,
            m12: 0.0,
        })
    }

    /// Append a scale.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.concat(Self {
            m00: sx,
            m11: sy,
            ..Self::identity()
        })
    }

    /// Map a point through the transform.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m00 * x + self.m01 * y + self.m02,
            self.m10 * x + self.m11 * y + self.m12,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    /// The inverse transform, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }

        let m00 = self.m11 / det;
        let m01 = -self.m01 / det;
        let m10 = -self.m10 / det;
        let m11 = self.m00 / det;
        Some(Self {
            m00,
            m01,
            m02: -(m00 * self.m02 + m01 * self.m12),
            m10,
            m11,
            m12: -(m10 * self.m02 + m11 * self.m12),
        })
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &AffineTransform, eps: f64) -> bool {
        (self.m00 - other.m00).abs() <= eps
            && (self.m01 - other.m01).abs() <= eps
            && (self.m02 - other.m02).abs() <= eps
            && (self.m10 - other.m10).abs() <= eps
            && (self.m11 - other.m11).abs() <= eps
            && (self.m12 - other.m12).abs() <= eps
    }

    pub fn is_identity(&self) -> bool {
        self.approx_eq(&Self::identity(), 1e-12)
    }

    /// True when the transform only permutes/flips axes and shifts by whole
    /// pixels, so it can be applied by copying pixels.
    pub fn is_pixel_exact(&self) -> bool {
        let unit = |v: f64| v == 0.0 || v == 1.0 || v == -1.0;
        unit(self.m00)
            && unit(self.m01)
            && unit(self.m10)
            && unit(self.m11)
            && self.m02.fract() == 0.0
            && self.m12.fract() == 0.0
            && self.determinant().abs() == 1.0
    }
}

fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-12 {
        r
    } else {
        v
    }
}

/// The resolved correction for one source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationTransform {
    /// Orientation the transform corrects.
    pub orientation: ExifOrientation,
    /// Maps raw pixel coordinates to upright coordinates.
    pub transform: AffineTransform,
    /// Whether width and height trade places.
    pub swaps_dimensions: bool,
    /// Corrected (upright) width.
    pub width: u32,
    /// Corrected (upright) height.
    pub height: u32,
}

/// Resolve the upright transform for an image.
///
/// `info.width`/`info.height` are the raw decoded dimensions.
pub fn resolve_orientation(info: &ImageInfo) -> OrientationTransform {
    let w = info.width as f64;
    let h = info.height as f64;
    let t = AffineTransform::identity();

    let transform = match info.orientation {
        ExifOrientation::Normal => t,
        ExifOrientation::FlipHorizontal => t.scale(-1.0, 1.0).translate(-w, 0.0),
        ExifOrientation::Rotate180 => t.translate(w, h).rotate(PI),
        ExifOrientation::FlipVertical => t.scale(1.0, -1.0).translate(0.0, -h),
        ExifOrientation::Transpose => t.rotate(-FRAC_PI_2).scale(-1.0, 1.0),
        ExifOrientation::Rotate90CW => t.translate(h, 0.0).rotate(FRAC_PI_2),
        ExifOrientation::Transverse => t
            .scale(-1.0, 1.0)
            .translate(-h, 0.0)
            .translate(0.0, w)
            .rotate(3.0 * FRAC_PI_2),
        ExifOrientation::Rotate270CW => t.translate(0.0, w).rotate(3.0 * FRAC_PI_2),
    };

    let swaps_dimensions = info.orientation.swaps_dimensions();
    let (width, height) = info.oriented_dimensions();

    OrientationTransform {
        orientation: info.orientation,
        transform,
        swaps_dimensions,
        width,
        height,
    }
}
