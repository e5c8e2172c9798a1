//! Applying an orientation correction to decoded pixels.
//!
//! # Algorithm
//!
//! Inverse mapping: for each pixel of the output, the center of that pixel is
//! mapped back through the inverse transform into the source image and sampled
//! there.
//!
//! ```text
//! (src_x, src_y) = T⁻¹(dst_x + 0.5, dst_y + 0.5) - (0.5, 0.5)
//! ```
//!
//! Pixel-exact transforms (all EXIF orientations) copy pixels directly. Any
//! other transform is sampled with a bicubic (Catmull-Rom) kernel, and output
//! pixels whose source lies outside the image are filled with [`BACKGROUND`].

use crate::decode::DecodedImage;

use super::orientation::{AffineTransform, OrientationTransform};

/// Fill color for output pixels with no source content.
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Produce the upright bitmap for a resolved orientation.
///
/// The result has the corrected dimensions of `orientation`, not the raw
/// decoded dimensions. Identity transforms return `image` without copying.
pub fn normalize(image: DecodedImage, orientation: &OrientationTransform) -> DecodedImage {
    if orientation.transform.is_identity() {
        return image;
    }

    apply_affine(
        &image,
        &orientation.transform,
        orientation.width,
        orientation.height,
    )
}

/// Render `image` through `transform` onto a `width x height` canvas.
pub fn apply_affine(
    image: &DecodedImage,
    transform: &AffineTransform,
    width: u32,
    height: u32,
) -> DecodedImage {
    let mut output = DecodedImage::filled(width, height, BACKGROUND);

    let Some(inverse) = transform.inverse() else {
        tracing::warn!("Singular transform, leaving canvas blank");
        return output;
    };

    let exact = inverse.is_pixel_exact();

    for dst_y in 0..height {
        for dst_x in 0..width {
            let (sx, sy) = inverse.apply(dst_x as f64 + 0.5, dst_y as f64 + 0.5);

            let pixel = if exact {
                sample_nearest(image, sx.floor(), sy.floor())
            } else {
                sample_bicubic(image, sx - 0.5, sy - 0.5)
            };

            if let Some(pixel) = pixel {
                let dst_idx = (dst_y as usize * width as usize + dst_x as usize) * 3;
                output.pixels[dst_idx..dst_idx + 3].copy_from_slice(&pixel);
            }
        }
    }

    output
}

/// Read the pixel at integer coordinates, `None` outside the image.
#[inline]
fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> Option<[u8; 3]> {
    if x < 0.0 || y < 0.0 || x >= image.width as f64 || y >= image.height as f64 {
        return None;
    }
    Some(image.pixel(x as u32, y as u32))
}

/// Get a pixel as [f64; 3], clamping coordinates to the image edge.
#[inline]
fn get_pixel_clamped(image: &DecodedImage, px: i64, py: i64) -> [f64; 3] {
    let x = px.clamp(0, image.width as i64 - 1) as u32;
    let y = py.clamp(0, image.height as i64 - 1) as u32;
    let p = image.pixel(x, y);
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

/// Sample a pixel using bicubic interpolation over a 4x4 neighborhood.
///
/// `x`/`y` are in pixel-index space (pixel centers at integers). Returns `None`
/// when the point falls outside the area covered by the image.
fn sample_bicubic(image: &DecodedImage, x: f64, y: f64) -> Option<[u8; 3]> {
    let (w, h) = (image.width as f64, image.height as f64);
    if x < -0.5 || y < -0.5 || x >= w - 0.5 || y >= h - 0.5 {
        return None;
    }

    let x = snap_to_grid(x);
    let y = snap_to_grid(y);
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let mut sum = [0.0f64; 3];
    for ky in -1..=2 {
        let wy = catmull_rom_weight(fy - ky as f64);
        if wy == 0.0 {
            continue;
        }
        for kx in -1..=2 {
            let wx = catmull_rom_weight(fx - kx as f64);
            if wx == 0.0 {
                continue;
            }
            let p = get_pixel_clamped(image, x0 + kx, y0 + ky);
            let weight = wx * wy;
            sum[0] += p[0] * weight;
            sum[1] += p[1] * weight;
            sum[2] += p[2] * weight;
        }
    }

    Some(sum.map(|v| v.clamp(0.0, 255.0).round() as u8))
}

/// Catmull-Rom cubic kernel (a = -0.5).
fn catmull_rom_weight(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

fn snap_to_grid(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-9 {
        r
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{ExifOrientation, ImageInfo};
    use crate::transform::resolve_orientation;

    /// Image whose pixel values encode their own position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(x as u8);
                pixels.push(y as u8);
                pixels.push(7);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn oriented(image: &DecodedImage, orientation: ExifOrientation) -> DecodedImage {
        let info = ImageInfo::new(orientation, image.width, image.height);
        normalize(image.clone(), &resolve_orientation(&info))
    }

    #[test]
    fn test_identity_returns_input() {
        let img = test_image(5, 3);
        assert_eq!(oriented(&img, ExifOrientation::Normal), img);
    }

    #[test]
    fn test_rotate_90_cw_pixels() {
        let img = test_image(4, 2);
        let out = oriented(&img, ExifOrientation::Rotate90CW);

        assert_eq!((out.width, out.height), (2, 4));
        // Raw top-left becomes upright top-right.
        assert_eq!(out.pixel(1, 0), [0, 0, 7]);
        // Raw bottom-left becomes upright top-left.
        assert_eq!(out.pixel(0, 0), [0, 1, 7]);
        assert_eq!(out.pixel(0, 3), [3, 1, 7]);
    }

    #[test]
    fn test_rotate_270_cw_pixels() {
        let img = test_image(4, 2);
        let out = oriented(&img, ExifOrientation::Rotate270CW);

        assert_eq!((out.width, out.height), (2, 4));
        assert_eq!(out.pixel(0, 3), [0, 0, 7]);
        assert_eq!(out.pixel(0, 0), [3, 0, 7]);
    }

    #[test]
    fn test_rotate_180_pixels() {
        let img = test_image(3, 2);
        let out = oriented(&img, ExifOrientation::Rotate180);

        assert_eq!((out.width, out.height), (3, 2));
        assert_eq!(out.pixel(0, 0), [2, 1, 7]);
        assert_eq!(out.pixel(2, 1), [0, 0, 7]);
    }

    #[test]
    fn test_flips() {
        let img = test_image(3, 2);

        let h = oriented(&img, ExifOrientation::FlipHorizontal);
        assert_eq!(h.pixel(0, 0), [2, 0, 7]);

        let v = oriented(&img, ExifOrientation::FlipVertical);
        assert_eq!(v.pixel(0, 0), [0, 1, 7]);
    }

    #[test]
    fn test_transpose_and_transverse() {
        let img = test_image(4, 2);

        let t = oriented(&img, ExifOrientation::Transpose);
        assert_eq!((t.width, t.height), (2, 4));
        assert_eq!(t.pixel(1, 3), [3, 1, 7]);

        let tv = oriented(&img, ExifOrientation::Transverse);
        assert_eq!(tv.pixel(1, 3), [0, 0, 7]);
    }

    #[test]
    fn test_every_orientation_fills_all_pixels() {
        let img = DecodedImage::filled(5, 3, [10, 20, 30]);
        for orientation in ExifOrientation::ALL {
            let out = oriented(&img, orientation);
            assert_eq!(out.pixels.len(), 5 * 3 * 3);
            assert!(
                out.pixels.chunks(3).all(|p| p == [10, 20, 30]),
                "{orientation:?} left background pixels"
            );
        }
    }

    #[test]
    fn test_exposed_area_is_white() {
        let img = DecodedImage::filled(4, 4, [0, 0, 0]);
        let shifted = AffineTransform::identity().translate(2.5, 0.0);
        let out = apply_affine(&img, &shifted, 8, 4);

        assert_eq!(out.pixel(0, 0), BACKGROUND);
        assert_eq!(out.pixel(7, 3), BACKGROUND);
        assert_eq!(out.pixel(4, 1), [0, 0, 0]);
    }

    #[test]
    fn test_bicubic_on_grid_is_exact() {
        let img = test_image(6, 6);
        assert_eq!(sample_bicubic(&img, 3.0, 2.0), Some([3, 2, 7]));
        assert_eq!(sample_bicubic(&img, -0.6, 2.0), None);
    }

    #[test]
    fn test_catmull_rom_kernel() {
        assert_eq!(catmull_rom_weight(0.0), 1.0);
        assert_eq!(catmull_rom_weight(1.0), 0.0);
        assert_eq!(catmull_rom_weight(2.5), 0.0);
        let total: f64 = (-1..=2).map(|k| catmull_rom_weight(0.3 - k as f64)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_transform_leaves_background() {
        let img = test_image(3, 3);
        let flat = AffineTransform::identity().scale(0.0, 0.0);
        let out = apply_affine(&img, &flat, 3, 3);
        assert!(out.pixels.chunks(3).all(|p| p == BACKGROUND));
    }
}
