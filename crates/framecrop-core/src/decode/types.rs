//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
///
/// A decode error is fatal for the file being loaded: no session is created.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The image decoded to zero pixels in at least one dimension.
    #[error("Decoded image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Recoverable problems while reading image metadata.
///
/// None of these stop a load: orientation falls back to
/// [`ExifOrientation::Normal`] and the condition is kept for the host to inspect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The container has no EXIF block, or it could not be parsed.
    #[error("No readable EXIF data: {0}")]
    NoExif(String),

    /// EXIF is present but carries no orientation tag.
    #[error("EXIF data has no orientation tag")]
    MissingOrientation,

    /// The orientation tag holds a value outside 1..=8.
    #[error("Invalid EXIF orientation value: {0}")]
    InvalidOrientation(u32),
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Bicubic (Catmull-Rom) interpolation.
    #[default]
    Bicubic,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Bicubic => image::imageops::FilterType::CatmullRom,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExifOrientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (rotate 90 CCW, then flip horizontal).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (rotate 90 CW, then flip horizontal).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl ExifOrientation {
    /// All eight orientations in EXIF code order.
    pub const ALL: [ExifOrientation; 8] = [
        ExifOrientation::Normal,
        ExifOrientation::FlipHorizontal,
        ExifOrientation::Rotate180,
        ExifOrientation::FlipVertical,
        ExifOrientation::Transpose,
        ExifOrientation::Rotate90CW,
        ExifOrientation::Transverse,
        ExifOrientation::Rotate270CW,
    ];

    /// Parse an EXIF code, rejecting values outside 1..=8.
    pub fn from_code(code: u32) -> Result<Self, MetadataError> {
        match code {
            1 => Ok(ExifOrientation::Normal),
            2 => Ok(ExifOrientation::FlipHorizontal),
            3 => Ok(ExifOrientation::Rotate180),
            4 => Ok(ExifOrientation::FlipVertical),
            5 => Ok(ExifOrientation::Transpose),
            6 => Ok(ExifOrientation::Rotate90CW),
            7 => Ok(ExifOrientation::Transverse),
            8 => Ok(ExifOrientation::Rotate270CW),
            other => Err(MetadataError::InvalidOrientation(other)),
        }
    }

    /// The EXIF code of this orientation.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The orientation that undoes this one.
    ///
    /// Only the two pure quarter turns are not their own inverse.
    pub fn inverse(self) -> Self {
        match self {
            ExifOrientation::Rotate90CW => ExifOrientation::Rotate270CW,
            ExifOrientation::Rotate270CW => ExifOrientation::Rotate90CW,
            other => other,
        }
    }

    /// Returns true if this orientation swaps width and height dimensions.
    ///
    /// Rotations of 90° and 270° (and their flip variants Transpose/Transverse)
    /// swap the image dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            ExifOrientation::Transpose
                | ExifOrientation::Rotate90CW
                | ExifOrientation::Transverse
                | ExifOrientation::Rotate270CW
        )
    }
}

impl From<u32> for ExifOrientation {
    fn from(value: u32) -> Self {
        ExifOrientation::from_code(value).unwrap_or_default()
    }
}

/// Orientation and raw dimensions of a source image.
///
/// `width` and `height` are the decoded dimensions *before* orientation
/// correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageInfo {
    pub orientation: ExifOrientation,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(orientation: ExifOrientation, width: u32, height: u32) -> Self {
        Self {
            orientation,
            width,
            height,
        }
    }

    /// Get the effective dimensions after orientation correction.
    pub fn oriented_dimensions(&self) -> (u32, u32) {
        if self.orientation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an image of the given size filled with one color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Read the pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
