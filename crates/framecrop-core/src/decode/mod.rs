//! Image decoding for Framecrop.
//!
//! This module provides functionality for:
//! - Decoding JPEG (and other `image`-supported) files from bytes
//! - Reading the EXIF orientation tag
//! - Resampling images for the working and display copies
//!
//! # Architecture
//!
//! All operations are synchronous and single-threaded. Orientation is read
//! here but applied by [`crate::transform`], so a missing or broken EXIF block
//! never blocks decoding.
//!
//! # Examples
//!
//! ```ignore
//! use framecrop_core::decode::{decode_image, read_image_info};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let (info, _warning) = read_image_info(&bytes, &image);
//! println!("{}x{} orientation {:?}", info.width, info.height, info.orientation);
//! ```

mod jpeg;
mod resize;
mod types;

pub use jpeg::{decode_image, get_orientation, read_image_info, read_orientation};
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, ExifOrientation, FilterType, ImageInfo, MetadataError};
