//! JPEG decoding and EXIF orientation reading.
//!
//! Decoding and orientation are kept apart: the decoder returns the pixels as
//! stored in the file, and the orientation is applied later by
//! [`crate::transform::normalize`].

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;

use super::{DecodeError, DecodedImage, ExifOrientation, ImageInfo, MetadataError};

/// Decode an image from bytes without applying EXIF orientation.
///
/// Any format enabled on the `image` crate is accepted; JPEG is the expected
/// input.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the bytes cannot be decoded, and
/// `DecodeError::EmptyImage` if the result has a zero dimension.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let decoded = DecodedImage::from_rgb_image(img.into_rgb8());
    if decoded.is_empty() {
        return Err(DecodeError::EmptyImage {
            width: decoded.width,
            height: decoded.height,
        });
    }
    Ok(decoded)
}

/// Read the EXIF orientation tag from image bytes.
///
/// # Errors
///
/// Every error is recoverable; callers fall back to
/// [`ExifOrientation::Normal`].
pub fn read_orientation(bytes: &[u8]) -> Result<ExifOrientation, MetadataError> {
    let mut cursor = Cursor::new(bytes);
    let exif = Reader::new()
        .read_from_container(&mut cursor)
        .map_err(|e| MetadataError::NoExif(e.to_string()))?;

    let field = exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .ok_or(MetadataError::MissingOrientation)?;
    let value = field
        .value
        .get_uint(0)
        .ok_or(MetadataError::MissingOrientation)?;

    ExifOrientation::from_code(value)
}

/// Extract EXIF orientation, defaulting to `Normal` on any metadata problem.
pub fn get_orientation(bytes: &[u8]) -> ExifOrientation {
    read_orientation(bytes).unwrap_or_default()
}

/// Build the [`ImageInfo`] for a decoded image.
///
/// Always yields usable info. The second element carries the metadata problem
/// that forced the identity fallback, if any.
pub fn read_image_info(
    bytes: &[u8],
    decoded: &DecodedImage,
) -> (ImageInfo, Option<MetadataError>) {
    match read_orientation(bytes) {
        Ok(orientation) => (
            ImageInfo::new(orientation, decoded.width, decoded.height),
            None,
        ),
        Err(err) => {
            tracing::warn!("Could not get orientation, using identity: {err}");
            (
                ImageInfo::new(ExifOrientation::Normal, decoded.width, decoded.height),
                Some(err),
            )
        }
    }
}
