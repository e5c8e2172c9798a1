//! Framecrop Core - fixed-size crop selection engine
//!
//! This crate turns a JPEG file into an upright working image sized to a crop
//! target, tracks where the user has dragged the crop frame, and extracts the
//! crop at exactly the target size.
//!
//! The flow for one file is:
//! 1. [`decode`] the bytes and read the EXIF orientation
//! 2. [`transform`] the raw pixels upright and fit them to the target
//! 3. lay out the working image in a display area ([`viewport`])
//! 4. move the crop frame with pointer events ([`crop`])
//! 5. extract and [`encode`] the crop
//!
//! [`Session`] ties these together; [`SessionSlot`] makes sure only the most
//! recent load becomes the live session.

pub mod config;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod session;
pub mod slot;
pub mod transform;
pub mod viewport;

pub use config::{is_jpeg_file_name, ConfigError, CropConfig};
pub use crop::{CropController, CropLimits, CropState, ExtractError, GestureState};
pub use decode::{DecodeError, DecodedImage, ExifOrientation, ImageInfo, MetadataError};
pub use session::{load_image, load_image_with_config, ExportError, LoadError, Session};
pub use slot::{LoadOutcome, LoadTicket, SessionSlot};
pub use transform::{FitResult, Orientation};
pub use viewport::{FrameRect, Viewport, ViewportGeometry};
