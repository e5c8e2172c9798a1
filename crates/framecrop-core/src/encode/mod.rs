//! Image encoding for saving crops.
//!
//! All operations are synchronous and single-threaded.

mod jpeg;

pub use jpeg::{encode_image, encode_jpeg, EncodeError};
