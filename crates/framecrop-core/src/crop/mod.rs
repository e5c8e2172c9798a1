//! Crop rectangle state, drag handling and extraction.
//!
//! # Coordinate System
//!
//! - Crop position is stored as ratios (0.0 to 1.0) of the working image
//! - The crop size is always the fixed target size in working pixels
//! - Origin is top-left corner

mod controller;
mod extract;
mod state;

pub use controller::{CropController, GestureState};
pub use extract::{extract_crop, ExtractError};
pub use state::{CropLimits, CropState};
