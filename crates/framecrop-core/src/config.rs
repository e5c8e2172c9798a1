//! Crop configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;

/// Default crop target width in pixels.
pub const DEFAULT_TARGET_WIDTH: u32 = 800;
/// Default crop target height in pixels.
pub const DEFAULT_TARGET_HEIGHT: u32 = 480;
/// Default JPEG quality for saved crops.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors from validating a [`CropConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Target size must be non-zero, got {width}x{height}")]
    ZeroTarget { width: u32, height: u32 },

    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),
}

/// Settings for one crop session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Output width of the crop.
    pub target_width: u32,
    /// Output height of the crop.
    pub target_height: u32,
    /// Quality used when saving the crop as JPEG.
    pub jpeg_quality: u8,
    /// Filter used to build the working image.
    pub working_filter: FilterType,
    /// Lowercase file extensions the host should list.
    pub extensions: Vec<String>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: DEFAULT_TARGET_HEIGHT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            working_filter: FilterType::Bicubic,
            extensions: vec!["jpg".to_string(), "jpeg".to_string()],
        }
    }
}

impl CropConfig {
    /// Default settings with a different target size.
    pub fn with_target(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(ConfigError::ZeroTarget {
                width: self.target_width,
                height: self.target_height,
            });
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }
        Ok(())
    }

    /// Whether a file name has one of the configured extensions (case-insensitive).
    pub fn accepts_file_name(&self, name: &str) -> bool {
        let Some((stem, extension)) = name.rsplit_once('.') else {
            return false;
        };
        !stem.is_empty()
            && self
                .extensions
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    }
}

/// Whether a file name looks like a JPEG (`.jpg` or `.jpeg`, any case).
///
/// Same filter as [`CropConfig::accepts_file_name`] with the default extensions.
pub fn is_jpeg_file_name(name: &str) -> bool {
    CropConfig::default().accepts_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CropConfig::default();
        assert_eq!((config.target_width, config.target_height), (800, 480));
        assert_eq!(config.jpeg_quality, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_target_rejected() {
        let config = CropConfig::with_target(0, 480);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroTarget {
                width: 0,
                height: 480
            })
        );
    }

    #[test]
    fn test_quality_rejected() {
        let mut config = CropConfig::default();
        config.jpeg_quality = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidQuality(0)));
    }

    #[test]
    fn test_accepts_file_name() {
        let config = CropConfig::default();
        assert!(config.accepts_file_name("holiday.jpg"));
        assert!(config.accepts_file_name("IMG_0001.JPEG"));
        assert!(!config.accepts_file_name("notes.txt"));
        assert!(!config.accepts_file_name("jpg"));
        assert!(!config.accepts_file_name(".jpg"));
    }

    #[test]
    fn test_is_jpeg_file_name() {
        assert!(is_jpeg_file_name("a.jpg"));
        assert!(is_jpeg_file_name("B.JpEg"));
        assert!(!is_jpeg_file_name("a.png"));
        assert!(!is_jpeg_file_name("archive.jpg.zip"));
        assert!(!is_jpeg_file_name(".jpg"));
    }

    #[test]
    fn test_extensions_drive_the_filter() {
        let mut config = CropConfig::default();
        for name in ["a.jpg", "B.JPEG", "a.png", "archive.jpg.zip", ".jpeg"] {
            assert_eq!(config.accepts_file_name(name), is_jpeg_file_name(name), "{name}");
        }

        config.extensions = vec!["png".to_string()];
        assert!(config.accepts_file_name("a.png"));
        assert!(!config.accepts_file_name("a.jpg"));
    }
}
