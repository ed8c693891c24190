//! TOML-based application configuration.
//!
//! Stores user preferences for the capture pipeline:
//! - Preferred camera facing and target stream resolution
//! - Optimizer bounds, quality, and preferred output format
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/snapstreak/config.toml`.

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::capture::{CaptureOptions, Facing, Resolution};
use crate::error::ConfigError;
use crate::photo::{OptimizeOptions, PhotoFormat};

/// Capture-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default)]
    pub facing: Facing,
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
}

/// Optimizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_frame_width")]
    pub max_width: u32,
    #[serde(default = "default_frame_height")]
    pub max_height: u32,
    #[serde(default = "default_quality")]
    pub quality: f32,
    #[serde(default = "default_format")]
    pub preferred_format: PhotoFormat,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/snapstreak/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_frame_width() -> u32 {
    1920
}
fn default_frame_height() -> u32 {
    1080
}
fn default_quality() -> f32 {
    0.8
}
fn default_format() -> PhotoFormat {
    PhotoFormat::WebP
}
fn default_true() -> bool {
    true
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            facing: Facing::default(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_width: default_frame_width(),
            max_height: default_frame_height(),
            quality: default_quality(),
            preferred_format: default_format(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load from `config.toml` in the data directory, falling back to
    /// defaults when the file does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = data_dir()
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?
            .join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save to `config.toml` in the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = data_dir()
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?
            .join("config.toml");
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Optimizer options derived from this configuration.
    pub fn optimize_options(&self) -> OptimizeOptions {
        OptimizeOptions {
            max_width: self.optimizer.max_width,
            max_height: self.optimizer.max_height,
            quality: self.optimizer.quality,
            preferred_format: self.optimizer.preferred_format,
        }
    }

    /// Capture session options derived from this configuration.
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            facing: self.capture.facing,
            resolution: Resolution {
                width: self.capture.frame_width,
                height: self.capture.frame_height,
            },
            optimize: self.optimize_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_capture_pipeline() {
        let config = Config::default();
        assert_eq!(config.capture.facing, Facing::Back);
        assert_eq!(config.optimizer.max_width, 1920);
        assert_eq!(config.optimizer.max_height, 1080);
        assert!((config.optimizer.quality - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.optimizer.preferred_format, PhotoFormat::WebP);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [capture]
            facing = "front"

            [notifications]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.capture.facing, Facing::Front);
        assert_eq!(config.capture.frame_width, 1920);
        assert!(!config.notifications.enabled);
        assert_eq!(config.optimizer.preferred_format, PhotoFormat::WebP);
    }

    #[test]
    fn toml_roundtrip_preserves_values() {
        let mut config = Config::default();
        config.optimizer.quality = 0.5;
        config.capture.facing = Facing::Front;

        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.capture.facing, Facing::Front);
        assert!((parsed.optimizer.quality - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn options_derive_from_config() {
        let mut config = Config::default();
        config.optimizer.max_width = 800;
        config.capture.frame_height = 720;

        let options = config.capture_options();
        assert_eq!(options.optimize.max_width, 800);
        assert_eq!(options.resolution.height, 720);
    }
}
