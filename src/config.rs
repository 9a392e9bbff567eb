//! Bridge configuration.
//!
//! Defaults reproduce the unconfigured device node: camera 1, one-shot
//! brightness target 90, ten frames per second, published as `image_raw`.
//! A TOML file can override any section.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::acquisition::LoopSettings;

/// Camera selection and adjustment targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// 1-based vendor index of the camera to open.
    pub device_index: u32,
    /// Brightness target for the one-shot exposure and gain adjustments.
    pub brightness_target: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 1,
            brightness_target: 90,
        }
    }
}

impl CameraConfig {
    /// Validates the camera parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_index == 0 {
            return Err(ConfigError::InvalidDeviceIndex);
        }
        Ok(())
    }
}

/// Acquisition pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Capture cadence in frames per second.
    pub rate_hz: u32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self { rate_hz: 10 }
    }
}

impl AcquisitionConfig {
    /// Validates the pacing parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_hz == 0 || self.rate_hz > 120 {
            return Err(ConfigError::InvalidRate);
        }
        Ok(())
    }
}

/// Publication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Topic images are announced under.
    pub topic: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            topic: "image_raw".to_string(),
        }
    }
}

/// Run duration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Run until interrupted (true) or stop after `frame_count` frames.
    pub continuous: bool,
    /// Number of frames to publish when not continuous.
    pub frame_count: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            frame_count: 100,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("device index must be at least 1")]
    InvalidDeviceIndex,
    #[error("invalid capture rate (must be 1-120 hz)")]
    InvalidRate,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub run: RunConfig,
}

impl BridgeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: BridgeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.camera.validate()?;
        config.acquisition.validate()?;
        Ok(config)
    }

    /// Maps the file settings onto acquisition loop settings.
    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            device_index: self.camera.device_index,
            brightness_target: self.camera.brightness_target,
            rate_hz: self.acquisition.rate_hz,
            max_frames: if self.run.continuous {
                None
            } else {
                Some(self.run.frame_count)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = BridgeConfig::default();
        assert!(config.camera.validate().is_ok());
        assert!(config.acquisition.validate().is_ok());

        let settings = config.loop_settings();
        assert_eq!(settings.device_index, 1);
        assert_eq!(settings.brightness_target, 90);
        assert_eq!(settings.rate_hz, 10);
        assert_eq!(settings.max_frames, None);
        assert_eq!(config.publish.topic, "image_raw");
    }

    #[test]
    fn test_zero_device_index_invalid() {
        let mut config = CameraConfig::default();
        config.device_index = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDeviceIndex)
        ));
    }

    #[test]
    fn test_zero_rate_invalid() {
        let mut config = AcquisitionConfig::default();
        config.rate_hz = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRate)));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [camera]
            device_index = 2
            brightness_target = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.device_index, 2);
        assert_eq!(config.camera.brightness_target, 120);
        assert_eq!(config.acquisition.rate_hz, 10);
        assert_eq!(config.publish.topic, "image_raw");
        assert!(config.run.continuous);
    }

    #[test]
    fn test_bounded_run_maps_to_frame_budget() {
        let mut config = BridgeConfig::default();
        config.run.continuous = false;
        config.run.frame_count = 25;

        assert_eq!(config.loop_settings().max_frames, Some(25));
    }
}
