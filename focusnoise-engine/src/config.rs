//! Engine configuration.
//!
//! The host application shipped two hard-coded generator variants (mono,
//! 10 s loop, `0.1` scale and stereo, 2 s loop, `0.11` scale). Both are just
//! values of [`EngineConfig`] here.

use serde::{Deserialize, Serialize};

use focusnoise_core::noise::{BufferSpec, NoiseType, DEFAULT_PINK_SCALE, DEFAULT_WHITE_SCALE};

use crate::error::ConfigError;

pub const MIN_BUFFER_SECONDS: u32 = 1;
pub const MAX_BUFFER_SECONDS: u32 = 60;
pub const MAX_CHANNELS: u16 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Loop length in whole seconds. Longer loops hide the repetition.
    pub buffer_seconds: u32,
    /// Channels per generated buffer; each gets independent noise.
    pub channels: u16,
    /// Attenuation applied to raw pink output before the gain stage.
    pub pink_scale: f32,
    /// Attenuation applied to white output before the gain stage.
    pub white_scale: f32,
    /// Time constant for gain changes while playing (0 = immediate).
    pub gain_smoothing_ms: f32,
    /// Output device to open; `None` picks the platform default.
    pub device_name: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_seconds: 2,
            channels: 2,
            pink_scale: DEFAULT_PINK_SCALE,
            white_scale: DEFAULT_WHITE_SCALE,
            gain_smoothing_ms: 20.0,
            device_name: None,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON (missing fields take their defaults) and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BUFFER_SECONDS..=MAX_BUFFER_SECONDS).contains(&self.buffer_seconds) {
            return Err(ConfigError::BufferSeconds(self.buffer_seconds));
        }
        if !(1..=MAX_CHANNELS).contains(&self.channels) {
            return Err(ConfigError::Channels(self.channels));
        }
        for (field, value) in [("pink_scale", self.pink_scale), ("white_scale", self.white_scale)] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ConfigError::Scale { field, value });
            }
        }
        if !self.gain_smoothing_ms.is_finite() || self.gain_smoothing_ms < 0.0 {
            return Err(ConfigError::GainSmoothing(self.gain_smoothing_ms));
        }
        Ok(())
    }

    /// Generation parameters for `noise_type` at the device's `sample_rate`.
    pub fn buffer_spec(&self, noise_type: NoiseType, sample_rate: u32) -> BufferSpec {
        BufferSpec {
            noise_type,
            sample_rate,
            seconds: self.buffer_seconds,
            channels: self.channels,
            pink_scale: self.pink_scale,
            white_scale: self.white_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.channels, 2);
        assert_eq!(cfg.pink_scale, 0.11);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            EngineConfig { buffer_seconds: 0, ..Default::default() },
            EngineConfig { buffer_seconds: 61, ..Default::default() },
            EngineConfig { channels: 0, ..Default::default() },
            EngineConfig { channels: 9, ..Default::default() },
            EngineConfig { pink_scale: 0.0, ..Default::default() },
            EngineConfig { white_scale: f32::NAN, ..Default::default() },
            EngineConfig { white_scale: 1.5, ..Default::default() },
            EngineConfig { gain_smoothing_ms: -1.0, ..Default::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?}");
        }
    }

    #[test]
    fn parses_partial_json() {
        let cfg = EngineConfig::from_json(r#"{ "buffer_seconds": 10, "channels": 1 }"#).unwrap();
        assert_eq!(cfg.buffer_seconds, 10);
        assert_eq!(cfg.channels, 1);
        assert_eq!(cfg.gain_smoothing_ms, 20.0);
        assert_eq!(cfg.device_name, None);
    }

    #[test]
    fn json_is_validated() {
        let err = EngineConfig::from_json(r#"{ "buffer_seconds": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::BufferSeconds(0)));
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn buffer_spec_carries_config() {
        let cfg = EngineConfig { buffer_seconds: 3, channels: 1, ..Default::default() };
        let spec = cfg.buffer_spec(NoiseType::Pink, 44_100);
        assert_eq!(spec.frames(), 132_300);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.noise_type, NoiseType::Pink);
    }
}
