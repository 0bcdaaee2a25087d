//! Error types for the playback engine.
//!
//! Runtime failures ([`AudioError`]) are limited to the output device; every
//! generation or buffer-math problem is ruled out up front by
//! [`ConfigError`] at construction time.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Errors surfaced by `NoiseEngine::start`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Permission denied, no hardware, or the platform refused to open a stream.
    #[error("Audio output device unavailable: {reason}")]
    DeviceUnavailable { reason: String },

    /// The engine was torn down; build a new one.
    #[error("Noise engine has been torn down")]
    TornDown,
}

impl AudioError {
    pub fn device_unavailable(reason: impl Into<String>) -> Self {
        AudioError::DeviceUnavailable { reason: reason.into() }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            AudioError::DeviceUnavailable { .. } => "DEVICE_UNAVAILABLE",
            AudioError::TornDown => "TORN_DOWN",
        }
    }

    /// Whether a later `start` on the same engine may succeed.
    ///
    /// Only device failures qualify, and only after a fresh user gesture; the
    /// engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AudioError::DeviceUnavailable { .. })
    }
}

/// Invalid `EngineConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("buffer_seconds must be within 1..=60, got {0}")]
    BufferSeconds(u32),

    #[error("channels must be within 1..=8, got {0}")]
    Channels(u16),

    #[error("{field} must be finite and within (0, 1], got {value}")]
    Scale { field: &'static str, value: f32 },

    #[error("gain_smoothing_ms must be finite and non-negative, got {0}")]
    GainSmoothing(f32),

    #[error("Invalid engine config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
