//! focusnoise engine: looping white/pink noise playback for focus sessions.
//!
//! Crate layout:
//! - [`engine`]      : `NoiseEngine`, the start/set_volume/stop/teardown lifecycle
//! - [`config`]      : validated `EngineConfig` (serde, JSON)
//! - [`error`]       : `AudioError` / `ConfigError`
//! - [`output`]      : `AudioOutput` trait, the engine's view of a device
//! - [`player`]      : `LoopPlayer`, render-side loop cursor and gain smoothing
//! - [`pull`]        : host-driven output for platforms that own the audio callback
//! - `cpal_output`   : CPAL device output (feature `realtime`)
//!
//! Volume never exceeds [`MAX_VOLUME`](focusnoise_core::gain::MAX_VOLUME);
//! over-range requests are clamped, not rejected.

pub mod config;
#[cfg(feature = "realtime")]
pub mod cpal_output;
pub mod engine;
pub mod error;
pub mod output;
pub mod player;
pub mod pull;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use config::EngineConfig;
#[cfg(feature = "realtime")]
pub use cpal_output::CpalOutput;
pub use engine::NoiseEngine;
pub use error::{AudioError, ConfigError, Result};
pub use focusnoise_core::gain::{Volume, MAX_VOLUME};
pub use focusnoise_core::noise::{NoiseBuffer, NoiseType};
pub use output::AudioOutput;
pub use pull::{PullHandle, PullOutput};

/// Engine playing through the default (or configured) CPAL device.
#[cfg(feature = "realtime")]
pub type CpalNoiseEngine = NoiseEngine<CpalOutput>;

/// Listening guidance for hosts to show before the first playback.
pub const SAFETY_GUIDELINES: &str = "\
Audio safety guidelines:
- Keep volume low (recommended: 30% or below)
- Take regular breaks from continuous audio
- Stop immediately if you experience discomfort
- Individual responses to noise vary significantly
- Not recommended for extended sessions (over 2 hours)";
