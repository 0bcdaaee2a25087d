//! Outbound contract between the engine and a platform audio output.
//!
//! Any primitive that can loop a sample buffer and scale it by a gain fits.
//! The engine drives an implementation strictly in this order:
//!
//! ```text
//! acquire ─┬─> play_looped ─> set_gain* ─> stop ─┬─> ... ─> release
//!          └──────────────────────────────────────┘
//! ```
//!
//! `stop` always precedes the next `play_looped`, and nothing is called after
//! `release`.

use focusnoise_core::gain::Volume;
use focusnoise_core::noise::NoiseBuffer;

use crate::config::EngineConfig;
use crate::error::Result;

pub trait AudioOutput {
    /// Open the output device and return its sample rate in Hz.
    ///
    /// On error the implementation must hold no device resources.
    fn acquire(&mut self, config: &EngineConfig) -> Result<u32>;

    /// Start looping `buffer` at `gain`. Ownership moves to the output.
    fn play_looped(&mut self, buffer: NoiseBuffer, gain: Volume);

    /// Change the gain of the current loop without interrupting it.
    fn set_gain(&mut self, gain: Volume);

    /// Silence output immediately and drop the current buffer. Device stays open.
    fn stop(&mut self);

    /// Close the device.
    fn release(&mut self);
}
