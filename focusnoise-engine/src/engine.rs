//! The noise engine: lifecycle of one looping noise session on one output.
//!
//! State machine
//!
//! ```text
//!             start (acquire ok)            start (type switch / restart)
//!  Unacquired ─────────────────> Acquired ─┐  ┌──────────┐
//!      │                          │  ▲      │  │          │
//!      │                          │  └ stop ┴─ Playing <──┘
//!      └──── teardown ────────────┴─────────────┴──────> TornDown
//! ```
//!
//! - The device is acquired lazily by the first audible `start` and held
//!   until `teardown`; `stop` keeps it open.
//! - Playback always stops before a new buffer is handed to the output, so at
//!   most one buffer is ever connected.
//! - `start` must only be called in response to a user gesture; platforms
//!   commonly refuse audio output otherwise. Tracking that is the caller's job.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use focusnoise_core::dsp::{peak, rms};
use focusnoise_core::gain::Volume;
use focusnoise_core::noise::{NoiseBuffer, NoiseType};

use crate::config::EngineConfig;
use crate::error::{AudioError, ConfigError, Result};
use crate::output::AudioOutput;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DeviceState {
    Unacquired,
    Acquired { sample_rate: u32 },
    TornDown,
}

/// Plays looping white or pink noise through an [`AudioOutput`].
///
/// Owned by whichever UI scope shows the noise player; dropping it tears the
/// output down.
pub struct NoiseEngine<O: AudioOutput, R: Rng = StdRng> {
    output: O,
    rng: R,
    config: EngineConfig,
    device: DeviceState,
    volume: Volume,
    playing: Option<NoiseType>,
}

impl<O: AudioOutput> NoiseEngine<O, StdRng> {
    /// Engine with an entropy-seeded random source.
    pub fn new(output: O, config: EngineConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_rng(output, config, StdRng::from_entropy())
    }
}

impl<O: AudioOutput, R: Rng> NoiseEngine<O, R> {
    /// Engine with an explicit random source (seed it for reproducible buffers).
    pub fn with_rng(output: O, config: EngineConfig, rng: R) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            output,
            rng,
            config,
            device: DeviceState::Unacquired,
            volume: Volume::SILENT,
            playing: None,
        })
    }

    /// Start looping `noise_type` at `volume` (clamped to `[0, 0.5]`).
    ///
    /// Acquires the device on first use, stops whatever is playing, generates
    /// a fresh buffer and starts it. Starting the type that is already playing
    /// regenerates the buffer. `NoiseType::Off` stores the volume and stops.
    ///
    /// # Errors
    /// - [`AudioError::DeviceUnavailable`] if the device cannot be opened; the
    ///   engine stays stopped and holds nothing.
    /// - [`AudioError::TornDown`] after [`teardown`](Self::teardown).
    pub fn start(&mut self, noise_type: NoiseType, volume: f32) -> Result<()> {
        if self.device == DeviceState::TornDown {
            log::warn!("start({noise_type}) ignored: engine was torn down");
            return Err(AudioError::TornDown);
        }
        self.volume = Volume::new(volume);
        if !noise_type.is_audible() {
            self.stop();
            return Ok(());
        }

        let sample_rate = self.ensure_device()?;
        self.stop();

        let spec = self.config.buffer_spec(noise_type, sample_rate);
        let Some(buffer) = NoiseBuffer::generate(&spec, &mut self.rng) else {
            self.output.release();
            self.device = DeviceState::Unacquired;
            return Err(AudioError::device_unavailable(format!(
                "cannot generate audio at a device rate of {sample_rate} Hz"
            )));
        };
        log::debug!(
            "starting {noise_type} noise: {} frame loop x {} ch, peak {:.3}, rms {:.3}, gain {:.2}",
            buffer.frames(),
            buffer.channels(),
            peak(buffer.as_slice()),
            rms(buffer.as_slice()),
            self.volume.get()
        );

        self.output.play_looped(buffer, self.volume);
        self.playing = Some(noise_type);
        Ok(())
    }

    /// Set the output volume, clamped to `[0, 0.5]`.
    ///
    /// Applies to the live loop immediately; otherwise remembered for the next
    /// `start`. No-op after teardown.
    pub fn set_volume(&mut self, volume: f32) {
        if self.device == DeviceState::TornDown {
            log::warn!("set_volume ignored: engine was torn down");
            return;
        }
        self.volume = Volume::new(volume);
        if self.playing.is_some() {
            self.output.set_gain(self.volume);
        }
    }

    /// Stop playback and drop the loop. The device stays open. No-op when idle.
    pub fn stop(&mut self) {
        if let Some(noise_type) = self.playing.take() {
            self.output.stop();
            log::debug!("stopped {noise_type} noise");
        }
    }

    /// Stop and close the device. The engine is unusable afterwards; calling
    /// this again does nothing.
    pub fn teardown(&mut self) {
        if self.device == DeviceState::TornDown {
            return;
        }
        self.stop();
        if let DeviceState::Acquired { .. } = self.device {
            self.output.release();
        }
        self.device = DeviceState::TornDown;
        log::debug!("noise engine torn down");
    }

    fn ensure_device(&mut self) -> Result<u32> {
        if let DeviceState::Acquired { sample_rate } = self.device {
            return Ok(sample_rate);
        }
        let sample_rate = self.output.acquire(&self.config).inspect_err(|e| {
            log::warn!("output acquisition failed: {e}");
        })?;
        self.device = DeviceState::Acquired { sample_rate };
        log::debug!("output acquired at {sample_rate} Hz");
        Ok(sample_rate)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    /// Type currently sounding; `Off` when stopped.
    pub fn noise_type(&self) -> NoiseType {
        self.playing.unwrap_or(NoiseType::Off)
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn is_device_acquired(&self) -> bool {
        matches!(self.device, DeviceState::Acquired { .. })
    }

    pub fn is_torn_down(&self) -> bool {
        self.device == DeviceState::TornDown
    }

    /// Sample rate of the open device, if any.
    pub fn sample_rate(&self) -> Option<u32> {
        match self.device {
            DeviceState::Acquired { sample_rate } => Some(sample_rate),
            _ => None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the output backend.
    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: AudioOutput, R: Rng> Drop for NoiseEngine<O, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pull::{PullHandle, PullOutput};
    use approx::assert_relative_eq;

    fn engine(sr: u32) -> (NoiseEngine<PullOutput>, PullHandle) {
        let (out, handle) = PullOutput::new(sr);
        let cfg = EngineConfig { buffer_seconds: 1, gain_smoothing_ms: 0.0, ..Default::default() };
        let eng = NoiseEngine::with_rng(out, cfg, StdRng::seed_from_u64(11)).unwrap();
        (eng, handle)
    }

    fn render(handle: &PullHandle, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * 2];
        handle.render_interleaved_f32(&mut out, 2);
        out
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let (out, _) = PullOutput::new(1000);
        let cfg = EngineConfig { channels: 0, ..Default::default() };
        assert!(NoiseEngine::new(out, cfg).is_err());
    }

    #[test]
    fn device_is_acquired_lazily() {
        let (mut eng, handle) = engine(1000);
        assert!(!eng.is_device_acquired());
        assert!(!handle.is_connected());
        eng.start(NoiseType::White, 0.3).unwrap();
        assert!(eng.is_device_acquired());
        assert_eq!(eng.sample_rate(), Some(1000));
        assert!(handle.is_connected());
    }

    #[test]
    fn start_clamps_volume_and_plays() {
        let (mut eng, handle) = engine(1000);
        eng.start(NoiseType::White, 0.8).unwrap();
        assert_eq!(eng.volume().get(), 0.5);
        assert!(eng.is_playing());
        assert_eq!(eng.noise_type(), NoiseType::White);

        let out = render(&handle, 256);
        assert!(out.iter().all(|s| s.abs() <= 0.5));
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn set_volume_applies_live() {
        let (mut eng, handle) = engine(1000);
        eng.start(NoiseType::Pink, 0.4).unwrap();
        eng.set_volume(-1.0);
        assert_relative_eq!(eng.volume().get(), 0.0);
        assert!(render(&handle, 64).iter().all(|&s| s == 0.0));
        assert!(eng.is_playing());
    }

    #[test]
    fn default_smoothing_fades_to_exact_silence() {
        let (out, handle) = PullOutput::new(48_000);
        let mut eng = NoiseEngine::with_rng(out, EngineConfig::default(), StdRng::seed_from_u64(3)).unwrap();
        eng.start(NoiseType::White, 0.5).unwrap();
        assert!(render(&handle, 480).iter().any(|&s| s != 0.0));

        eng.set_volume(-1.0);
        render(&handle, 48_000);
        let tail = render(&handle, 4_800);
        assert!(tail.iter().all(|&s| s == 0.0), "fade did not settle on silence");
        assert!(eng.is_playing());
    }

    #[test]
    fn set_volume_while_stopped_is_kept_for_next_start() {
        let (mut eng, _handle) = engine(1000);
        eng.set_volume(0.2);
        assert!(!eng.is_device_acquired());
        assert_relative_eq!(eng.volume().get(), 0.2);
    }

    #[test]
    fn stop_keeps_device_open() {
        let (mut eng, handle) = engine(1000);
        eng.stop();
        eng.start(NoiseType::White, 0.3).unwrap();
        eng.stop();
        assert!(!eng.is_playing());
        assert_eq!(eng.noise_type(), NoiseType::Off);
        assert!(eng.is_device_acquired());
        assert!(handle.is_connected());
        assert!(render(&handle, 32).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn off_stops_and_keeps_volume() {
        let (mut eng, _handle) = engine(1000);
        eng.start(NoiseType::Pink, 0.3).unwrap();
        eng.start(NoiseType::Off, 0.1).unwrap();
        assert!(!eng.is_playing());
        assert_relative_eq!(eng.volume().get(), 0.1);
    }

    #[test]
    fn teardown_releases_and_blocks_further_use() {
        let (mut eng, handle) = engine(1000);
        eng.start(NoiseType::White, 0.3).unwrap();
        eng.teardown();
        assert!(eng.is_torn_down());
        assert!(!handle.is_connected());
        assert_eq!(eng.start(NoiseType::White, 0.3), Err(AudioError::TornDown));
        eng.set_volume(0.4);
        eng.stop();
        eng.teardown();
        assert_eq!(eng.volume().get(), 0.3);
    }

    #[test]
    fn unavailable_device_leaves_engine_stopped() {
        let (mut eng, _handle) = engine(0);
        let err = eng.start(NoiseType::Pink, 0.3).unwrap_err();
        assert!(err.is_retryable());
        assert!(!eng.is_playing());
        assert!(!eng.is_device_acquired());
    }

    #[test]
    fn drop_tears_down() {
        let (mut eng, handle) = engine(1000);
        eng.start(NoiseType::White, 0.3).unwrap();
        drop(eng);
        assert!(!handle.is_connected());
    }
}
