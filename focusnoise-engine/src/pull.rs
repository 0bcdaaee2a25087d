//! Host-driven output: the host owns the audio callback and pulls frames.
//!
//! Mobile platforms usually hand the application a render callback rather
//! than letting it open a device. [`PullOutput`] is the engine's side of that
//! arrangement; the matching [`PullHandle`] goes to the host's render thread.

use std::sync::Arc;

use parking_lot::Mutex;

use focusnoise_core::gain::Volume;
use focusnoise_core::noise::NoiseBuffer;

use crate::config::EngineConfig;
use crate::error::{AudioError, Result};
use crate::output::AudioOutput;
use crate::player::{render_shared, LoopPlayer, SharedPlayer};

/// `None` until acquired and again after release.
type Slot = Arc<Mutex<Option<SharedPlayer>>>;

#[derive(Debug)]
pub struct PullOutput {
    sample_rate: u32,
    slot: Slot,
    player: Option<SharedPlayer>,
}

/// Render side of a [`PullOutput`]. Cheap to clone; `Send + Sync`.
#[derive(Debug, Clone)]
pub struct PullHandle {
    slot: Slot,
}

impl PullOutput {
    /// Output for a host rendering at `sample_rate` Hz.
    pub fn new(sample_rate: u32) -> (Self, PullHandle) {
        let slot: Slot = Arc::new(Mutex::new(None));
        let handle = PullHandle { slot: Arc::clone(&slot) };
        (Self { sample_rate, slot, player: None }, handle)
    }

    fn with_player(&self, f: impl FnOnce(&mut LoopPlayer)) {
        if let Some(player) = &self.player {
            f(&mut player.lock());
        }
    }
}

impl AudioOutput for PullOutput {
    fn acquire(&mut self, config: &EngineConfig) -> Result<u32> {
        if self.sample_rate == 0 {
            return Err(AudioError::device_unavailable("host reported a sample rate of 0 Hz"));
        }
        let player = LoopPlayer::shared(self.sample_rate, config.gain_smoothing_ms);
        *self.slot.lock() = Some(Arc::clone(&player));
        self.player = Some(player);
        log::debug!("pull output connected at {} Hz", self.sample_rate);
        Ok(self.sample_rate)
    }

    fn play_looped(&mut self, buffer: NoiseBuffer, gain: Volume) {
        self.with_player(|p| p.load(buffer, gain));
    }

    fn set_gain(&mut self, gain: Volume) {
        self.with_player(|p| p.set_gain(gain));
    }

    fn stop(&mut self) {
        self.with_player(LoopPlayer::clear);
    }

    fn release(&mut self) {
        self.slot.lock().take();
        self.player = None;
        log::debug!("pull output disconnected");
    }
}

impl PullHandle {
    /// `true` while the engine holds the output.
    pub fn is_connected(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Fill interleaved `out` and return the frame count written. Writes
    /// silence when nothing is playing or the engine is mid-update.
    pub fn render_interleaved_f32(&self, out: &mut [f32], channels: usize) -> usize {
        let player = self.slot.try_lock().and_then(|slot| slot.clone());
        match player {
            Some(p) => render_shared(&p, out, channels, |s| s),
            None => {
                out.fill(0.0);
                if channels == 0 { 0 } else { out.len() / channels }
            }
        }
    }
}
