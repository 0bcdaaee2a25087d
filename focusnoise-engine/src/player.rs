//! Render-side state shared between the control thread and an audio callback.
//!
//! A [`LoopPlayer`] holds at most one [`NoiseBuffer`] plus a read cursor and
//! turns it into interleaved frames. Backends keep it behind a
//! [`SharedPlayer`] and the callback only ever `try_lock`s, writing silence if
//! the control side happens to hold the lock.

use std::sync::Arc;

use parking_lot::Mutex;

use focusnoise_core::gain::{GainSmoother, Volume};
use focusnoise_core::noise::NoiseBuffer;

pub type SharedPlayer = Arc<Mutex<LoopPlayer>>;

#[derive(Debug)]
struct LoopCursor {
    buffer: NoiseBuffer,
    frame: usize,
}

#[derive(Debug)]
pub struct LoopPlayer {
    current: Option<LoopCursor>,
    gain: GainSmoother,
}

impl LoopPlayer {
    pub fn new(sample_rate: u32, gain_smoothing_ms: f32) -> Self {
        Self {
            current: None,
            gain: GainSmoother::new(gain_smoothing_ms, sample_rate as f32),
        }
    }

    pub fn shared(sample_rate: u32, gain_smoothing_ms: f32) -> SharedPlayer {
        Arc::new(Mutex::new(Self::new(sample_rate, gain_smoothing_ms)))
    }

    /// Replace whatever is loaded with `buffer`, starting at its first frame.
    ///
    /// The gain jumps to `gain` so the new loop starts at the requested level.
    pub fn load(&mut self, buffer: NoiseBuffer, gain: Volume) {
        self.current = Some(LoopCursor { buffer, frame: 0 });
        self.gain.reset(gain);
    }

    /// Drop the loaded buffer; following frames are silent.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn set_gain(&mut self, gain: Volume) {
        self.gain.set_target(gain);
    }

    /// Fill interleaved `out` (`channels` samples per frame) and return the
    /// number of frames written. A trailing partial frame is zeroed.
    ///
    /// Device channels beyond the buffer's channel count reuse buffer channels
    /// round-robin. The cursor wraps to frame 0 at the end of the buffer.
    pub fn render<T: Copy>(&mut self, out: &mut [T], channels: usize, convert: impl Fn(f32) -> T) -> usize {
        if channels == 0 {
            return 0;
        }
        let frames = out.len() / channels;

        let Some(cursor) = self.current.as_mut() else {
            out.fill(convert(0.0));
            return frames;
        };

        let buf_channels = usize::from(cursor.buffer.channels());
        let buf_frames = cursor.buffer.frames();
        for frame in out.chunks_exact_mut(channels) {
            let g = self.gain.next();
            for (ch, slot) in frame.iter_mut().enumerate() {
                let s = cursor.buffer.sample(ch % buf_channels, cursor.frame) * g;
                *slot = convert(s.clamp(-1.0, 1.0));
            }
            cursor.frame += 1;
            if cursor.frame >= buf_frames {
                cursor.frame = 0;
            }
        }
        out[frames * channels..].fill(convert(0.0));
        frames
    }

    pub fn render_interleaved_f32(&mut self, out: &mut [f32], channels: usize) -> usize {
        self.render(out, channels, |s| s)
    }
}

/// Render from a shared player without blocking; silence on lock contention.
pub fn render_shared<T: Copy>(
    player: &SharedPlayer,
    out: &mut [T],
    channels: usize,
    convert: impl Fn(f32) -> T,
) -> usize {
    match player.try_lock() {
        Some(mut p) => p.render(out, channels, convert),
        None => {
            out.fill(convert(0.0));
            if channels == 0 { 0 } else { out.len() / channels }
        }
    }
}

// ------------------------------------ Tests --------------------------------------
