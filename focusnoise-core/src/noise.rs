//! Noise sources and loopable noise buffers.
//!
//! Contents
//! - `NoiseType`   : off / white / pink selector (string form `off`, `white`, `pink`)
//! - `PinkFilter`  : Paul Kellett's refined 1/f filter (seven one-pole sections)
//! - `BufferSpec`  : everything a generation pass needs besides the RNG
//! - `NoiseBuffer` : immutable planar block of samples, one loop cycle
//!
//! Notes
//! - Each channel gets its own fresh `PinkFilter`, so channels are decorrelated
//!   and no filter state leaks between buffers.
//! - Random draws are channel-major: every sample of channel 0, then channel 1, ...
//!   A seeded RNG therefore reproduces a buffer exactly.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use rand::Rng;

/// Attenuation applied to the raw Kellett output so it peaks close to full scale.
pub const DEFAULT_PINK_SCALE: f32 = 0.11;

/// White noise is already in `[-1, 1]`; no attenuation by default.
pub const DEFAULT_WHITE_SCALE: f32 = 1.0;

/// Spectral shape of the noise being played.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NoiseType {
    #[default]
    Off,
    White,
    Pink,
}

impl NoiseType {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            NoiseType::Off => "off",
            NoiseType::White => "white",
            NoiseType::Pink => "pink",
        }
    }

    /// `true` for every type that produces sound.
    #[inline]
    pub fn is_audible(self) -> bool {
        !matches!(self, NoiseType::Off)
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known noise type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseNoiseTypeError;

impl fmt::Display for ParseNoiseTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown noise type (expected off, white or pink)")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseNoiseTypeError {}

impl FromStr for NoiseType {
    type Err = ParseNoiseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("off") {
            Ok(NoiseType::Off)
        } else if s.eq_ignore_ascii_case("white") {
            Ok(NoiseType::White)
        } else if s.eq_ignore_ascii_case("pink") {
            Ok(NoiseType::Pink)
        } else {
            Err(ParseNoiseTypeError)
        }
    }
}

// -------------------------------- Sources ----------------------------------------

/// One uniform white sample in `[-1, 1]`.
#[inline]
pub fn white_sample<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(-1.0_f32..=1.0)
}

/// Paul Kellett's refined pink noise filter.
///
/// Feed it white samples in `[-1, 1]`; output is unscaled (typically within a few units of zero),
/// so multiply by [`DEFAULT_PINK_SCALE`] or similar before use.
#[derive(Copy, Clone, Debug, Default)]
pub struct PinkFilter {
    b: [f32; 7],
}

impl PinkFilter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.b = [0.0; 7];
    }

    #[inline]
    pub fn process(&mut self, white: f32) -> f32 {
        let b = &mut self.b;
        b[0] = 0.99886 * b[0] + white * 0.055_517_9;
        b[1] = 0.99332 * b[1] + white * 0.075_075_9;
        b[2] = 0.96900 * b[2] + white * 0.153_852;
        b[3] = 0.86650 * b[3] + white * 0.310_485_6;
        b[4] = 0.55000 * b[4] + white * 0.532_952_2;
        b[5] = -0.7616 * b[5] - white * 0.016_898;
        let pink = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362;
        // b6 is a one-sample delay: it feeds the *next* output.
        b[6] = white * 0.115_926;
        pink
    }
}

// -------------------------------- Buffers ----------------------------------------

/// Parameters of one generation pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BufferSpec {
    pub noise_type: NoiseType,
    pub sample_rate: u32,
    pub seconds: u32,
    pub channels: u16,
    pub pink_scale: f32,
    pub white_scale: f32,
}

impl BufferSpec {
    /// Stereo spec with the default scales.
    pub fn new(noise_type: NoiseType, sample_rate: u32, seconds: u32) -> Self {
        Self {
            noise_type,
            sample_rate,
            seconds,
            channels: 2,
            pink_scale: DEFAULT_PINK_SCALE,
            white_scale: DEFAULT_WHITE_SCALE,
        }
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.sample_rate as usize * self.seconds as usize
    }
}

/// One loop cycle of generated noise, stored planar (channel after channel).
///
/// There is no mutable access: a new noise type means a new buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseBuffer {
    noise_type: NoiseType,
    sample_rate: u32,
    channels: u16,
    frames: usize,
    data: Vec<f32>,
}

impl NoiseBuffer {
    /// Run one generation pass.
    ///
    /// Returns `None` for [`NoiseType::Off`] and for specs that would produce no
    /// samples (zero rate, duration or channel count).
    pub fn generate<R: Rng>(spec: &BufferSpec, rng: &mut R) -> Option<Self> {
        let frames = spec.frames();
        if !spec.noise_type.is_audible() || frames == 0 || spec.channels == 0 {
            return None;
        }

        let mut data = Vec::with_capacity(frames * usize::from(spec.channels));
        for _ in 0..spec.channels {
            match spec.noise_type {
                NoiseType::White => {
                    let scale = spec.white_scale;
                    data.extend((0..frames).map(|_| white_sample(rng) * scale));
                }
                NoiseType::Pink => {
                    let scale = spec.pink_scale;
                    let mut filter = PinkFilter::new();
                    data.extend((0..frames).map(|_| filter.process(white_sample(rng)) * scale));
                }
                NoiseType::Off => unreachable!("filtered above"),
            }
        }

        Some(Self {
            noise_type: spec.noise_type,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            frames,
            data,
        })
    }

    #[inline] pub fn noise_type(&self) -> NoiseType { self.noise_type }
    #[inline] pub fn sample_rate(&self) -> u32 { self.sample_rate }
    #[inline] pub fn channels(&self) -> u16 { self.channels }

    /// Frames per channel (one loop cycle).
    #[inline] pub fn frames(&self) -> usize { self.frames }

    /// Length of one loop cycle in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f32 {
        self.frames as f32 / self.sample_rate as f32
    }

    /// Samples of channel `ch`, or `None` if out of range.
    #[inline]
    pub fn channel(&self, ch: usize) -> Option<&[f32]> {
        if ch >= usize::from(self.channels) {
            return None;
        }
        let start = ch * self.frames;
        Some(&self.data[start..start + self.frames])
    }

    /// Sample at `frame` of channel `ch`. Both indices must be in range.
    #[inline]
    pub fn sample(&self, ch: usize, frame: usize) -> f32 {
        self.data[ch * self.frames + frame]
    }

    /// Every sample, channel-major.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

// ------------------------------------ Tests --------------------------------------
