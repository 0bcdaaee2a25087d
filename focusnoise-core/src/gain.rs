//! Output level handling: the safety-clamped [`Volume`] and a one-pole
//! [`GainSmoother`] that ramps toward it without zipper noise.

use crate::dsp::one_pole_coeff_ms;

/// Hard ceiling on output gain. Nothing above this is representable as a [`Volume`].
pub const MAX_VOLUME: f32 = 0.5;

/// Distance (about -120 dB) at which the smoother lands exactly on its target.
const SETTLE_EPS: f32 = 1.0e-6;

/// Output gain in `[0, MAX_VOLUME]`.
///
/// Construction clamps instead of rejecting: negative input becomes `0.0`,
/// anything above the ceiling becomes [`MAX_VOLUME`], and NaN becomes `0.0`.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    pub const SILENT: Volume = Volume(0.0);
    pub const MAX: Volume = Volume(MAX_VOLUME);

    #[inline]
    pub fn new(v: f32) -> Self {
        if v.is_nan() {
            return Self::SILENT;
        }
        Self(v.clamp(0.0, MAX_VOLUME))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn is_silent(self) -> bool {
        self.0 == 0.0
    }
}

impl From<f32> for Volume {
    #[inline]
    fn from(v: f32) -> Self {
        Self::new(v)
    }
}

impl From<Volume> for f32 {
    #[inline]
    fn from(v: Volume) -> Self {
        v.0
    }
}

/// One-pole gain smoother: `y += (target - y) * (1 - a)`.
///
/// Ticked once per output frame by the render path; the control side only
/// moves the target. Once within `SETTLE_EPS` of the target it snaps onto
/// it, so a ramp to zero ends in exact silence instead of subnormals.
#[derive(Copy, Clone, Debug)]
pub struct GainSmoother {
    alpha: f32,
    y: f32,
    target: f32,
}

impl GainSmoother {
    #[inline]
    pub fn new(t_ms: f32, sr: f32) -> Self {
        Self { alpha: one_pole_coeff_ms(t_ms, sr), y: 0.0, target: 0.0 }
    }

    /// Jump straight to `v` (no ramp).
    #[inline]
    pub fn reset(&mut self, v: Volume) {
        self.y = v.get();
        self.target = v.get();
    }

    #[inline]
    pub fn set_target(&mut self, v: Volume) {
        self.target = v.get();
    }

    #[inline]
    pub fn next(&mut self) -> f32 {
        let d = self.target - self.y;
        if d.abs() < SETTLE_EPS {
            self.y = self.target;
        } else {
            self.y += d * (1.0 - self.alpha);
        }
        self.y
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.y
    }
}

// ------------------------------------ Tests --------------------------------------
