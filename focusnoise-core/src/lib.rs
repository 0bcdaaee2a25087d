#![cfg_attr(not(feature = "std"), no_std)]
//! focusnoise core: no_std-ready noise generation primitives.
//!
//! Features
//! - `std`    : (default) use the Rust standard library and entropy-seeded RNGs
//! - `no-std` : build with `#![no_std]` (+ `alloc`) and use `libm` for math
//!
//! Modules
//! - [`dsp`]   : math backend, one-pole coefficients, buffer statistics
//! - [`gain`]  : safety-clamped [`Volume`](crate::gain::Volume) and a click-free gain smoother
//! - [`noise`] : noise types, the Kellett pink filter and [`NoiseBuffer`](crate::noise::NoiseBuffer) generation
//!
//! Design
//! - Generation is a single synchronous pass; buffers are immutable once built
//! - Randomness is injected through [`rand::Rng`] so every pass is reproducible under a seed

extern crate alloc;

pub mod dsp;
pub mod gain;
pub mod noise;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::dsp::{mean, one_pole_coeff_ms, peak, rms};
    pub use crate::gain::{GainSmoother, Volume, MAX_VOLUME};
    pub use crate::noise::{
        BufferSpec, NoiseBuffer, NoiseType, ParseNoiseTypeError, PinkFilter, DEFAULT_PINK_SCALE,
        DEFAULT_WHITE_SCALE,
    };
}

#[cfg(test)]
mod smoke {

    #[test]
    fn prelude_exists() {
        use crate::prelude::*;
        let _ = Volume::new(0.3);
        let mut pink = PinkFilter::new();
        let _ = pink.process(0.1);
        let mut sm = GainSmoother::new(10.0, 48000.0);
        let _ = sm.next();
    }
}
