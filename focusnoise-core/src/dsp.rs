//! Math backend and small DSP helpers.
//!
//! Conventions:
//! - All functions are `#[inline]` where useful to help the optimizer.
//! - Statistics helpers return `0.0` for empty input instead of NaN.

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    if #[cfg(feature = "std")] {
        #[inline] fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] fn m_sqrt(x: f32) -> f32 { x.sqrt() }
    } else {
        #[inline] fn m_exp(x: f32) -> f32 { libm::expf(x) }
        #[inline] fn m_sqrt(x: f32) -> f32 { libm::sqrtf(x) }
    }
}

// --------------------------------- Smoothing -------------------------------------

/// One-pole smoothing coefficient for a time constant `t_ms` (milliseconds).
///
/// The discrete one-pole form is `y[n] += (1 - a) * (x[n] - y[n])` with
/// `a = exp(-1/(tau * sr))`. A non-positive time constant means "no smoothing"
/// and yields `a = 0`, so the output jumps straight to the input.
#[inline]
pub fn one_pole_coeff_ms(t_ms: f32, sr: f32) -> f32 {
    if t_ms.is_nan() || sr.is_nan() || t_ms <= 0.0 || sr <= 0.0 {
        return 0.0;
    }
    let tau = t_ms * 0.001;
    m_exp(-1.0 / (tau * sr))
}

// --------------------------------- Statistics ------------------------------------

/// Arithmetic mean of `xs`, accumulated in f64.
#[inline]
pub fn mean(xs: &[f32]) -> f32 {
    if xs.is_empty() {
        return 0.0;
    }
    let sum: f64 = xs.iter().map(|&x| f64::from(x)).sum();
    (sum / xs.len() as f64) as f32
}

/// Root-mean-square level of `xs`.
#[inline]
pub fn rms(xs: &[f32]) -> f32 {
    if xs.is_empty() {
        return 0.0;
    }
    let sum: f64 = xs.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    m_sqrt((sum / xs.len() as f64) as f32)
}

/// Largest absolute sample value in `xs`.
#[inline]
pub fn peak(xs: &[f32]) -> f32 {
    xs.iter().fold(0.0_f32, |acc, &x| acc.max(x.abs()))
}

// --------------------------------- Tests (std only) ------------------------------
