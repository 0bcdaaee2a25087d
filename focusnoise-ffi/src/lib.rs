//! C ABI wrapper for the focusnoise engine.
//!
//! Exposes the engine lifecycle (`start`, `set_volume`, `stop`, `teardown`)
//! and a render call the host invokes from its own audio callback.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `FocusNoiseEngine` (heap-allocated; you own/delete it).
//! - Noise types: `0` = off, `1` = white, `2` = pink.
//! - `focusnoise_start` returns one of the `FOCUSNOISE_*` status codes.
//!
//! Threading
//! - Control calls must come from one thread.
//! - `focusnoise_render_interleaved_f32` may run on the host's audio thread
//!   concurrently with control calls; it never blocks and renders silence
//!   while a control call is mid-update.

use focusnoise_engine::{
    AudioError, EngineConfig, NoiseEngine, NoiseType, PullHandle, PullOutput,
};

pub const FOCUSNOISE_OK: i32 = 0;
pub const FOCUSNOISE_ERR_NULL: i32 = -1;
pub const FOCUSNOISE_ERR_DEVICE_UNAVAILABLE: i32 = -2;
pub const FOCUSNOISE_ERR_TORN_DOWN: i32 = -3;
pub const FOCUSNOISE_ERR_INVALID_TYPE: i32 = -4;

/// Opaque engine wrapper we hand to C.
pub struct FocusNoiseEngine {
    inner: NoiseEngine<PullOutput>,
    handle: PullHandle,
}

fn noise_type_from_code(code: i32) -> Option<NoiseType> {
    match code {
        0 => Some(NoiseType::Off),
        1 => Some(NoiseType::White),
        2 => Some(NoiseType::Pink),
        _ => None,
    }
}

/// Borrow only the control half, so a concurrent render (which borrows only
/// `handle`) never aliases it.
unsafe fn control<'a>(engine: *mut FocusNoiseEngine) -> Option<&'a mut NoiseEngine<PullOutput>> {
    if engine.is_null() {
        return None;
    }
    Some(&mut *std::ptr::addr_of_mut!((*engine).inner))
}

/// Sample count of `frames` interleaved frames; `None` if it overflows `usize`.
fn interleaved_len(frames: u32, channels: u32) -> Option<usize> {
    (frames as usize).checked_mul(channels as usize)
}

fn status(result: Result<(), AudioError>) -> i32 {
    match result {
        Ok(()) => FOCUSNOISE_OK,
        Err(AudioError::DeviceUnavailable { .. }) => FOCUSNOISE_ERR_DEVICE_UNAVAILABLE,
        Err(AudioError::TornDown) => FOCUSNOISE_ERR_TORN_DOWN,
    }
}

// --- Creation / destruction -------------------------------------------------------

/// Create an engine rendering at `sample_rate` with loops of `buffer_seconds`
/// and `channels` noise channels.
/// Returns null if the configuration is invalid (`buffer_seconds` outside
/// 1..=60, `channels` outside 1..=8).
#[no_mangle]
pub extern "C" fn focusnoise_create(
    sample_rate: u32,
    buffer_seconds: u32,
    channels: u16,
) -> *mut FocusNoiseEngine {
    let config = EngineConfig { buffer_seconds, channels, ..EngineConfig::default() };
    let (output, handle) = PullOutput::new(sample_rate);
    match NoiseEngine::new(output, config) {
        Ok(inner) => Box::into_raw(Box::new(FocusNoiseEngine { inner, handle })),
        Err(e) => {
            log::warn!("focusnoise_create rejected config: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Destroy an engine previously returned by `focusnoise_create`, tearing it
/// down first if needed.
///
/// # Safety
/// `engine` must be null or a pointer from `focusnoise_create` that has not
/// been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn focusnoise_destroy(engine: *mut FocusNoiseEngine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

// --- Lifecycle -------------------------------------------------------------------

/// Start looping noise of type `noise_type` at `volume` (clamped to [0, 0.5]).
/// Call only in response to a user action.
///
/// # Safety
/// `engine` must be null or a live pointer from `focusnoise_create`.
#[no_mangle]
pub unsafe extern "C" fn focusnoise_start(engine: *mut FocusNoiseEngine, noise_type: i32, volume: f32) -> i32 {
    let Some(e) = control(engine) else { return FOCUSNOISE_ERR_NULL };
    let Some(noise_type) = noise_type_from_code(noise_type) else {
        return FOCUSNOISE_ERR_INVALID_TYPE;
    };
    status(e.start(noise_type, volume))
}

/// Set output volume (clamped to [0, 0.5]). Applies live while playing.
///
/// # Safety
/// `engine` must be null or a live pointer from `focusnoise_create`.
#[no_mangle]
pub unsafe extern "C" fn focusnoise_set_volume(engine: *mut FocusNoiseEngine, volume: f32) {
    if let Some(e) = control(engine) {
        e.set_volume(volume);
    }
}

/// Stop playback; the output stays connected.
///
/// # Safety
/// `engine` must be null or a live pointer from `focusnoise_create`.
#[no_mangle]
pub unsafe extern "C" fn focusnoise_stop(engine: *mut FocusNoiseEngine) {
    if let Some(e) = control(engine) {
        e.stop();
    }
}

/// Stop and disconnect. Further `start` calls return `FOCUSNOISE_ERR_TORN_DOWN`.
/// The handle must still be freed with `focusnoise_destroy`.
///
/// # Safety
/// `engine` must be null or a live pointer from `focusnoise_create`.
#[no_mangle]
pub unsafe extern "C" fn focusnoise_teardown(engine: *mut FocusNoiseEngine) {
    if let Some(e) = control(engine) {
        e.teardown();
    }
}

/// Returns 1 while noise is playing, 0 otherwise (or for a null handle).
///
/// # Safety
/// `engine` must be null or a live pointer from `focusnoise_create`.
#[no_mangle]
pub unsafe extern "C" fn focusnoise_is_playing(engine: *const FocusNoiseEngine) -> i32 {
    if engine.is_null() {
        return 0;
    }
    let inner = &*std::ptr::addr_of!((*engine).inner);
    i32::from(inner.is_playing())
}

// --- Rendering -------------------------------------------------------------------

/// Render `frames` of audio into an interleaved f32 buffer with `channels` channels.
/// Writes silence while nothing is playing.
///
/// Returns the number of frames rendered (0 on error).
///
/// # Safety
/// `engine` must be null or a live pointer from `focusnoise_create`, and
/// `out_interleaved` must point to at least `frames * channels` writable floats.
#[no_mangle]
pub unsafe extern "C" fn focusnoise_render_interleaved_f32(
    engine: *const FocusNoiseEngine,
    out_interleaved: *mut f32,
    frames: u32,
    channels: u32,
) -> u32 {
    if engine.is_null() || out_interleaved.is_null() || frames == 0 || channels == 0 {
        return 0;
    }
    let Some(len) = interleaved_len(frames, channels) else {
        return 0;
    };
    let handle = &*std::ptr::addr_of!((*engine).handle);
    let out = std::slice::from_raw_parts_mut(out_interleaved, len);
    handle.render_interleaved_f32(out, channels as usize) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_config() {
        assert!(focusnoise_create(48_000, 0, 2).is_null());
        assert!(focusnoise_create(48_000, 2, 0).is_null());
    }

    #[test]
    fn null_handles_are_tolerated() {
        unsafe {
            let null = std::ptr::null_mut();
            assert_eq!(focusnoise_start(null, 1, 0.3), FOCUSNOISE_ERR_NULL);
            focusnoise_set_volume(null, 0.3);
            focusnoise_stop(null);
            focusnoise_teardown(null);
            assert_eq!(focusnoise_is_playing(null), 0);
            let mut buf = [0.0_f32; 4];
            assert_eq!(focusnoise_render_interleaved_f32(null, buf.as_mut_ptr(), 2, 2), 0);
            focusnoise_destroy(null);
        }
    }

    #[test]
    fn full_lifecycle() {
        unsafe {
            let e = focusnoise_create(8_000, 1, 2);
            assert!(!e.is_null());
            assert_eq!(focusnoise_start(e, 7, 0.3), FOCUSNOISE_ERR_INVALID_TYPE);
            assert_eq!(focusnoise_start(e, 2, 0.9), FOCUSNOISE_OK);
            assert_eq!(focusnoise_is_playing(e), 1);

            let mut buf = vec![0.0_f32; 512];
            assert_eq!(focusnoise_render_interleaved_f32(e, buf.as_mut_ptr(), 256, 2), 256);
            assert!(buf.iter().any(|&s| s != 0.0));
            assert!(buf.iter().all(|s| s.abs() <= 0.5));

            focusnoise_stop(e);
            assert_eq!(focusnoise_is_playing(e), 0);
            focusnoise_render_interleaved_f32(e, buf.as_mut_ptr(), 256, 2);
            assert!(buf.iter().all(|&s| s == 0.0));

            focusnoise_teardown(e);
            assert_eq!(focusnoise_start(e, 1, 0.3), FOCUSNOISE_ERR_TORN_DOWN);
            focusnoise_destroy(e);
        }
    }

    #[test]
    fn interleaved_len_multiplies_frames_and_channels() {
        assert_eq!(interleaved_len(256, 2), Some(512));
        assert_eq!(interleaved_len(0, 8), Some(0));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn oversized_render_request_is_refused() {
        assert_eq!(interleaved_len(u32::MAX, 2), None);
        unsafe {
            let e = focusnoise_create(8_000, 1, 2);
            let mut buf = [0.0_f32; 2];
            assert_eq!(focusnoise_render_interleaved_f32(e, buf.as_mut_ptr(), u32::MAX, 2), 0);
            focusnoise_destroy(e);
        }
    }

    #[test]
    fn zero_sample_rate_reports_device_unavailable() {
        unsafe {
            let e = focusnoise_create(0, 2, 2);
            assert!(!e.is_null());
            assert_eq!(focusnoise_start(e, 1, 0.3), FOCUSNOISE_ERR_DEVICE_UNAVAILABLE);
            focusnoise_destroy(e);
        }
    }
}
