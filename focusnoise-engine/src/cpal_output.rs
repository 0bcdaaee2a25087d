//! CPAL-backed output (feature `realtime`).
//!
//! One output stream is built per acquisition and runs until release. The
//! stream callback renders from a shared [`LoopPlayer`], so starting,
//! stopping and re-gaining never rebuild the stream.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use focusnoise_core::gain::Volume;
use focusnoise_core::noise::NoiseBuffer;

use crate::config::EngineConfig;
use crate::error::{AudioError, Result};
use crate::output::AudioOutput;
use crate::player::{render_shared, LoopPlayer, SharedPlayer};

struct Connection {
    // Held only to keep the stream alive; dropping it closes the device.
    _stream: cpal::Stream,
    player: SharedPlayer,
}

/// Output through the platform's audio host.
///
/// Not `Send` on every platform (`cpal::Stream` is not); keep it on the
/// thread that owns the engine.
#[derive(Default)]
pub struct CpalOutput {
    conn: Option<Connection>,
}

impl CpalOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unavailable(context: &str, e: impl std::fmt::Display) -> AudioError {
    AudioError::device_unavailable(format!("{context}: {e}"))
}

fn pick_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    if let Some(name) = name {
        let devices = host
            .output_devices()
            .map_err(|e| unavailable("failed to enumerate output devices", e))?;
        for d in devices {
            if d.name().is_ok_and(|n| n == name) {
                return Ok(d);
            }
        }
        return Err(AudioError::device_unavailable(format!("requested device not found: {name}")));
    }
    host.default_output_device()
        .ok_or_else(|| AudioError::device_unavailable("no default output device"))
}

fn build_stream<T>(
    device: &cpal::Device,
    cfg: &cpal::StreamConfig,
    player: SharedPlayer,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::FromSample<f32> + cpal::SizedSample + Send + 'static,
{
    let channels = usize::from(cfg.channels);
    let err_fn = |e: cpal::StreamError| log::warn!("output stream error: {e}");

    device
        .build_output_stream(
            cfg,
            move |output: &mut [T], _| {
                render_shared(&player, output, channels, |s| T::from_sample(s));
            },
            err_fn,
            None,
        )
        .map_err(|e| unavailable("failed to build output stream", e))
}

impl AudioOutput for CpalOutput {
    fn acquire(&mut self, config: &EngineConfig) -> Result<u32> {
        let device = pick_device(config.device_name.as_deref())?;
        let sup_cfg = device
            .default_output_config()
            .map_err(|e| unavailable("failed to query output config", e))?;
        let sample_format = sup_cfg.sample_format();
        let cfg = sup_cfg.config();
        let sample_rate = cfg.sample_rate.0;

        let player = LoopPlayer::shared(sample_rate, config.gain_smoothing_ms);
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &cfg, player.clone())?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &cfg, player.clone())?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &cfg, player.clone())?,
            other => {
                return Err(AudioError::device_unavailable(format!(
                    "unsupported device sample format: {other:?}"
                )))
            }
        };
        stream.play().map_err(|e| unavailable("failed to start output stream", e))?;

        log::info!(
            "opened output device {:?}: {} Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "<unnamed>".into()),
            sample_rate,
            cfg.channels,
            sample_format
        );
        self.conn = Some(Connection { _stream: stream, player });
        Ok(sample_rate)
    }

    fn play_looped(&mut self, buffer: NoiseBuffer, gain: Volume) {
        if let Some(conn) = &self.conn {
            conn.player.lock().load(buffer, gain);
        }
    }

    fn set_gain(&mut self, gain: Volume) {
        if let Some(conn) = &self.conn {
            conn.player.lock().set_gain(gain);
        }
    }

    fn stop(&mut self) {
        if let Some(conn) = &self.conn {
            conn.player.lock().clear();
        }
    }

    fn release(&mut self) {
        if let Some(conn) = self.conn.take() {
            conn.player.lock().clear();
            drop(conn);
            log::debug!("output device released");
        }
    }
}
