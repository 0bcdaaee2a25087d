//! Recording output used by the lifecycle tests.

use std::cell::RefCell;
use std::rc::Rc;

use focusnoise_engine::{AudioError, AudioOutput, EngineConfig, NoiseBuffer, NoiseType, Result, Volume};

#[derive(Debug, Default)]
pub struct Record {
    pub acquire_calls: usize,
    pub release_calls: usize,
    pub open_connections: usize,
    pub max_open_connections: usize,
    pub connected_buffers: usize,
    pub max_connected_buffers: usize,
    pub active: Option<NoiseType>,
    pub active_frames: usize,
    pub gain: Option<f32>,
    /// Calls made while no connection was open.
    pub calls_without_device: usize,
    pub fail_acquire: bool,
}

#[derive(Debug, Clone)]
pub struct RecordingOutput {
    pub sample_rate: u32,
    pub record: Rc<RefCell<Record>>,
}

impl RecordingOutput {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate, record: Rc::default() }
    }

    pub fn failing() -> Self {
        let out = Self::new(48_000);
        out.record.borrow_mut().fail_acquire = true;
        out
    }

    fn check_open(&self) {
        let mut r = self.record.borrow_mut();
        if r.open_connections == 0 {
            r.calls_without_device += 1;
        }
    }
}

impl AudioOutput for RecordingOutput {
    fn acquire(&mut self, _config: &EngineConfig) -> Result<u32> {
        let mut r = self.record.borrow_mut();
        r.acquire_calls += 1;
        if r.fail_acquire {
            return Err(AudioError::device_unavailable("permission denied"));
        }
        r.open_connections += 1;
        r.max_open_connections = r.max_open_connections.max(r.open_connections);
        Ok(self.sample_rate)
    }

    fn play_looped(&mut self, buffer: NoiseBuffer, gain: Volume) {
        self.check_open();
        let mut r = self.record.borrow_mut();
        r.connected_buffers += 1;
        r.max_connected_buffers = r.max_connected_buffers.max(r.connected_buffers);
        r.active = Some(buffer.noise_type());
        r.active_frames = buffer.frames();
        r.gain = Some(gain.get());
    }

    fn set_gain(&mut self, gain: Volume) {
        self.check_open();
        self.record.borrow_mut().gain = Some(gain.get());
    }

    fn stop(&mut self) {
        self.check_open();
        let mut r = self.record.borrow_mut();
        r.connected_buffers = r.connected_buffers.saturating_sub(1);
        r.active = None;
    }

    fn release(&mut self) {
        self.check_open();
        let mut r = self.record.borrow_mut();
        r.release_calls += 1;
        r.open_connections = r.open_connections.saturating_sub(1);
    }
}
