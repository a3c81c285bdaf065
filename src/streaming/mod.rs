//! Real-time audio streaming
//!
//! A lock-guarded ring buffer decouples the synchronous chip emulation from
//! the audio callback thread: the caller fetches samples from the chip at its
//! own pace and pushes them into the buffer, while [`AudioDevice`] drains it
//! from the playback side. This is the crate's only cross-thread surface; the
//! chip itself stays single-threaded.

mod audio_device;

pub use audio_device::AudioDevice;

use crate::{Result, Vrc7Error};
use std::sync::Arc;

/// Stream configuration for real-time playback
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels (the chip is mono; 2 duplicates samples)
    pub channels: u16,
    /// Ring buffer capacity in samples
    pub buffer_len: usize,
}

impl StreamConfig {
    /// Low-latency configuration (~23ms of buffer at the given rate)
    pub fn low_latency(sample_rate: u32) -> Self {
        StreamConfig {
            sample_rate,
            channels: 1,
            buffer_len: (sample_rate as usize / 43).next_power_of_two(),
        }
    }

    /// Allocate the shared ring buffer for this configuration
    pub fn create_buffer(&self) -> Result<Arc<parking_lot::Mutex<RingBuffer>>> {
        Ok(Arc::new(parking_lot::Mutex::new(RingBuffer::new(
            self.buffer_len,
        )?)))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            sample_rate: 48_000,
            channels: 1,
            buffer_len: 8192,
        }
    }
}

/// Single-producer single-consumer sample ring buffer
///
/// Wrapped in `Arc<parking_lot::Mutex<_>>` to share between the emulation
/// thread and the audio callback.
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Vec<f32>,
    read_pos: usize,
    write_pos: usize,
    filled: usize,
}

impl RingBuffer {
    /// Create a ring buffer with the given capacity in samples
    ///
    /// # Errors
    ///
    /// Returns [`Vrc7Error::ConfigError`] for a zero capacity.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Vrc7Error::ConfigError(
                "ring buffer capacity must be nonzero".into(),
            ));
        }
        Ok(RingBuffer {
            buffer: vec![0.0; capacity],
            read_pos: 0,
            write_pos: 0,
            filled: 0,
        })
    }

    /// Number of samples available to read
    #[inline]
    pub fn available_read(&self) -> usize {
        self.filled
    }

    /// Free space available to write
    #[inline]
    pub fn available_write(&self) -> usize {
        self.buffer.len() - self.filled
    }

    /// Write samples, returning how many fit
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let count = samples.len().min(self.available_write());
        for &sample in &samples[..count] {
            self.buffer[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % self.buffer.len();
        }
        self.filled += count;
        count
    }

    /// Read samples into `out`, returning how many were available
    pub fn read(&mut self, out: &mut [f32]) -> usize {
        let count = out.len().min(self.filled);
        for slot in &mut out[..count] {
            *slot = self.buffer[self.read_pos];
            self.read_pos = (self.read_pos + 1) % self.buffer.len();
        }
        self.filled -= count;
        count
    }
}

/// Push a block of chip samples into a shared ring buffer as normalized f32
///
/// Returns the number of samples accepted; the rest are dropped when the
/// buffer is full (the playback side underruns to silence instead of
/// blocking the emulation).
pub fn push_samples(buffer: &parking_lot::Mutex<RingBuffer>, samples: &[i16]) -> usize {
    let normalized: Vec<f32> = samples
        .iter()
        .map(|&s| f32::from(s) / f32::from(i16::MAX))
        .collect();
    buffer.lock().write(&normalized)
}
