//! Audio device integration using rodio
//!
//! Plays samples from the shared ring buffer on the system audio device,
//! returning silence on underrun so the stream never stalls the emulation.

use crate::Result;
use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Audio source that reads from the ring buffer
struct RingBufferSource {
    ring_buffer: Arc<parking_lot::Mutex<super::RingBuffer>>,
    sample_rate: u32,
    channels: u16,
    finished: Arc<AtomicBool>,
    /// Internal buffer for batch reads (reduces lock contention)
    buffer: Vec<f32>,
    buffer_pos: usize,
}

impl RingBufferSource {
    fn new(
        ring_buffer: Arc<parking_lot::Mutex<super::RingBuffer>>,
        sample_rate: u32,
        channels: u16,
        finished: Arc<AtomicBool>,
    ) -> Self {
        RingBufferSource {
            ring_buffer,
            sample_rate,
            channels,
            finished,
            buffer: vec![0.0f32; 1024],
            buffer_pos: 1024, // Start by reading a fresh batch
        }
    }
}

impl Source for RingBufferSource {
    fn current_frame_len(&self) -> Option<usize> {
        let available = self.ring_buffer.lock().available_read();
        if available > 0 {
            Some(available)
        } else {
            Some(self.buffer.len())
        }
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for RingBufferSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.finished.load(Ordering::Relaxed) {
            return None;
        }

        if self.buffer_pos >= self.buffer.len() {
            let read = self.ring_buffer.lock().read(&mut self.buffer);
            self.buffer_pos = 0;
            if read == 0 {
                // Underrun: keep the stream alive with silence
                self.buffer.fill(0.0);
            } else if read < self.buffer.len() {
                self.buffer[read..].fill(0.0);
            }
        }

        let sample = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Some(sample)
    }
}

/// Audio playback device using rodio
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    finished: Arc<AtomicBool>,
}

impl AudioDevice {
    /// Create a new audio device and start playback
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `channels` - Number of audio channels
    /// * `ring_buffer` - Shared buffer the emulation thread writes into
    ///
    /// # Errors
    ///
    /// Returns [`crate::Vrc7Error::AudioDeviceError`] when no output device
    /// is available.
    pub fn new(
        sample_rate: u32,
        channels: u16,
        ring_buffer: Arc<parking_lot::Mutex<super::RingBuffer>>,
    ) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| crate::Vrc7Error::AudioDeviceError(format!("failed to open stream: {e}")))?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| crate::Vrc7Error::AudioDeviceError(format!("failed to create sink: {e}")))?;

        let finished = Arc::new(AtomicBool::new(false));
        let source = RingBufferSource::new(ring_buffer, sample_rate, channels, Arc::clone(&finished));
        sink.append(source);

        Ok(AudioDevice {
            _stream: stream,
            sink,
            finished,
        })
    }

    /// Pause playback
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self.sink.play();
    }

    /// Signal that no more samples will be produced
    ///
    /// Lets the playback stream terminate instead of playing silence forever.
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }

    /// Block until the sink has drained
    pub fn wait_for_finish(&self) {
        self.sink.sleep_until_end();
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.pause();
        self.finished.store(true, Ordering::Relaxed);
    }
}
