//! VRC7 FM Sound Chip Emulator
//!
//! A sample-accurate emulator of the Konami VRC7 audio expansion (an
//! OPLL/YM2413-derivative 2-operator FM chip with 6 melodic channels), as used
//! in the Famicom release of Lagrange Point. The emulation reproduces the
//! hardware's internal timing: every tick evaluates the chip's fixed 18-step
//! operator multiplex schedule, envelope rates carry the hardware's
//! rate-quantization artifacts, and the analog output stage is modeled by the
//! same RC filter the console mod board uses.
//!
//! # Features
//! - All 6 FM channels with modulator/carrier operator pairs
//! - Hardware-faithful 4-stage envelope generator (attack/decay/release/damping)
//! - Log-sine and fast-exponential table synthesis identical to the die
//! - 9 selectable built-in instrument banks plus the user-writable patch
//! - RC reconstruction filter and fractional resampling to any output rate
//! - Per-channel muting without disturbing internal state
//!
//! # Crate feature flags
//! - `streaming` (opt-in): Real-time audio output (enables optional `rodio` dep)
//! - `export-wav` (opt-in): WAV file rendering (enables optional `hound` dep)
//! - `test-register` (opt-in): The chip's TEST register at address 0x0f; its
//!   semantics are approximate and it is not part of normal operation
//!
//! # Quick start
//! ```
//! use vrc7::Vrc7;
//!
//! let mut chip = Vrc7::new();
//! chip.write_register(0x30, 0x20); // Channel 0: instrument 2, full volume
//! chip.write_register(0x10, 0xac); // Channel 0: fNum low bits
//! chip.write_register(0x20, 0x14); // Channel 0: octave 2, trigger on
//! let sample: i16 = chip.fetch_sample();
//! ```

#![warn(missing_docs)]

mod bank;
mod channel;
mod chip;
mod envelope;
mod operator;
mod patch;
mod tables;

#[cfg(feature = "export-wav")]
pub mod export; // WAV rendering

#[cfg(feature = "streaming")]
pub mod streaming; // Audio Output & Streaming

/// Error types for VRC7 emulator operations
#[derive(thiserror::Error, Debug)]
pub enum Vrc7Error {
    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// Audio file write error
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Vrc7Error {
    /// Converts a String into `Vrc7Error::Other`.
    ///
    /// Convenience conversion for generic string errors. Prefer the specific
    /// variant constructors (`ConfigError`, `AudioDeviceError`, ...) when the
    /// error category is known.
    fn from(msg: String) -> Self {
        Vrc7Error::Other(msg)
    }
}

impl From<&str> for Vrc7Error {
    /// Converts a string slice into `Vrc7Error::Other`.
    fn from(msg: &str) -> Self {
        Vrc7Error::Other(msg.to_string())
    }
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, Vrc7Error>;

// Public API exports
pub use bank::PatchSet;
pub use chip::{ChannelMask, Vrc7, NUM_CHANNELS, NUM_PATCHES};
pub use patch::{Patch, Role};

#[cfg(feature = "test-register")]
pub use chip::TestFlags;

#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, RingBuffer, StreamConfig};
