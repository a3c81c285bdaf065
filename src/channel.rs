//! Per-voice run-time state
//!
//! A channel is one of the chip's 6 voices: the pitch, volume and instrument
//! registers plus the two operator slots it owns. Slots carry everything that
//! evolves tick to tick - the 19-bit phase accumulator, the envelope state
//! machine and the last two log-domain samples (the modulator feedback path
//! averages the current and previous output).

use crate::envelope::EnvelopeStage;
use crate::patch::Role;

/// One operator instance
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    /// Which half of the voice this slot drives
    pub role: Role,
    /// Most recent log-domain output sample
    pub sample: i32,
    /// Output sample from the evaluation before that
    pub sample_prev: i32,
    /// Phase accumulator, always kept within 19 bits
    pub phase: u32,
    /// Current envelope stage
    pub env_stage: EnvelopeStage,
    /// Envelope attenuation, 0 (loudest) to 0x7f (silent)
    pub env_value: u8,
    /// Whether the envelope increment path is active
    pub env_enabled: bool,
    /// One-shot flag armed by a note-on edge
    pub restart_env: bool,
}

impl Slot {
    pub fn new(role: Role) -> Self {
        Slot {
            role,
            sample: 0,
            sample_prev: 0,
            phase: 0,
            env_stage: EnvelopeStage::Release,
            env_value: 0x7f,
            env_enabled: false,
            restart_env: false,
        }
    }

    /// Return to the power-on state, keeping the role
    pub fn reset(&mut self) {
        *self = Slot::new(self.role);
    }
}

/// One of the six FM voices
#[derive(Debug, Clone, Copy)]
pub(crate) struct Channel {
    /// Instrument index; 0 selects the user patch
    pub instrument: u8,
    /// 9-bit frequency number
    pub fnum: u16,
    /// 3-bit octave (block)
    pub octave: u8,
    /// 4-bit volume attenuation
    pub volume: u8,
    /// Sustain flag (slows the release of a released note)
    pub sustain: bool,
    /// Note-on level; edges are detected at the register write
    pub trigger: bool,
    /// Modulator and carrier operator state
    pub slots: [Slot; 2],
}

impl Channel {
    pub fn new() -> Self {
        Channel {
            instrument: 0,
            fnum: 0,
            octave: 0,
            volume: 0,
            sustain: false,
            trigger: false,
            slots: [Slot::new(Role::Modulator), Slot::new(Role::Carrier)],
        }
    }

    /// Return the whole voice to the power-on state
    pub fn reset(&mut self) {
        *self = Channel::new();
    }

    /// Arm an envelope restart on both slots (note-on edge)
    pub fn arm_restart(&mut self) {
        self.slots[Role::Modulator.index()].restart_env = true;
        self.slots[Role::Carrier.index()].restart_env = true;
    }
}
