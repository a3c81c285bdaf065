//! Instrument patch definitions
//!
//! A patch describes one FM instrument: the feedback and attenuation of the
//! voice plus the per-operator oscillator and envelope parameters. The chip
//! holds 16 patches; patch 0 is the user instrument written through registers
//! 0x00-0x07, patches 1-15 mirror one of the built-in ROM banks.
//!
//! Patches marshal losslessly to and from the chip's 8-byte register image,
//! which is also the layout of the built-in bank data.

use std::fmt;

/// Operator role within a channel
///
/// Each channel drives two operators: the modulator feeds the carrier's phase,
/// the carrier produces the audible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Phase-modulating operator, optionally fed back into itself
    Modulator = 0,
    /// Audible operator, phase-modulated by the modulator
    Carrier = 1,
}

impl Role {
    /// Index into per-role parameter arrays
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Modulator => write!(f, "modulator"),
            Role::Carrier => write!(f, "carrier"),
        }
    }
}

/// One FM instrument definition
///
/// Per-role fields are `[modulator, carrier]` pairs indexed by
/// [`Role::index`]. All fields are stored pre-masked to their register widths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Patch {
    /// Modulator self-feedback strength (0-7, 0 disables feedback)
    pub feedback: u8,
    /// Modulator attenuation (0-63)
    pub total_level: u8,
    /// Frequency multiplier index (0-15)
    pub mult: [u8; 2],
    /// Pitch modulation (FM LFO) enable
    pub vibrato: [bool; 2],
    /// Amplitude modulation (AM LFO) enable
    pub tremolo: [bool; 2],
    /// Sustained tone flag (holds the envelope at the sustain level)
    pub sustained: [bool; 2],
    /// Half-wave rectified output
    pub rect: [bool; 2],
    /// Key-scale-rate flag (full pitch-dependent envelope speedup)
    pub key_scale_rate: [bool; 2],
    /// Key-scale-level selector (0-3)
    pub key_scale_level: [u8; 2],
    /// Envelope attack rate (0-15)
    pub attack_rate: [u8; 2],
    /// Envelope decay rate (0-15)
    pub decay_rate: [u8; 2],
    /// Envelope sustain level (0-15)
    pub sustain_level: [u8; 2],
    /// Envelope release rate (0-15)
    pub release_rate: [u8; 2],
}

impl Patch {
    /// Decode a patch from its 8-byte register image
    ///
    /// The layout matches registers 0x00-0x07 of the user instrument and the
    /// rows of the built-in instrument ROM.
    pub fn from_registers(reg: &[u8; 8]) -> Self {
        const MOD: usize = Role::Modulator.index();
        const CAR: usize = Role::Carrier.index();

        let mut patch = Patch {
            total_level: reg[2] & 0x3f,
            feedback: reg[3] & 0x07,
            ..Patch::default()
        };

        patch.mult[MOD] = reg[0] & 0x0f;
        patch.key_scale_rate[MOD] = reg[0] & 0x10 != 0;
        patch.sustained[MOD] = reg[0] & 0x20 != 0;
        patch.vibrato[MOD] = reg[0] & 0x40 != 0;
        patch.tremolo[MOD] = reg[0] & 0x80 != 0;

        patch.key_scale_level[MOD] = reg[2] >> 6;
        patch.rect[MOD] = reg[3] & 0x08 != 0;

        patch.attack_rate[MOD] = reg[4] >> 4;
        patch.decay_rate[MOD] = reg[4] & 0x0f;
        patch.sustain_level[MOD] = reg[6] >> 4;
        patch.release_rate[MOD] = reg[6] & 0x0f;

        patch.mult[CAR] = reg[1] & 0x0f;
        patch.key_scale_rate[CAR] = reg[1] & 0x10 != 0;
        patch.sustained[CAR] = reg[1] & 0x20 != 0;
        patch.vibrato[CAR] = reg[1] & 0x40 != 0;
        patch.tremolo[CAR] = reg[1] & 0x80 != 0;

        patch.rect[CAR] = reg[3] & 0x10 != 0;
        patch.key_scale_level[CAR] = reg[3] >> 6;

        patch.attack_rate[CAR] = reg[5] >> 4;
        patch.decay_rate[CAR] = reg[5] & 0x0f;
        patch.sustain_level[CAR] = reg[7] >> 4;
        patch.release_rate[CAR] = reg[7] & 0x0f;

        patch
    }

    /// Encode this patch into its 8-byte register image
    pub fn to_registers(&self) -> [u8; 8] {
        const MOD: usize = Role::Modulator.index();
        const CAR: usize = Role::Carrier.index();

        let mut reg = [0u8; 8];

        reg[0] = self.mult[MOD]
            | if self.key_scale_rate[MOD] { 0x10 } else { 0 }
            | if self.sustained[MOD] { 0x20 } else { 0 }
            | if self.vibrato[MOD] { 0x40 } else { 0 }
            | if self.tremolo[MOD] { 0x80 } else { 0 };

        reg[1] = self.mult[CAR]
            | if self.key_scale_rate[CAR] { 0x10 } else { 0 }
            | if self.sustained[CAR] { 0x20 } else { 0 }
            | if self.vibrato[CAR] { 0x40 } else { 0 }
            | if self.tremolo[CAR] { 0x80 } else { 0 };

        reg[2] = self.total_level | self.key_scale_level[MOD] << 6;

        reg[3] = self.feedback
            | if self.rect[MOD] { 0x08 } else { 0 }
            | if self.rect[CAR] { 0x10 } else { 0 }
            | self.key_scale_level[CAR] << 6;

        reg[4] = self.decay_rate[MOD] | self.attack_rate[MOD] << 4;
        reg[5] = self.decay_rate[CAR] | self.attack_rate[CAR] << 4;
        reg[6] = self.release_rate[MOD] | self.sustain_level[MOD] << 4;
        reg[7] = self.release_rate[CAR] | self.sustain_level[CAR] << 4;

        reg
    }
}
