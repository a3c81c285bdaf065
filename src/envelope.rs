//! Envelope generator
//!
//! Each operator carries a 4-stage envelope state machine (attack, decay,
//! release, damping) whose 7-bit attenuation value is advanced once per
//! multiplex step. The hardware derives its envelope timing from a global
//! counter chain rather than per-operator dividers, which quantizes the
//! effective rates in a characteristic way: a step only fires when the
//! operator's rate lines up with the run of trailing zero bits in the global
//! envelope counter, with the 2-bit mini counter and a small rate/phase table
//! filling in the fractional rates.
//!
//! The attenuation update itself is the hardware's adder trick
//! `value = !((0x7f ^ value) + inc + 1) & 0x7f`, which is not equivalent to
//! plain subtraction at the boundaries and must stay in this form.

use crate::channel::Slot;
use crate::patch::{Patch, Role};

/// Damping rate while a freshly triggered note clears the previous one
const DAMPING_RATE: u8 = 12;
/// Release rate override for a released note with the channel sustain flag on
const SUSTAINED_RATE: u8 = 5;
/// Release rate override for a released non-sustained (percussive) voice
const PERCUSSIVE_RATE: u8 = 7;

/// Envelope state machine stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnvelopeStage {
    /// Attenuation falling toward 0 after a note-on
    Attack,
    /// Attenuation rising until the sustain level is reached
    Decay,
    /// Below the sustain level with the trigger still on
    Release,
    /// Trigger off, or silencing the old note before a restart
    Damping,
}

/// Global envelope clock chain
///
/// Shared by all 12 operators and advanced exactly once per hardware tick.
/// `zero_count` caches the run length of trailing zero bits in `counter`
/// plus one, saturating to 0 past 13 - the quantity the rate comparison in
/// [`advance`] works against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnvelopeClocks {
    /// Free-running envelope counter
    pub counter: u32,
    /// Trailing-zero run of `counter`, offset and capped as the die does
    pub zero_count: u32,
    /// 2-bit prescaler for `counter`
    pub mini_counter: u8,
}

impl EnvelopeClocks {
    pub fn new() -> Self {
        EnvelopeClocks {
            counter: 0,
            zero_count: 0,
            mini_counter: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = EnvelopeClocks::new();
    }

    /// Advance the clock chain by one tick
    pub fn advance(&mut self) {
        self.mini_counter = (self.mini_counter + 1) & 3;
        if self.mini_counter == 0 {
            self.counter = self.counter.wrapping_add(1);
        }

        self.zero_count = 1;
        let mut remaining = self.counter;
        for _ in 0..13 {
            if remaining & 1 == 0 {
                self.zero_count += 1;
                remaining >>= 1;
            } else {
                break;
            }
        }
        if self.zero_count > 13 {
            self.zero_count = 0;
        }
    }
}

/// Fractional-rate pattern table, indexed by (rate_low, counter & 3)
const ENV_TABLE: [[bool; 4]; 4] = [
    [false, false, false, false],
    [true, false, false, false],
    [true, false, true, false],
    [true, true, true, false],
];

/// Advance one slot's envelope by a single step
///
/// `trigger`/`sustain` are the owning channel's flags, `octave`/`fnum` its
/// pitch (for key-scale-rate). Returns the post-update attenuation value.
#[allow(clippy::too_many_arguments)]
pub(crate) fn advance(
    slot: &mut Slot,
    patch: &Patch,
    role: Role,
    trigger: bool,
    sustain: bool,
    octave: u8,
    fnum: u16,
    clocks: &EnvelopeClocks,
) -> u8 {
    let op = role.index();

    let mut ksr = (octave << 1) + (fnum >> 8) as u8;
    if !patch.key_scale_rate[op] {
        ksr >>= 2;
    }
    let rate_low = ksr & 0b11;

    let mut rate_high = match slot.env_stage {
        EnvelopeStage::Attack => patch.attack_rate[op],
        EnvelopeStage::Decay => patch.decay_rate[op],
        EnvelopeStage::Release => {
            if patch.sustained[op] {
                0
            } else {
                patch.release_rate[op]
            }
        }
        EnvelopeStage::Damping => {
            if trigger {
                // New note has started, get the envelope ready
                DAMPING_RATE
            } else if sustain {
                SUSTAINED_RATE
            } else if !patch.sustained[op] {
                PERCUSSIVE_RATE
            } else {
                patch.release_rate[op]
            }
        }
    };

    rate_high = (rate_high + (ksr >> 2)).min(15);

    // Does this tick line up with the quantized global clock?
    let mut clock_envelope = false;
    if rate_high != 0 && rate_high < 12 {
        let aligned = u32::from(rate_high) + clocks.zero_count;
        if aligned == 12 {
            clock_envelope = true;
        } else if aligned == 13 && rate_low & 0b10 != 0 {
            clock_envelope = true;
        } else if aligned == 14 && rate_low & 0b01 != 0 {
            clock_envelope = true;
        }
    }

    let env_table = ENV_TABLE[rate_low as usize][(clocks.counter & 3) as usize];
    let mini_zero = clocks.mini_counter == 0;
    let mini_even = clocks.mini_counter & 1 == 0;

    // Four provisional increments; outside the attack stage they are no-ops
    let in_attack = slot.env_stage == EnvelopeStage::Attack;
    let value = i32::from(slot.env_value);
    let mut inc1 = if in_attack { value >> 1 } else { 0x7f };
    let mut inc2 = if in_attack { value >> 2 } else { 0x7f };
    let inc3 = if in_attack { value >> 3 } else { 0x7f };
    let inc4 = if in_attack { value >> 4 } else { 0x7f };
    if slot.env_enabled {
        inc1 &= 0b111_1101;
        inc2 &= 0b111_1110;
    }

    // Select the increment through the hardware's masking chain
    let mut env_inc = 0x7f;

    if clock_envelope || (!env_table && rate_high == 12) {
        env_inc &= inc4;
    }

    if (!env_table && rate_high == 13) || (env_table && rate_high == 12) {
        env_inc &= inc3;
    }

    if (clock_envelope && mini_zero && slot.env_enabled)
        || (rate_high == 14 && !env_table)
        || (rate_high == 13 && env_table)
        || (rate_high == 13 && !env_table && mini_even && slot.env_enabled)
        || (rate_high == 12 && !env_table && mini_zero && slot.env_enabled)
        || (rate_high == 12 && env_table && mini_even && slot.env_enabled)
    {
        env_inc &= inc2;
    }

    if rate_high == 15 || (rate_high == 14 && env_table) {
        env_inc &= inc1;
    }

    slot.env_value =
        (!((0x7fu32 ^ u32::from(slot.env_value)) + env_inc as u32 + 1) & 0x7f) as u8;

    // Stage transitions, in the hardware's check order.
    if slot.restart_env {
        slot.env_enabled = true;
        slot.env_stage = EnvelopeStage::Damping;
        slot.restart_env = false;
    }

    // Rate 15 skips the attack stage entirely
    if slot.env_stage == EnvelopeStage::Attack && rate_high == 15 {
        slot.env_value = 0;
        slot.env_stage = EnvelopeStage::Decay;
    }

    if slot.env_stage == EnvelopeStage::Attack && slot.env_value == 0 {
        slot.env_stage = EnvelopeStage::Decay;
    }

    if slot.env_stage == EnvelopeStage::Damping && slot.env_value >= 0x7c {
        slot.env_stage = EnvelopeStage::Attack;
    }

    if slot.env_stage == EnvelopeStage::Decay
        && slot.env_value >> 3 == patch.sustain_level[op]
    {
        slot.env_stage = EnvelopeStage::Release;
    }

    // Trigger off releases the slot, except a sustained modulator keeps
    // running so the carrier's release keeps its timbre
    if !trigger && !(role == Role::Modulator && patch.sustained[Role::Modulator.index()]) {
        slot.env_stage = EnvelopeStage::Damping;
        slot.env_enabled = true;
    }

    if (slot.env_stage == EnvelopeStage::Release || slot.env_stage == EnvelopeStage::Damping)
        && slot.env_value >= 0x7c
    {
        slot.env_enabled = false;
    }

    slot.env_value
}
