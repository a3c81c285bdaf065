//! VRC7 chip emulation
//!
//! The engine root: owns the 6 channels and 16 patches, drives the fixed
//! 18-step operator multiplex once per hardware tick, filters the raw tick
//! buffer through the mod board's RC network and resamples the result to the
//! configured output rate.
//!
//! One hardware tick covers 72 internal clock periods (18 multiplex steps of
//! 4 clocks each), so at the stock 3.58 MHz crystal the chip produces
//! 49716 ticks of 72 samples per second; the fractional resampler maps those
//! onto whatever rate the caller asked for.

use crate::bank::{self, PatchSet};
use crate::channel::Channel;
use crate::envelope::{self, EnvelopeClocks};
use crate::operator;
use crate::patch::{Patch, Role};
use crate::tables::synth_tables;
use crate::{Result, Vrc7Error};

/// Number of FM voices
pub const NUM_CHANNELS: usize = 6;

/// Number of instrument slots (user patch + 15 bank instruments)
pub const NUM_PATCHES: usize = 16;

/// Operator evaluations per hardware tick
const MULTIPLEX_STEPS: usize = 18;

/// Raw samples produced per hardware tick
pub(crate) const SIGNAL_CHUNK_LENGTH: usize = 72;

/// Default crystal frequency (NTSC Famicom, Hz)
pub(crate) const DEFAULT_CLOCK_RATE: f64 = 3_579_545.0;

/// Default output sample rate (Hz)
pub(crate) const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

/// Output amplifier gain of the Lagrange Point mod board (1 + 240000/4300)
const AMPLIFIER_GAIN: f64 = 56.81395349;

/// Operator role evaluated at each multiplex step
const ROLE_SCHEDULE: [Role; MULTIPLEX_STEPS] = [
    Role::Modulator,
    Role::Modulator,
    Role::Carrier,
    Role::Carrier,
    Role::Carrier,
    Role::Modulator,
    Role::Modulator,
    Role::Modulator,
    Role::Carrier,
    Role::Carrier,
    Role::Carrier,
    Role::Modulator,
    Role::Modulator,
    Role::Modulator,
    Role::Carrier,
    Role::Carrier,
    Role::Carrier,
    Role::Modulator,
];

/// Channel evaluated at each multiplex step
///
/// Entries 6-8 address the die's unused rhythm slots; those steps only burn
/// time and advance the global clocks.
const CHANNEL_SCHEDULE: [usize; MULTIPLEX_STEPS] =
    [1, 2, 0, 1, 2, 3, 4, 5, 3, 4, 5, 6, 7, 8, 6, 7, 8, 0];

bitflags::bitflags! {
    /// Per-channel mute mask
    ///
    /// A set bit suppresses that voice's contribution to the output buffer
    /// without touching its internal envelope or phase state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChannelMask: u8 {
        /// Voice 0
        const CH0 = 1 << 0;
        /// Voice 1
        const CH1 = 1 << 1;
        /// Voice 2
        const CH2 = 1 << 2;
        /// Voice 3
        const CH3 = 1 << 3;
        /// Voice 4
        const CH4 = 1 << 4;
        /// Voice 5
        const CH5 = 1 << 5;
    }
}

#[cfg(feature = "test-register")]
bitflags::bitflags! {
    /// TEST register bits (address 0x0f)
    ///
    /// The hardware TEST register is not fully understood; these behaviors
    /// are approximations and exist for diagnostics only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TestFlags: u8 {
        /// Force every envelope output to 0 (loudest)
        const ENVELOPE = 1 << 0;
        /// Zero each operator's phase after evaluation
        const HALT_PHASE = 1 << 2;
        /// Hold the envelope counter and free-run the LFO counters
        const COUNTERS = 1 << 3;
    }
}

/// VRC7 FM sound chip emulator
///
/// The engine is a pure state machine: register writes mutate patch and
/// channel state synchronously, [`Vrc7::tick`] advances one hardware tick,
/// and [`Vrc7::fetch_sample`] pulls output samples, ticking internally as the
/// fractional cursor crosses chunk boundaries. All state is owned by the
/// instance; the two synthesis ROMs are process-wide and shared read-only
/// between instances.
///
/// # Example
///
/// ```
/// use vrc7::{PatchSet, Vrc7};
///
/// let mut chip = Vrc7::new();
/// chip.set_patch_set(PatchSet::Rw);
/// chip.write_register(0x30, 0x10); // channel 0: instrument 1, volume 0
/// chip.write_register(0x10, 0xac); // fNum low byte
/// chip.write_register(0x20, 0x14); // octave 2, trigger
/// let mut frame = [0i16; 128];
/// chip.fetch_samples_into(&mut frame);
/// ```
#[derive(Clone)]
pub struct Vrc7 {
    channels: [Channel; NUM_CHANNELS],
    patches: [Patch; NUM_PATCHES],

    /// Raw per-tick output, then the filtered chunk after `tick()` finishes
    signal: [i16; SIGNAL_CHUNK_LENGTH],

    // Clocking and resampling
    clock_rate: f64,
    sample_rate: f64,
    sample_length: f64,
    current_time: f64,

    // Global modulation state
    vibrato_counter: u32,
    tremolo_value: u32,
    tremolo_inc: i32,
    env_clocks: EnvelopeClocks,

    // Control surface
    patch_set: PatchSet,
    address: u8,
    channel_mask: ChannelMask,

    // Output filter
    fir_coeff: f64,
    iir_coeff: f64,
    filter_prev_input: f64,
    filter_prev_output: f64,

    #[cfg(feature = "test-register")]
    test_flags: TestFlags,
}

impl Vrc7 {
    /// Create a new chip with the default NTSC clock and 48 kHz output
    pub fn new() -> Self {
        // First construction in the process builds the shared ROMs
        let _ = synth_tables();

        let mut chip = Vrc7 {
            channels: [Channel::new(); NUM_CHANNELS],
            patches: [Patch::default(); NUM_PATCHES],
            signal: [0; SIGNAL_CHUNK_LENGTH],
            clock_rate: DEFAULT_CLOCK_RATE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            sample_length: 0.0,
            current_time: 0.0,
            vibrato_counter: 0,
            tremolo_value: 0,
            tremolo_inc: 1,
            env_clocks: EnvelopeClocks::new(),
            patch_set: PatchSet::Nuke,
            address: 0,
            channel_mask: ChannelMask::empty(),
            fir_coeff: 0.0,
            iir_coeff: 0.0,
            filter_prev_input: 0.0,
            filter_prev_output: 0.0,
            #[cfg(feature = "test-register")]
            test_flags: TestFlags::empty(),
        };
        chip.reset();
        chip
    }

    /// Create a new chip with custom clock and output rates
    ///
    /// # Arguments
    ///
    /// * `clock_rate` - Crystal frequency in Hz
    /// * `sample_rate` - Audio output sample rate in Hz
    ///
    /// # Errors
    ///
    /// Returns [`Vrc7Error::ConfigError`] when either rate is zero, negative
    /// or not finite.
    pub fn with_rates(clock_rate: f64, sample_rate: f64) -> Result<Self> {
        let mut chip = Self::new();
        chip.set_clock_rate(clock_rate)?;
        chip.set_sample_rate(sample_rate)?;
        Ok(chip)
    }

    /// Reset the chip to its power-on state
    ///
    /// Restores the default bank, clock and sample rates, clears every
    /// channel, slot and global counter, and unmutes all voices.
    pub fn reset(&mut self) {
        self.patches[0] = Patch::default();
        self.set_patch_set(PatchSet::Nuke);
        self.apply_clock_rate(DEFAULT_CLOCK_RATE);
        self.apply_sample_rate(DEFAULT_SAMPLE_RATE);

        self.vibrato_counter = 0;
        self.tremolo_value = 0;
        self.tremolo_inc = 1;
        self.env_clocks.reset();
        self.address = 0;
        self.channel_mask = ChannelMask::empty();

        self.signal = [0; SIGNAL_CHUNK_LENGTH];
        self.filter_prev_input = 0.0;
        self.filter_prev_output = 0.0;

        for channel in &mut self.channels {
            channel.reset();
        }

        #[cfg(feature = "test-register")]
        {
            self.test_flags = TestFlags::empty();
        }
    }

    /// Set the crystal frequency and recompute the filter coefficients
    ///
    /// # Errors
    ///
    /// Returns [`Vrc7Error::ConfigError`] for a rate that is zero, negative
    /// or not finite.
    pub fn set_clock_rate(&mut self, clock_rate: f64) -> Result<()> {
        if !clock_rate.is_finite() || clock_rate <= 0.0 {
            return Err(Vrc7Error::ConfigError(format!(
                "invalid clock rate: {clock_rate}"
            )));
        }
        self.apply_clock_rate(clock_rate);
        Ok(())
    }

    /// Set the output sample rate and recompute the resampling step
    ///
    /// Rewinds the fractional playback cursor to the start of the current
    /// chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Vrc7Error::ConfigError`] for a rate that is zero, negative
    /// or not finite.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Vrc7Error::ConfigError(format!(
                "invalid sample rate: {sample_rate}"
            )));
        }
        self.apply_sample_rate(sample_rate);
        Ok(())
    }

    fn apply_clock_rate(&mut self, clock_rate: f64) {
        self.clock_rate = clock_rate;
        // RC reconstruction network of the Lagrange Point mod board
        let alpha1 = 27000.0 + 33000.0;
        let alpha2 = 0.0047 * 27.0 * 33.0 * 2.0 * clock_rate;
        self.fir_coeff = 33000.0 / (alpha1 + alpha2);
        self.iir_coeff = -(alpha1 - alpha2) / (alpha1 + alpha2);
    }

    fn apply_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.sample_length = self.clock_rate / sample_rate;
        self.current_time = 0.0;
    }

    /// Current crystal frequency in Hz
    #[inline]
    pub fn clock_rate(&self) -> f64 {
        self.clock_rate
    }

    /// Current output sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Load one of the built-in instrument banks into patches 1-15
    ///
    /// The user patch (slot 0) is not touched.
    pub fn set_patch_set(&mut self, set: PatchSet) {
        for index in 1..NUM_PATCHES {
            self.patches[index] = bank::default_patch(set, index);
        }
        self.patch_set = set;
    }

    /// Currently selected built-in bank
    #[inline]
    pub fn patch_set(&self) -> PatchSet {
        self.patch_set
    }

    /// Inspect an instrument slot (0 = user patch)
    pub fn patch(&self, index: usize) -> Option<&Patch> {
        self.patches.get(index)
    }

    /// Latch the register address for the next data write
    pub fn write_addr(&mut self, addr: u8) {
        self.address = addr;
    }

    /// Write a data byte to the latched register address
    ///
    /// Writes to unmapped addresses or to channels the chip does not have are
    /// silently ignored, as on hardware.
    pub fn write_data(&mut self, data: u8) {
        #[cfg(feature = "test-register")]
        if self.test_flags.contains(TestFlags::COUNTERS) {
            // Approximation: the counter snaps rather than free-running at
            // the written rate
            self.env_clocks.counter = if data & 0x04 != 0 { 0xffff } else { 0 };
        }

        match self.address {
            0x00..=0x07 => self.write_user_patch(data),
            #[cfg(feature = "test-register")]
            0x0f => self.test_flags = TestFlags::from_bits_truncate(data),
            _ => self.write_channel(data),
        }
    }

    /// Latch an address and write its data byte in one call
    pub fn write_register(&mut self, addr: u8, data: u8) {
        self.write_addr(addr);
        self.write_data(data);
    }

    /// Decode a register 0x00-0x07 write into the user patch
    fn write_user_patch(&mut self, data: u8) {
        const MOD: usize = Role::Modulator.index();
        const CAR: usize = Role::Carrier.index();

        let patch = &mut self.patches[0];
        match self.address {
            0x00 | 0x01 => {
                let op = (self.address & 1) as usize;
                patch.mult[op] = data & 0x0f;
                patch.key_scale_rate[op] = data & 0x10 != 0;
                patch.sustained[op] = data & 0x20 != 0;
                patch.vibrato[op] = data & 0x40 != 0;
                patch.tremolo[op] = data & 0x80 != 0;
            }
            0x02 => {
                patch.total_level = data & 0x3f;
                patch.key_scale_level[MOD] = data >> 6;
            }
            0x03 => {
                patch.feedback = data & 0x07;
                patch.rect[MOD] = data & 0x08 != 0;
                patch.rect[CAR] = data & 0x10 != 0;
                patch.key_scale_level[CAR] = data >> 6;
            }
            0x04 | 0x05 => {
                let op = (self.address & 1) as usize;
                patch.attack_rate[op] = data >> 4;
                patch.decay_rate[op] = data & 0x0f;
            }
            0x06 | 0x07 => {
                let op = (self.address & 1) as usize;
                patch.sustain_level[op] = data >> 4;
                patch.release_rate[op] = data & 0x0f;
            }
            _ => {}
        }
    }

    /// Decode a 0x10-0x3f range write into channel state
    fn write_channel(&mut self, data: u8) {
        let channel_num = (self.address & 0x0f) as usize;
        if channel_num >= NUM_CHANNELS {
            return;
        }
        let channel = &mut self.channels[channel_num];

        match self.address & 0xf0 {
            0x10 => {
                channel.fnum = (channel.fnum & 0x100) | u16::from(data);
            }
            0x20 => {
                let prev_trigger = channel.trigger;
                channel.fnum = (channel.fnum & 0xff) | (u16::from(data & 0x01) << 8);
                channel.octave = (data >> 1) & 0x07;
                channel.trigger = data & 0x10 != 0;
                if channel.trigger && !prev_trigger {
                    channel.arm_restart();
                }
                channel.sustain = data & 0x20 != 0;
            }
            0x30 => {
                channel.volume = data & 0x0f;
                channel.instrument = data >> 4;
            }
            _ => {}
        }
    }

    /// Mute or unmute a voice
    ///
    /// Muting only suppresses the voice's buffer contribution; its envelope
    /// and phase keep evolving. Channel indices past the last voice are
    /// ignored.
    pub fn set_channel_mute(&mut self, channel: usize, mute: bool) {
        if channel >= NUM_CHANNELS {
            return;
        }
        let bit = ChannelMask::from_bits_truncate(1 << channel);
        self.channel_mask.set(bit, mute);
    }

    /// Check whether a voice is muted
    pub fn is_channel_muted(&self, channel: usize) -> bool {
        if channel >= NUM_CHANNELS {
            return false;
        }
        self.channel_mask
            .contains(ChannelMask::from_bits_truncate(1 << channel))
    }

    /// Replace the whole mute mask at once
    pub fn set_mute_mask(&mut self, mask: ChannelMask) {
        self.channel_mask = mask;
    }

    /// Current mute mask
    #[inline]
    pub fn mute_mask(&self) -> ChannelMask {
        self.channel_mask
    }

    /// Advance the vibrato counter and the reflected tremolo value
    fn step_vibrato_tremolo(&mut self) {
        self.vibrato_counter = (self.vibrato_counter + 1) & 0x1fff;

        if self.vibrato_counter & 0x3f == 0 {
            self.tremolo_value = self.tremolo_value.wrapping_add(self.tremolo_inc as u32);
            if self.tremolo_value >= 0x69 || self.tremolo_value == 0 {
                self.tremolo_inc = -self.tremolo_inc;
            }
        }
    }

    /// Evaluate one operator and return its log-domain sample
    fn update_slot(&mut self, channel_index: usize, role: Role) -> i32 {
        let op = role.index();
        let instrument = self.channels[channel_index].instrument as usize;
        let patch = &self.patches[instrument];
        let channel = &mut self.channels[channel_index];

        let fnum = channel.fnum;
        let octave = channel.octave;
        let trigger = channel.trigger;
        let sustain = channel.sustain;
        let channel_volume = channel.volume;

        let vibrato = operator::vibrato_offset(self.vibrato_counter, fnum, octave);
        let ksl_base = operator::key_scale_base(fnum, octave);

        let modulator_sample = channel.slots[Role::Modulator.index()].sample;
        let slot = &mut channel.slots[op];

        // Modulation source and volume base differ per role
        let (modulation, mut volume) = match role {
            Role::Carrier => (modulator_sample << 1, i32::from(channel_volume) << 3),
            Role::Modulator => (
                operator::feedback_modulation(slot.sample, slot.sample_prev, patch.feedback),
                i32::from(patch.total_level) << 1,
            ),
        };

        if patch.key_scale_level[op] != 0 {
            volume += operator::key_scale_term(ksl_base, patch.key_scale_level[op]);
        }

        if patch.tremolo[op] {
            volume += (self.tremolo_value >> 3) as i32;
        }

        let env_value = envelope::advance(
            slot,
            patch,
            role,
            trigger,
            sustain,
            octave,
            fnum,
            &self.env_clocks,
        );
        #[cfg(feature = "test-register")]
        let env_value = if self.test_flags.contains(TestFlags::ENVELOPE) {
            0
        } else {
            env_value
        };

        volume += i32::from(env_value);
        let volume = volume.min(0x7f) as u32;

        let mut output = operator::evaluate(slot.phase, modulation, volume, patch.rect[op]);
        // Full attenuation overrides the table lookup
        if env_value == 0x7f {
            output = 0;
        }
        slot.sample_prev = slot.sample;
        slot.sample = output;

        slot.phase = operator::step_phase(
            slot.phase,
            fnum,
            octave,
            patch.mult[op],
            if patch.vibrato[op] { vibrato } else { 0 },
        );

        output
    }

    /// Run one hardware tick
    ///
    /// Evaluates the full 18-step multiplex schedule (exactly one operator
    /// per step), advances the global LFO/envelope clocks at their fixed
    /// position in the schedule, then filters the chunk for output.
    pub fn tick(&mut self) {
        for step in 0..MULTIPLEX_STEPS {
            let base = step * 4;
            self.signal[base..base + 4].fill(0);

            let channel = CHANNEL_SCHEDULE[step];
            if channel < NUM_CHANNELS {
                let role = ROLE_SCHEDULE[step];
                let value = self.update_slot(channel, role);
                if role == Role::Carrier && !self.is_channel_muted(channel) {
                    self.signal[base] = (value >> 3) as i16;
                }
            }

            #[cfg(not(feature = "test-register"))]
            if step == 16 {
                self.step_vibrato_tremolo();
                self.env_clocks.advance();
            }

            #[cfg(feature = "test-register")]
            {
                if self.test_flags.contains(TestFlags::COUNTERS) {
                    self.step_vibrato_tremolo();
                } else if step == 16 {
                    self.step_vibrato_tremolo();
                    self.env_clocks.advance();
                }

                if self.test_flags.contains(TestFlags::HALT_PHASE) && channel < NUM_CHANNELS {
                    self.channels[channel].slots[ROLE_SCHEDULE[step].index()].phase = 0;
                }
            }
        }

        // RC filter and amplifier over the finished chunk
        for i in 0..SIGNAL_CHUNK_LENGTH {
            let output = self.filter_prev_input * self.fir_coeff
                + f64::from(self.signal[i]) * self.fir_coeff
                + self.filter_prev_output * self.iir_coeff;
            self.filter_prev_input = f64::from(self.signal[i]);
            self.filter_prev_output = output;

            self.signal[i] = (output * AMPLIFIER_GAIN * 256.0) as i16;
        }
    }

    /// Fetch the next output sample at the configured sample rate
    ///
    /// Transparently runs hardware ticks as the fractional cursor crosses
    /// chunk boundaries, so a fetch is not side-effect-free.
    pub fn fetch_sample(&mut self) -> i16 {
        while self.current_time >= SIGNAL_CHUNK_LENGTH as f64 {
            self.tick();
            self.current_time -= SIGNAL_CHUNK_LENGTH as f64;
        }
        let sample = self.signal[self.current_time as usize];
        self.current_time += self.sample_length;
        sample
    }

    /// Fill a buffer with output samples
    ///
    /// Equivalent to calling [`Vrc7::fetch_sample`] once per slot; prefer
    /// this in hot paths.
    pub fn fetch_samples_into(&mut self, buffer: &mut [i16]) {
        for sample in buffer.iter_mut() {
            *sample = self.fetch_sample();
        }
    }
}

impl Default for Vrc7 {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Vrc7 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vrc7")
            .field("clock_rate", &self.clock_rate)
            .field("sample_rate", &self.sample_rate)
            .field("patch_set", &self.patch_set)
            .field("channel_mask", &self.channel_mask)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeStage;

    /// Set up channel 0 with a bank instrument and a triggered note
    fn play_note(chip: &mut Vrc7) {
        chip.write_register(0x30, 0x10); // instrument 1, volume 0
        chip.write_register(0x10, 0xac); // fNum low
        chip.write_register(0x20, 0x14); // octave 2, trigger on
    }

    #[test]
    fn test_new_chip_has_default_rates() {
        let chip = Vrc7::new();
        assert_eq!(chip.clock_rate(), DEFAULT_CLOCK_RATE);
        assert_eq!(chip.sample_rate(), DEFAULT_SAMPLE_RATE);
        assert_eq!(chip.patch_set(), PatchSet::Nuke);
    }

    #[test]
    fn test_invalid_rates_are_rejected() {
        let mut chip = Vrc7::new();
        assert!(chip.set_clock_rate(0.0).is_err());
        assert!(chip.set_clock_rate(-1.0).is_err());
        assert!(chip.set_sample_rate(f64::NAN).is_err());
        assert!(chip.set_sample_rate(f64::INFINITY).is_err());
        assert!(chip.set_sample_rate(44_100.0).is_ok());
    }

    #[test]
    fn test_user_patch_register_decode() {
        let mut chip = Vrc7::new();
        chip.write_register(0x00, 0xf5); // mult 5, all modulator flags on
        chip.write_register(0x02, 0x6a); // total level 0x2a, mod ksl 1
        chip.write_register(0x03, 0x9d); // feedback 5, mod rect, ksl 2
        chip.write_register(0x04, 0xc3); // mod attack 12, decay 3
        chip.write_register(0x07, 0x81); // car sustain 8, release 1

        let patch = chip.patch(0).unwrap();
        let m = Role::Modulator.index();
        let c = Role::Carrier.index();
        assert_eq!(patch.mult[m], 5);
        assert!(patch.sustained[m]);
        assert!(patch.vibrato[m]);
        assert!(patch.tremolo[m]);
        assert_eq!(patch.total_level, 0x2a);
        assert_eq!(patch.key_scale_level[m], 1);
        assert_eq!(patch.feedback, 5);
        assert!(patch.rect[m]);
        assert!(patch.rect[c]);
        assert_eq!(patch.key_scale_level[c], 2);
        assert_eq!(patch.attack_rate[m], 12);
        assert_eq!(patch.decay_rate[m], 3);
        assert_eq!(patch.sustain_level[c], 8);
        assert_eq!(patch.release_rate[c], 1);
    }

    #[test]
    fn test_out_of_range_channel_writes_are_ignored() {
        let mut chip = Vrc7::new();
        let before = chip.clone();
        chip.write_register(0x16, 0xff);
        chip.write_register(0x29, 0xff);
        chip.write_register(0x3f, 0xff);
        chip.write_register(0x48, 0xff);
        for ch in 0..NUM_CHANNELS {
            assert_eq!(chip.channels[ch].fnum, before.channels[ch].fnum);
            assert_eq!(chip.channels[ch].volume, before.channels[ch].volume);
        }
    }

    #[test]
    fn test_trigger_edge_arms_restart() {
        let mut chip = Vrc7::new();
        chip.write_register(0x20, 0x10);
        assert!(chip.channels[0].slots[0].restart_env);
        assert!(chip.channels[0].slots[1].restart_env);

        // Level-holding writes do not re-arm
        chip.channels[0].slots[0].restart_env = false;
        chip.channels[0].slots[1].restart_env = false;
        chip.write_register(0x20, 0x10);
        assert!(!chip.channels[0].slots[0].restart_env);

        // A 1 -> 0 -> 1 sequence does
        chip.write_register(0x20, 0x00);
        chip.write_register(0x20, 0x10);
        assert!(chip.channels[0].slots[0].restart_env);
    }

    #[test]
    fn test_fresh_chip_is_silent() {
        let mut chip = Vrc7::new();
        for _ in 0..2000 {
            assert_eq!(chip.fetch_sample(), 0);
        }
    }

    #[test]
    fn test_note_on_produces_output() {
        let mut chip = Vrc7::new();
        play_note(&mut chip);

        let mut samples = vec![0i16; 48_000 / 10];
        chip.fetch_samples_into(&mut samples);
        assert!(
            samples.iter().any(|&s| s != 0),
            "triggered note produced no output"
        );
    }

    #[test]
    fn test_note_on_attack_ramp() {
        let mut chip = Vrc7::new();
        play_note(&mut chip);

        // Track the carrier envelope through the first attack
        let mut seen_attack = false;
        let mut values = Vec::new();
        for _ in 0..4000 {
            chip.tick();
            let slot = &chip.channels[0].slots[Role::Carrier.index()];
            if slot.env_stage == EnvelopeStage::Attack {
                seen_attack = true;
                values.push(slot.env_value);
            }
        }
        assert!(seen_attack, "carrier never entered the attack stage");
        assert!(
            values.windows(2).all(|w| w[1] <= w[0]),
            "attack values are not monotonically decreasing: {values:?}"
        );
    }

    #[test]
    fn test_phase_and_envelope_invariants() {
        let mut chip = Vrc7::new();
        play_note(&mut chip);
        chip.write_register(0x31, 0x23);
        chip.write_register(0x11, 0x57);
        chip.write_register(0x21, 0x1e);

        for tick in 0..20_000 {
            if tick == 10_000 {
                // Release halfway through
                chip.write_register(0x20, 0x04);
            }
            chip.tick();
            for channel in &chip.channels {
                for slot in &channel.slots {
                    assert!(slot.phase < 1 << 19);
                    assert!(slot.env_value <= 0x7f);
                }
            }
        }
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut chip = Vrc7::new();
            play_note(&mut chip);
            let mut samples = vec![0i16; 4096];
            chip.fetch_samples_into(&mut samples);
            samples
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut once = Vrc7::new();
        play_note(&mut once);
        once.fetch_samples_into(&mut [0i16; 1000]);
        once.reset();

        let mut twice = Vrc7::new();
        play_note(&mut twice);
        twice.fetch_samples_into(&mut [0i16; 1000]);
        twice.reset();
        twice.reset();

        let mut a = vec![0i16; 4096];
        let mut b = vec![0i16; 4096];
        play_note(&mut once);
        play_note(&mut twice);
        once.fetch_samples_into(&mut a);
        twice.fetch_samples_into(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mute_suppresses_output_only() {
        let mut muted = Vrc7::new();
        let mut open = Vrc7::new();
        play_note(&mut muted);
        play_note(&mut open);
        muted.set_channel_mute(0, true);

        for _ in 0..5000 {
            muted.tick();
            open.tick();
        }

        // Internal evolution is identical with and without the mute
        for op in 0..2 {
            let a = &muted.channels[0].slots[op];
            let b = &open.channels[0].slots[op];
            assert_eq!(a.phase, b.phase);
            assert_eq!(a.env_value, b.env_value);
            assert_eq!(a.env_stage, b.env_stage);
        }

        // Unmuting resumes, not restarts
        muted.set_channel_mute(0, false);
        muted.tick();
        open.tick();
        assert_eq!(
            muted.channels[0].slots[1].phase,
            open.channels[0].slots[1].phase
        );
    }

    #[test]
    fn test_muted_channel_produces_silence() {
        let mut chip = Vrc7::new();
        play_note(&mut chip);
        chip.set_channel_mute(0, true);

        let mut samples = vec![0i16; 48_000 / 10];
        chip.fetch_samples_into(&mut samples);
        assert!(samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_mute_mask_helpers() {
        let mut chip = Vrc7::new();
        assert!(!chip.is_channel_muted(0));
        chip.set_channel_mute(0, true);
        chip.set_channel_mute(5, true);
        assert!(chip.is_channel_muted(0));
        assert!(!chip.is_channel_muted(1));
        assert!(chip.is_channel_muted(5));
        assert_eq!(chip.mute_mask(), ChannelMask::CH0 | ChannelMask::CH5);

        // Out-of-range channels are ignored
        chip.set_channel_mute(9, true);
        assert!(!chip.is_channel_muted(9));

        chip.set_mute_mask(ChannelMask::empty());
        assert!(!chip.is_channel_muted(0));
    }

    #[test]
    fn test_bank_switch_leaves_user_patch() {
        let mut chip = Vrc7::new();
        chip.write_register(0x00, 0x21);
        chip.write_register(0x02, 0x3f);
        let user = *chip.patch(0).unwrap();

        chip.set_patch_set(PatchSet::Opll2413);
        assert_eq!(chip.patch(0).unwrap(), &user);
        assert_eq!(chip.patch_set(), PatchSet::Opll2413);

        // Patches 1-15 now mirror the selected bank
        for index in 1..NUM_PATCHES {
            let expected = crate::bank::default_patch(PatchSet::Opll2413, index);
            assert_eq!(chip.patch(index).unwrap(), &expected);
        }
    }

    #[test]
    fn test_sample_rate_change_rescales_step() {
        let mut chip = Vrc7::new();
        chip.set_sample_rate(24_000.0).unwrap();
        let coarse = chip.sample_length;
        chip.set_sample_rate(48_000.0).unwrap();
        assert!((coarse - chip.sample_length * 2.0).abs() < 1e-9);
    }
}
