//! Scenario tests driving the chip through its public register interface

use approx::assert_relative_eq;
use vrc7::{Patch, PatchSet, Vrc7};

/// Configure channel 0 with a bank instrument and trigger a note
fn play_note(chip: &mut Vrc7) {
    chip.write_register(0x30, 0x10); // instrument 1, loudest volume
    chip.write_register(0x10, 0xac); // fNum low byte
    chip.write_register(0x20, 0x14); // octave 2, trigger on
}

#[test]
fn fresh_chip_emits_silence() {
    let mut chip = Vrc7::new();
    let mut samples = vec![0i16; 10_000];
    chip.fetch_samples_into(&mut samples);
    assert!(samples.iter().all(|&s| s == 0));
}

#[test]
fn note_on_ramps_up_and_sustains() {
    let mut chip = Vrc7::new();
    play_note(&mut chip);

    // 0.3s of audio at the default 48 kHz
    let mut samples = vec![0i16; 14_400];
    chip.fetch_samples_into(&mut samples);

    assert!(samples.iter().any(|&s| s != 0), "no audible output");

    // The attack should make the tail window louder than the onset window
    let energy = |window: &[i16]| -> i64 { window.iter().map(|&s| i64::from(s).abs()).sum() };
    let onset = energy(&samples[..2400]);
    let tail = energy(&samples[9600..12000]);
    assert!(
        tail > onset,
        "attack ramp not visible: onset energy {onset}, tail energy {tail}"
    );
}

#[test]
fn releasing_the_trigger_fades_out() {
    let mut chip = Vrc7::new();
    play_note(&mut chip);
    let mut held = vec![0i16; 24_000];
    chip.fetch_samples_into(&mut held);

    // Trigger off, same pitch
    chip.write_register(0x20, 0x04);
    let mut tail = vec![0i16; 48_000];
    chip.fetch_samples_into(&mut tail);

    // The envelope parks just short of full attenuation, so compare energy
    // instead of expecting exact zeros
    let peak = |window: &[i16]| -> i64 {
        window.iter().map(|&s| i64::from(s).abs()).max().unwrap_or(0)
    };
    let sustained = peak(&held[12_000..]);
    let released = peak(&tail[36_000..]);
    assert!(
        released * 8 < sustained,
        "release never decayed: sustained peak {sustained}, released peak {released}"
    );
}

#[test]
fn identical_write_sequences_are_bit_identical() {
    let run = |rate: f64| {
        let mut chip = Vrc7::with_rates(3_579_545.0, rate).unwrap();
        chip.set_patch_set(PatchSet::Rw);
        play_note(&mut chip);
        chip.write_register(0x31, 0x45);
        chip.write_register(0x11, 0x22);
        chip.write_register(0x21, 0x1c);
        let mut samples = vec![0i16; 8192];
        chip.fetch_samples_into(&mut samples);
        samples
    };
    assert_eq!(run(44_100.0), run(44_100.0));
    // Different output rates resample the same tick stream differently
    assert_ne!(run(44_100.0), run(22_050.0));
}

#[test]
fn reset_after_reset_changes_nothing() {
    let collect = |chip: &mut Vrc7| {
        play_note(chip);
        let mut samples = vec![0i16; 4096];
        chip.fetch_samples_into(&mut samples);
        samples
    };

    let mut once = Vrc7::new();
    collect(&mut once);
    once.reset();

    let mut twice = Vrc7::new();
    collect(&mut twice);
    twice.reset();
    twice.reset();

    assert_eq!(collect(&mut once), collect(&mut twice));
}

#[test]
fn reset_restores_power_on_defaults() {
    let mut chip = Vrc7::with_rates(3_546_893.0, 44_100.0).unwrap();
    chip.set_patch_set(PatchSet::Kt1);
    chip.write_register(0x02, 0x3f);
    chip.reset();

    assert_relative_eq!(chip.clock_rate(), 3_579_545.0);
    assert_relative_eq!(chip.sample_rate(), 48_000.0);
    assert_eq!(chip.patch_set(), PatchSet::Nuke);
    assert_eq!(chip.patch(0), Some(&Patch::default()));
}

#[test]
fn muted_channel_is_inaudible_but_alive() {
    let mut chip = Vrc7::new();
    play_note(&mut chip);
    chip.set_channel_mute(0, true);

    let mut samples = vec![0i16; 9600];
    chip.fetch_samples_into(&mut samples);
    assert!(samples.iter().all(|&s| s == 0), "muted channel leaked output");

    // The envelope kept running while muted: unmuting mid-note resumes a
    // sustained tone, not a fresh attack
    chip.set_channel_mute(0, false);
    let mut resumed = vec![0i16; 4800];
    chip.fetch_samples_into(&mut resumed);
    assert!(resumed.iter().any(|&s| s != 0));
}

#[test]
fn every_bank_loads_deterministically() {
    for index in 0..9 {
        let set = PatchSet::from_index(index).unwrap();

        let mut a = Vrc7::new();
        let mut b = Vrc7::new();
        a.set_patch_set(set);
        b.set_patch_set(set);

        for slot in 1..16 {
            assert_eq!(a.patch(slot), b.patch(slot));
        }
        assert_eq!(a.patch(0), Some(&Patch::default()));
    }
}

#[test]
fn register_image_round_trip_covers_field_widths() {
    // Exercise every field width boundary through the marshalling API
    let mut patch = Patch::default();
    patch.feedback = 7;
    patch.total_level = 63;
    patch.mult = [15, 15];
    patch.vibrato = [true, true];
    patch.tremolo = [true, true];
    patch.sustained = [true, true];
    patch.rect = [true, true];
    patch.key_scale_rate = [true, true];
    patch.key_scale_level = [3, 3];
    patch.attack_rate = [15, 15];
    patch.decay_rate = [15, 15];
    patch.sustain_level = [15, 15];
    patch.release_rate = [15, 15];

    assert_eq!(Patch::from_registers(&patch.to_registers()), patch);
    assert_eq!(Patch::from_registers(&[0; 8]), Patch::default());
}

#[test]
fn custom_rates_are_applied() {
    let chip = Vrc7::with_rates(3_546_893.0, 44_100.0).unwrap();
    assert_relative_eq!(chip.clock_rate(), 3_546_893.0);
    assert_relative_eq!(chip.sample_rate(), 44_100.0);

    assert!(Vrc7::with_rates(0.0, 44_100.0).is_err());
    assert!(Vrc7::with_rates(3_579_545.0, -8.0).is_err());
}
