//! WAV file export functionality

use crate::{Result, Vrc7};
use std::path::Path;

/// Render chip output to a 16-bit mono WAV file
///
/// Fetches `sample_count` samples from the chip at its configured sample rate
/// and writes them out. The chip keeps whatever register state the caller set
/// up; rendering advances it like any other fetch.
///
/// # Arguments
///
/// * `chip` - Configured chip instance (rendered from its current state)
/// * `sample_count` - Number of output samples to render
/// * `output_path` - Path where the WAV file will be written
///
/// # Examples
///
/// ```no_run
/// use vrc7::{export::export_to_wav, Vrc7};
///
/// # fn main() -> vrc7::Result<()> {
/// let mut chip = Vrc7::new();
/// chip.write_register(0x30, 0x10);
/// chip.write_register(0x10, 0xac);
/// chip.write_register(0x20, 0x14);
/// export_to_wav(&mut chip, 48_000, "note.wav")?;
/// # Ok(())
/// # }
/// ```
pub fn export_to_wav<P: AsRef<Path>>(
    chip: &mut Vrc7,
    sample_count: usize,
    output_path: P,
) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: chip.sample_rate() as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(output_path.as_ref(), spec)
        .map_err(|e| crate::Vrc7Error::AudioFileError(format!("failed to create WAV file: {e}")))?;

    for _ in 0..sample_count {
        writer
            .write_sample(chip.fetch_sample())
            .map_err(|e| crate::Vrc7Error::AudioFileError(format!("failed to write sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| crate::Vrc7Error::AudioFileError(format!("failed to finalize WAV file: {e}")))?;

    Ok(())
}
