//! Synthesis lookup tables
//!
//! The chip performs all operator math in the logarithmic domain using two
//! small ROMs: a quarter-wave log-sine table and a fast-exponential table that
//! converts attenuated log values back to linear samples. Both are generated
//! here with the exact rounding the die implements; every operator evaluation
//! depends on these values being bit-identical, not merely close.
//!
//! The tables are process-wide, built once on first use and shared read-only
//! by every engine instance.

use std::f64::consts::PI;
use std::sync::OnceLock;

/// Log-sine table length (one quarter wave)
pub const LOGSIN_TABLE_LEN: usize = 256;

/// Fast-exponential table length (4-bit shift x 8-bit mantissa)
pub const FAST_EXP_TABLE_LEN: usize = 4096;

/// Shared synthesis tables
///
/// `logsin[i]` holds `round(-log2(sin((i + 0.5) * PI / 512)) * 256)` for the
/// first quarter of a sine period. `fast_exp` is indexed by a 12-bit
/// attenuation value whose top 4 bits select a right shift and whose low
/// 8 bits (complemented) select an exponent mantissa; entries with a shift
/// above 12 are zero.
pub struct SynthTables {
    /// Quarter-wave log-sine ROM
    pub logsin: [u32; LOGSIN_TABLE_LEN],
    /// Attenuation-to-linear ROM
    pub fast_exp: [u16; FAST_EXP_TABLE_LEN],
}

impl SynthTables {
    fn build() -> Self {
        let mut logsin = [0u32; LOGSIN_TABLE_LEN];
        let mut exp = [0i32; LOGSIN_TABLE_LEN];

        for i in 0..LOGSIN_TABLE_LEN {
            let angle = (i as f64 + 0.5) * PI / 512.0;
            logsin[i] = (-angle.sin().log2() * 256.0).round() as u32;
            exp[i] = ((2f64.powf(i as f64 / 256.0) - 1.0) * 1024.0).round() as i32;
        }

        let mut fast_exp = [0u16; FAST_EXP_TABLE_LEN];
        for (i, entry) in fast_exp.iter_mut().enumerate() {
            let shift = i >> 8;
            let index = !i & 0xff;
            if shift > 12 {
                *entry = 0;
            } else {
                let linear = (exp[index] + 1024) >> shift;
                *entry = (linear & 0x7ff) as u16;
            }
        }

        SynthTables { logsin, fast_exp }
    }
}

/// Static table storage - initialized once per process
static TABLES: OnceLock<SynthTables> = OnceLock::new();

/// Get the shared synthesis tables, building them on first call
pub fn synth_tables() -> &'static SynthTables {
    TABLES.get_or_init(SynthTables::build)
}
