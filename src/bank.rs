//! Built-in instrument ROM banks
//!
//! The chip ships with 15 fixed instruments burned into its die; several
//! independent dumps and measurements of that ROM circulate, and different
//! player ecosystems standardized on different ones. The emulator carries all
//! nine data sets and lets the caller pick which one populates patches 1-15.
//!
//! Each bank row is the 8-byte register image of one instrument (row 0 is the
//! user patch slot and always empty). The byte tables are opaque constant
//! data; see [`Patch::from_registers`] for the field layout.

use crate::patch::Patch;
use std::fmt;

/// Number of selectable built-in instrument banks
pub const NUM_PATCH_SETS: usize = 9;

/// Built-in instrument bank selector
///
/// Banks 0-6 are VRC7 ROM dumps and measurements of varying provenance;
/// the last two are the instrument sets of the related OPLL chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchSet {
    /// Die-shot ROM read (Nuke.YKT) - the default and most accurate set
    Nuke = 0,
    /// Audio-measurement set (rainwarrior, 2012)
    Rw = 1,
    /// FamiTracker 0.3.6 set
    Ft36 = 2,
    /// FamiTracker 0.3.5 set
    Ft35 = 3,
    /// Early emulator estimate (Mitsutaka Okazaki)
    Mo = 4,
    /// Second logic-analyzer capture (kevtris)
    Kt2 = 5,
    /// First logic-analyzer capture (kevtris, 1999)
    Kt1 = 6,
    /// YM2413 (OPLL) factory instruments
    Opll2413 = 7,
    /// YMF281B (OPLLP) factory instruments
    Opll281b = 8,
}

impl PatchSet {
    /// Create from a bank index (0-8)
    ///
    /// Returns `None` for indices outside the bank table.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PatchSet::Nuke),
            1 => Some(PatchSet::Rw),
            2 => Some(PatchSet::Ft36),
            3 => Some(PatchSet::Ft35),
            4 => Some(PatchSet::Mo),
            5 => Some(PatchSet::Kt2),
            6 => Some(PatchSet::Kt1),
            7 => Some(PatchSet::Opll2413),
            8 => Some(PatchSet::Opll281b),
            _ => None,
        }
    }

    /// Bank index of this set (0-8)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchSet::Nuke => write!(f, "VRC7 (Nuke.YKT die read)"),
            PatchSet::Rw => write!(f, "VRC7 (rainwarrior 2012)"),
            PatchSet::Ft36 => write!(f, "VRC7 (FamiTracker 0.3.6)"),
            PatchSet::Ft35 => write!(f, "VRC7 (FamiTracker 0.3.5)"),
            PatchSet::Mo => write!(f, "VRC7 (Okazaki estimate)"),
            PatchSet::Kt2 => write!(f, "VRC7 (kevtris capture 2)"),
            PatchSet::Kt1 => write!(f, "VRC7 (kevtris capture 1)"),
            PatchSet::Opll2413 => write!(f, "YM2413"),
            PatchSet::Opll281b => write!(f, "YMF281B"),
        }
    }
}

/// Fetch one built-in instrument as a decoded patch
///
/// `index` selects the instrument slot (0-15); slot 0 always decodes to the
/// empty user patch. Indices are masked to the patch table size.
pub fn default_patch(set: PatchSet, index: usize) -> Patch {
    Patch::from_registers(&BANKS[set.index()][index & 0x0f])
}

type Bank = [[u8; 8]; 16];

/// The nine instrument ROM data sets, one row per instrument slot
const BANKS: [Bank; NUM_PATCH_SETS] = [
    // VRC7 die read (Nuke.YKT)
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x03, 0x21, 0x05, 0x06, 0xe8, 0x81, 0x42, 0x27],
        [0x13, 0x41, 0x14, 0x0d, 0xd8, 0xf6, 0x23, 0x12],
        [0x11, 0x11, 0x08, 0x08, 0xfa, 0xb2, 0x20, 0x12],
        [0x31, 0x61, 0x0c, 0x07, 0xa8, 0x64, 0x61, 0x27],
        [0x32, 0x21, 0x1e, 0x06, 0xe1, 0x76, 0x01, 0x28],
        [0x02, 0x01, 0x06, 0x00, 0xa3, 0xe2, 0xf4, 0xf4],
        [0x21, 0x61, 0x1d, 0x07, 0x82, 0x81, 0x11, 0x07],
        [0x23, 0x21, 0x22, 0x17, 0xa2, 0x72, 0x01, 0x17],
        [0x35, 0x11, 0x25, 0x00, 0x40, 0x73, 0x72, 0x01],
        [0xb5, 0x01, 0x0f, 0x0f, 0xa8, 0xa5, 0x51, 0x02],
        [0x17, 0xc1, 0x24, 0x07, 0xf8, 0xf8, 0x22, 0x12],
        [0x71, 0x23, 0x11, 0x06, 0x65, 0x74, 0x18, 0x16],
        [0x01, 0x02, 0xd3, 0x05, 0xc9, 0x95, 0x03, 0x02],
        [0x61, 0x63, 0x0c, 0x00, 0x94, 0xc0, 0x33, 0xf6],
        [0x21, 0x72, 0x0d, 0x00, 0xc1, 0xd5, 0x56, 0x06],
    ],
    // rainwarrior 2012 measurement
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x03, 0x21, 0x04, 0x06, 0x8d, 0xf2, 0x42, 0x17],
        [0x13, 0x41, 0x05, 0x0e, 0x99, 0x96, 0x63, 0x12],
        [0x31, 0x11, 0x10, 0x0a, 0xf0, 0x9c, 0x32, 0x02],
        [0x21, 0x61, 0x1d, 0x07, 0x9f, 0x64, 0x20, 0x27],
        [0x22, 0x21, 0x1e, 0x06, 0xf0, 0x76, 0x08, 0x28],
        [0x02, 0x01, 0x06, 0x00, 0xf0, 0xf2, 0x03, 0x95],
        [0x21, 0x61, 0x1c, 0x07, 0x82, 0x81, 0x16, 0x07],
        [0x23, 0x21, 0x1a, 0x17, 0xef, 0x82, 0x25, 0x15],
        [0x25, 0x11, 0x1f, 0x00, 0x86, 0x41, 0x20, 0x11],
        [0x85, 0x01, 0x1f, 0x0f, 0xe4, 0xa2, 0x11, 0x12],
        [0x07, 0xc1, 0x2b, 0x45, 0xb4, 0xf1, 0x24, 0xf4],
        [0x61, 0x23, 0x11, 0x06, 0x96, 0x96, 0x13, 0x16],
        [0x01, 0x02, 0xd3, 0x05, 0x82, 0xa2, 0x31, 0x51],
        [0x61, 0x22, 0x0d, 0x02, 0xc3, 0x7f, 0x24, 0x05],
        [0x21, 0x62, 0x0e, 0x00, 0xa1, 0xa0, 0x44, 0x17],
    ],
    // FamiTracker 0.3.6
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x03, 0x21, 0x05, 0x06, 0xb8, 0x82, 0x42, 0x27],
        [0x13, 0x41, 0x13, 0x0d, 0xd8, 0xd6, 0x23, 0x12],
        [0x31, 0x11, 0x10, 0x0a, 0xf0, 0x9c, 0x32, 0x02],
        [0x21, 0x61, 0x1d, 0x07, 0x9f, 0x64, 0x20, 0x27],
        [0x22, 0x21, 0x1e, 0x06, 0xf0, 0x76, 0x08, 0x28],
        [0x02, 0x01, 0x06, 0x00, 0xf0, 0xf2, 0x03, 0xf5],
        [0x21, 0x61, 0x1c, 0x07, 0x82, 0x81, 0x16, 0x07],
        [0x23, 0x21, 0x1a, 0x17, 0xcf, 0x72, 0x25, 0x17],
        [0x35, 0x11, 0x25, 0x00, 0x40, 0x73, 0x72, 0x01],
        [0xb5, 0x01, 0x0f, 0x0f, 0xa8, 0xa5, 0x51, 0x02],
        [0x17, 0xc1, 0x24, 0x07, 0xf8, 0xf8, 0x22, 0x12],
        [0x71, 0x23, 0x11, 0x06, 0x65, 0x74, 0x18, 0x16],
        [0x01, 0x02, 0xd3, 0x05, 0xc9, 0x95, 0x03, 0x02],
        [0x61, 0x63, 0x0c, 0x00, 0x94, 0xc0, 0x33, 0xf6],
        [0x21, 0x72, 0x0d, 0x00, 0xc1, 0xd5, 0x56, 0x06],
    ],
    // FamiTracker 0.3.5
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x05, 0x03, 0x10, 0x06, 0x74, 0xa1, 0x13, 0xf4],
        [0x05, 0x01, 0x16, 0x00, 0xf9, 0xa2, 0x15, 0xf5],
        [0x01, 0x41, 0x11, 0x00, 0xa0, 0xa0, 0x83, 0x95],
        [0x01, 0x41, 0x17, 0x00, 0x60, 0xf0, 0x83, 0x95],
        [0x24, 0x41, 0x1f, 0x00, 0x50, 0xb0, 0x94, 0x94],
        [0x05, 0x01, 0x0b, 0x04, 0x65, 0xa0, 0x54, 0x95],
        [0x11, 0x41, 0x0e, 0x04, 0x70, 0xc7, 0x13, 0x10],
        [0x02, 0x44, 0x16, 0x06, 0xe0, 0xe0, 0x31, 0x35],
        [0x48, 0x22, 0x22, 0x07, 0x50, 0xa1, 0xa5, 0xf4],
        [0x05, 0xa1, 0x18, 0x00, 0xa2, 0xa2, 0xf5, 0xf5],
        [0x07, 0x81, 0x2b, 0x05, 0xa5, 0xa5, 0x03, 0x03],
        [0x01, 0x41, 0x08, 0x08, 0xa0, 0xa0, 0x83, 0x95],
        [0x21, 0x61, 0x12, 0x00, 0x93, 0x92, 0x74, 0x75],
        [0x21, 0x62, 0x21, 0x00, 0x84, 0x85, 0x34, 0x15],
        [0x21, 0x62, 0x0e, 0x00, 0xa1, 0xa0, 0x34, 0x15],
    ],
    // Okazaki estimate
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x33, 0x01, 0x09, 0x0e, 0x94, 0x90, 0x40, 0x01],
        [0x13, 0x41, 0x0f, 0x0d, 0xce, 0xd3, 0x43, 0x13],
        [0x01, 0x12, 0x1b, 0x06, 0xff, 0xd2, 0x00, 0x32],
        [0x61, 0x61, 0x11, 0x00, 0xff, 0xf3, 0x20, 0x13],
        [0x22, 0x21, 0x1a, 0x05, 0xf6, 0x94, 0x20, 0x22],
        [0x66, 0x21, 0x15, 0x00, 0x93, 0x94, 0x20, 0xf8],
        [0x21, 0x61, 0x1c, 0x07, 0x82, 0x81, 0x10, 0x07],
        [0x23, 0x21, 0x20, 0x1f, 0xc0, 0x71, 0x07, 0x47],
        [0x25, 0x31, 0x26, 0x05, 0x64, 0x41, 0x18, 0xf8],
        [0x17, 0xa1, 0x28, 0x07, 0xff, 0xc8, 0x01, 0x17],
        [0x15, 0x01, 0x00, 0x00, 0xf0, 0xf0, 0xe4, 0x90],
        [0x85, 0x01, 0x0f, 0x0f, 0xa4, 0xa0, 0xff, 0xff],
        [0x8c, 0x81, 0x10, 0x00, 0xfc, 0xf2, 0x01, 0xf8],
        [0x2e, 0x61, 0x00, 0x00, 0x00, 0x7f, 0xf0, 0xf8],
        [0x61, 0x62, 0x0e, 0x00, 0xa1, 0xa0, 0x54, 0x16],
    ],
    // kevtris capture 2
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x01, 0x22, 0x23, 0x07, 0xf0, 0xf0, 0xe8, 0xf7],
        [0x23, 0x01, 0x68, 0x05, 0xf2, 0x74, 0x6c, 0x89],
        [0x13, 0x11, 0x25, 0x00, 0xd2, 0xb1, 0xf4, 0xf4],
        [0x22, 0x21, 0x1b, 0x05, 0xc0, 0xa1, 0x18, 0x08],
        [0x22, 0x21, 0x2c, 0x03, 0xd2, 0xa1, 0x18, 0x57],
        [0x01, 0x22, 0x05, 0x03, 0xe1, 0x84, 0x18, 0x67],
        [0x21, 0x61, 0x1d, 0x07, 0x82, 0x81, 0x11, 0x07],
        [0x23, 0x21, 0x22, 0x17, 0xa2, 0x72, 0x01, 0x17],
        [0x15, 0x11, 0x25, 0x00, 0x42, 0x71, 0x88, 0x01],
        [0x95, 0x01, 0x0f, 0x0f, 0xa8, 0xa5, 0x51, 0x02],
        [0x17, 0xc1, 0x24, 0x07, 0xf8, 0xf8, 0x22, 0x12],
        [0x71, 0x23, 0x11, 0x06, 0x65, 0x74, 0x18, 0x16],
        [0x01, 0x02, 0xd3, 0x05, 0xc9, 0x95, 0x03, 0x02],
        [0x61, 0x63, 0x0c, 0x00, 0x94, 0xc0, 0x33, 0xf6],
        [0x21, 0x72, 0x0d, 0x00, 0xc1, 0xd5, 0x56, 0x06],
    ],
    // kevtris capture 1 (1999)
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x05, 0x03, 0x10, 0x06, 0x74, 0xa1, 0x13, 0xf4],
        [0x05, 0x01, 0x16, 0x00, 0xf9, 0xa2, 0x15, 0xf5],
        [0x01, 0x41, 0x11, 0x00, 0xa0, 0xa0, 0x83, 0x95],
        [0x01, 0x41, 0x17, 0x00, 0x60, 0xf0, 0x83, 0x95],
        [0x24, 0x41, 0x1f, 0x00, 0x50, 0xb0, 0x94, 0x94],
        [0x05, 0x01, 0x0b, 0x04, 0x65, 0xa0, 0x54, 0x95],
        [0x11, 0x41, 0x0e, 0x04, 0x70, 0xc7, 0x13, 0x10],
        [0x02, 0x44, 0x16, 0x06, 0xe0, 0xe0, 0x31, 0x35],
        [0x48, 0x22, 0x22, 0x07, 0x50, 0xa1, 0xa5, 0xf4],
        [0x05, 0xa1, 0x18, 0x00, 0xa2, 0xa2, 0xf5, 0xf5],
        [0x07, 0x81, 0x2b, 0x05, 0xa5, 0xa5, 0x03, 0x03],
        [0x01, 0x41, 0x08, 0x08, 0xa0, 0xa0, 0x83, 0x95],
        [0x21, 0x61, 0x12, 0x00, 0x93, 0x92, 0x74, 0x75],
        [0x21, 0x62, 0x21, 0x00, 0x84, 0x85, 0x34, 0x15],
        [0x21, 0x62, 0x0e, 0x00, 0xa1, 0xa0, 0x34, 0x15],
    ],
    // YM2413 factory set
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x71, 0x61, 0x1e, 0x17, 0xd0, 0x78, 0x00, 0x17],
        [0x13, 0x41, 0x1a, 0x0d, 0xd8, 0xf7, 0x23, 0x13],
        [0x13, 0x01, 0x99, 0x00, 0xf2, 0xc4, 0x11, 0x23],
        [0x11, 0x61, 0x0e, 0x07, 0x8d, 0x64, 0x70, 0x27],
        [0x22, 0x21, 0x1e, 0x06, 0xf0, 0x76, 0x08, 0x28],
        [0x21, 0x22, 0x16, 0x05, 0xf0, 0x71, 0x00, 0x18],
        [0x21, 0x61, 0x1d, 0x07, 0x82, 0x81, 0x10, 0x07],
        [0x23, 0x21, 0x2d, 0x16, 0x90, 0x90, 0x00, 0x07],
        [0x21, 0x21, 0x1b, 0x06, 0x64, 0x65, 0x10, 0x17],
        [0x21, 0x21, 0x0b, 0x1a, 0x85, 0xa0, 0x70, 0x07],
        [0x23, 0x01, 0x83, 0x10, 0xff, 0xb4, 0x10, 0xf4],
        [0x97, 0xc1, 0x20, 0x07, 0xff, 0xf4, 0x22, 0x22],
        [0x61, 0x00, 0x0c, 0x05, 0xc2, 0xf6, 0x40, 0x44],
        [0x01, 0x01, 0x56, 0x03, 0x94, 0xc2, 0x03, 0x12],
        [0x21, 0x01, 0x89, 0x03, 0xf1, 0xe4, 0xf0, 0x23],
    ],
    // YMF281B factory set
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x62, 0x21, 0x1a, 0x07, 0xf0, 0x6f, 0x00, 0x16],
        [0x00, 0x10, 0x44, 0x02, 0xf6, 0xf4, 0x54, 0x23],
        [0x03, 0x01, 0x97, 0x04, 0xf3, 0xf3, 0x13, 0xf3],
        [0x01, 0x61, 0x0a, 0x0f, 0xfa, 0x64, 0x70, 0x17],
        [0x22, 0x21, 0x1e, 0x06, 0xf0, 0x76, 0x08, 0x28],
        [0x00, 0x61, 0x8a, 0x0e, 0xf0, 0x61, 0x00, 0x07],
        [0x21, 0x61, 0x1b, 0x07, 0x84, 0x80, 0x17, 0x17],
        [0x37, 0x32, 0xc9, 0x01, 0x66, 0x64, 0x40, 0x28],
        [0x01, 0x21, 0x06, 0x03, 0xa5, 0x71, 0x51, 0x07],
        [0x06, 0x11, 0x5e, 0x07, 0xf3, 0xf2, 0xf6, 0xf8],
        [0x00, 0x20, 0x18, 0x06, 0xf5, 0xf3, 0x20, 0x23],
        [0x97, 0x41, 0x20, 0x07, 0xff, 0xf4, 0x22, 0x22],
        [0x65, 0x61, 0x15, 0x00, 0xf7, 0xf3, 0x16, 0xf4],
        [0x01, 0x31, 0x0e, 0x07, 0xfa, 0xf3, 0xff, 0xff],
        [0x48, 0x61, 0x09, 0x07, 0xf1, 0x94, 0xf0, 0xf5],
    ],
];
