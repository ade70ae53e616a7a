//! Binary log format: fixed layouts and magic constants
//!
//! File structure:
//!
//! ```text
//! [header 64 bytes]
//! [primary 12][primary 12]...[secondary 16][primary 12]...
//! [sentinel block, optional]
//! [footer 32 bytes, optional]
//! ```
//!
//! All integers are little-endian. Secondary records carry no tag; their
//! positions follow from the interleave ratio declared in the header.

mod footer;
mod header;
mod record;

pub use footer::{FileFooter, FooterProbe};
pub use header::{FileHeader, StructuralError};
pub use record::{PrimaryRecord, Record, SecondaryRecord};

/// Header magic: "LCLG" read as a little-endian `u32`
pub const FILE_MAGIC: u32 = 0x474C_434C;

/// The one supported format revision
pub const FORMAT_VERSION: u16 = 1;

/// Fixed header size
pub const HEADER_SIZE: usize = 64;

/// Footer magic
pub const FOOTER_MAGIC: u32 = 0xF007_F007;

/// Fixed footer size
pub const FOOTER_SIZE: usize = 32;

/// Primary (force sensor) record size
pub const PRIMARY_RECORD_SIZE: usize = 12;

/// Secondary (inertial sensor) record size
pub const SECONDARY_RECORD_SIZE: usize = 16;

/// Leading byte of the block that ends the data region
pub const SENTINEL_BYTE: u8 = 0xFF;

/// Width of the null-padded device identifier field
pub const DEVICE_ID_LEN: usize = 32;

// magic + version + header_size + 2 rates + start timestamp + device id
// + flags/gain/bits/accel/gyro + reserved
static_assertions::const_assert_eq!(4 + 2 + 2 + 4 + 4 + 8 + DEVICE_ID_LEN + 5 + 3, HEADER_SIZE);
// magic + 2 totals + dropped + end timestamp + checksum
static_assertions::const_assert_eq!(4 + 8 + 8 + 4 + 4 + 4, FOOTER_SIZE);
static_assertions::const_assert_eq!(4 + 4 + 4, PRIMARY_RECORD_SIZE);
static_assertions::const_assert_eq!(4 + 6 * 2, SECONDARY_RECORD_SIZE);

/// Check whether a primary-sized block is the end-of-data sentinel
#[must_use]
pub fn is_sentinel(block: &[u8]) -> bool {
    block.first() == Some(&SENTINEL_BYTE)
}
