//! Checksum pass over the raw bytes

use std::io::Read;

use crc32fast::Hasher;
use serde::Serialize;
use tracing::debug;

use crate::source::{read_full, ByteSource};
use crate::Result;

/// Result of comparing the footer checksum with the file contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecksumOutcome {
    /// Whether the values match
    pub valid: bool,
    /// Value declared in the footer
    pub expected: u32,
    /// Value computed from the file
    pub computed: u32,
}

/// CRC-32 (IEEE) of the first `len` bytes of `source`, in its own pass
pub(crate) fn checksum_prefix<S: ByteSource + ?Sized>(
    source: &S,
    len: u64,
    buffer_size: usize,
) -> Result<u32> {
    let mut reader = source.open()?.take(len);
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut hasher = Hasher::new();
    let mut total = 0u64;

    loop {
        let n = read_full(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    let crc = hasher.finalize();
    debug!("Checksum pass: {} bytes, crc {:#010X}", total, crc);
    Ok(crc)
}
