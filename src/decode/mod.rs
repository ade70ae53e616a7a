//! Header/footer decoding and record streams over a [`ByteSource`]

mod interleave;
mod stream;

use std::io::{self, Read, Seek, SeekFrom};

use tracing::debug;

pub use interleave::Interleave;
pub use stream::{PrimaryRecords, RecordStream, SecondaryRecords, StreamEnd};

use crate::format::{FileFooter, FileHeader, FooterProbe, FOOTER_SIZE, HEADER_SIZE};
use crate::source::{read_full, ByteSource};
use crate::Result;

/// Record stream opened on a source
pub type SourceStream<'a, S> = RecordStream<io::Take<<S as ByteSource>::Cursor<'a>>>;

/// Byte range holding records: after the header, before any footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRegion {
    /// First data byte
    pub start: u64,
    /// One past the last data byte
    pub end: u64,
}

impl DataRegion {
    /// Region length in bytes
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the region holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Region for a source of `source_len` bytes with the given footer probe
    #[must_use]
    pub fn new(source_len: u64, probe: &FooterProbe) -> Self {
        let start = HEADER_SIZE as u64;
        let end = if probe.is_present() {
            source_len.saturating_sub(FOOTER_SIZE as u64)
        } else {
            source_len
        };
        Self {
            start,
            end: end.max(start),
        }
    }
}

/// Decode the header from the first 64 bytes of `source`
///
/// # Errors
///
/// Returns [`crate::FormatError::Truncated`] if the source is shorter than a
/// header, or an I/O error if it cannot be read
pub fn decode_header<S: ByteSource + ?Sized>(source: &S) -> Result<FileHeader> {
    let mut cursor = source.open()?;
    let mut block = [0u8; HEADER_SIZE];
    let n = read_full(&mut cursor, &mut block)?;
    Ok(FileHeader::decode(&block[..n])?)
}

/// Look for a footer in the last 32 bytes of `source`
///
/// A footer region exists only if the source is long enough to hold a
/// header followed by a footer.
///
/// # Errors
///
/// Returns error if the source cannot be read
pub fn probe_footer<S: ByteSource + ?Sized>(source: &S) -> Result<FooterProbe> {
    let len = source.byte_len()?;
    if len < (HEADER_SIZE + FOOTER_SIZE) as u64 {
        return Ok(FooterProbe::NoRegion { source_len: len });
    }

    let mut cursor = source.open()?;
    cursor.seek(SeekFrom::Start(len - FOOTER_SIZE as u64))?;
    let mut tail = [0u8; FOOTER_SIZE];
    cursor.read_exact(&mut tail)?;
    Ok(FileFooter::probe_tail(&tail))
}

/// Decode the footer if one is present
///
/// # Errors
///
/// Returns error if the source cannot be read
pub fn decode_footer<S: ByteSource + ?Sized>(source: &S) -> Result<Option<FileFooter>> {
    Ok(probe_footer(source)?.into_footer())
}

/// Open a fresh pass over the records of `source`
///
/// # Errors
///
/// Returns error if the source cannot be opened or positioned
pub fn open_record_stream<'a, S: ByteSource + ?Sized>(
    source: &'a S,
    header: &FileHeader,
) -> Result<SourceStream<'a, S>> {
    let probe = probe_footer(source)?;
    let region = DataRegion::new(source.byte_len()?, &probe);
    open_region(source, header, region)
}

pub(crate) fn open_region<'a, S: ByteSource + ?Sized>(
    source: &'a S,
    header: &FileHeader,
    region: DataRegion,
) -> Result<SourceStream<'a, S>> {
    let mut cursor = source.open()?;
    cursor.seek(SeekFrom::Start(region.start))?;

    debug!(
        "Opening record stream: bytes {}..{}, ratio {:?}",
        region.start,
        region.end,
        header.interleave_ratio()
    );

    Ok(RecordStream::new(
        cursor.take(region.len()),
        header.interleave_ratio(),
        region.start,
    ))
}
