//! Lazy, single-pass record decoding

use std::io::Read;
use std::iter::FusedIterator;
use std::num::NonZeroU32;

use serde::Serialize;

use super::Interleave;
use crate::format::{
    is_sentinel, PrimaryRecord, Record, SecondaryRecord, PRIMARY_RECORD_SIZE,
    SECONDARY_RECORD_SIZE,
};
use crate::source::read_full;
use crate::Result;

/// Why a pass stopped producing records
///
/// Offsets are absolute file offsets of the block that ended the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StreamEnd {
    /// End-of-data sentinel block
    Sentinel {
        /// Offset of the sentinel block
        offset: u64,
    },
    /// Data region exhausted on a record boundary
    EndOfData {
        /// Offset where the region ended
        offset: u64,
    },
    /// Region ended inside a primary block
    TruncatedPrimary {
        /// Offset of the partial block
        offset: u64,
        /// Bytes of the block that were present
        partial: usize,
    },
    /// Region ended inside a secondary block
    TruncatedSecondary {
        /// Offset of the partial block
        offset: u64,
        /// Bytes of the block that were present
        partial: usize,
    },
}

impl StreamEnd {
    /// Offset of the block that ended the pass
    #[must_use]
    pub fn offset(&self) -> u64 {
        match *self {
            Self::Sentinel { offset }
            | Self::EndOfData { offset }
            | Self::TruncatedPrimary { offset, .. }
            | Self::TruncatedSecondary { offset, .. } => offset,
        }
    }

    /// Whether the pass ended part-way through a record
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(
            self,
            Self::TruncatedPrimary { .. } | Self::TruncatedSecondary { .. }
        )
    }
}

/// Interleaved primary/secondary records from one forward scan
///
/// Holds one block at a time. Dropping the stream releases its reader.
/// After an I/O error the stream yields that error once and then ends.
pub struct RecordStream<R> {
    reader: R,
    interleave: Interleave,
    secondary_due: bool,
    base_offset: u64,
    consumed: u64,
    secondaries: u64,
    end: Option<StreamEnd>,
    failed: bool,
}

impl<R: Read> RecordStream<R> {
    /// Decode records from `reader`, which starts at the first data block
    ///
    /// `base_offset` is the file offset of that block and only affects the
    /// offsets reported in [`StreamEnd`].
    pub fn new(reader: R, ratio: Option<NonZeroU32>, base_offset: u64) -> Self {
        Self {
            reader,
            interleave: Interleave::new(ratio),
            secondary_due: false,
            base_offset,
            consumed: 0,
            secondaries: 0,
            end: None,
            failed: false,
        }
    }

    /// How the pass ended, once it has
    #[must_use]
    pub fn end(&self) -> Option<StreamEnd> {
        self.end
    }

    /// Primary records yielded so far
    #[must_use]
    pub fn primaries_read(&self) -> u64 {
        self.interleave.count_so_far()
    }

    /// Secondary records yielded so far
    #[must_use]
    pub fn secondaries_read(&self) -> u64 {
        self.secondaries
    }

    /// Data bytes consumed as whole records
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Keep only primary records
    #[must_use]
    pub fn into_primaries(self) -> PrimaryRecords<R> {
        PrimaryRecords { stream: self }
    }

    /// Keep only secondary records
    #[must_use]
    pub fn into_secondaries(self) -> SecondaryRecords<R> {
        SecondaryRecords { stream: self }
    }

    fn offset(&self) -> u64 {
        self.base_offset + self.consumed
    }

    fn next_secondary(&mut self) -> Option<Result<Record>> {
        let mut block = [0u8; SECONDARY_RECORD_SIZE];
        let offset = self.offset();
        match read_full(&mut self.reader, &mut block) {
            Err(e) => {
                self.failed = true;
                Some(Err(e.into()))
            }
            Ok(0) => {
                self.end = Some(StreamEnd::EndOfData { offset });
                None
            }
            Ok(n) if n < SECONDARY_RECORD_SIZE => {
                self.end = Some(StreamEnd::TruncatedSecondary { offset, partial: n });
                None
            }
            Ok(_) => {
                self.consumed += SECONDARY_RECORD_SIZE as u64;
                self.secondaries += 1;
                Some(Ok(Record::Secondary(SecondaryRecord::decode(&block))))
            }
        }
    }

    fn next_primary(&mut self) -> Option<Result<Record>> {
        let mut block = [0u8; PRIMARY_RECORD_SIZE];
        let offset = self.offset();
        match read_full(&mut self.reader, &mut block) {
            Err(e) => {
                self.failed = true;
                Some(Err(e.into()))
            }
            Ok(0) => {
                self.end = Some(StreamEnd::EndOfData { offset });
                None
            }
            Ok(n) if n < PRIMARY_RECORD_SIZE => {
                self.end = Some(StreamEnd::TruncatedPrimary { offset, partial: n });
                None
            }
            Ok(_) if is_sentinel(&block) => {
                self.end = Some(StreamEnd::Sentinel { offset });
                None
            }
            Ok(_) => {
                self.consumed += PRIMARY_RECORD_SIZE as u64;
                self.secondary_due = self.interleave.record_primary();
                Some(Ok(Record::Primary(PrimaryRecord::decode(&block))))
            }
        }
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end.is_some() || self.failed {
            return None;
        }

        if self.secondary_due {
            self.secondary_due = false;
            return self.next_secondary();
        }

        self.next_primary()
    }
}

impl<R: Read> FusedIterator for RecordStream<R> {}

/// Primary records of one pass
pub struct PrimaryRecords<R> {
    stream: RecordStream<R>,
}

impl<R: Read> PrimaryRecords<R> {
    /// The underlying combined stream
    #[must_use]
    pub fn stream(&self) -> &RecordStream<R> {
        &self.stream
    }
}

impl<R: Read> Iterator for PrimaryRecords<R> {
    type Item = Result<PrimaryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stream.next()? {
                Ok(Record::Primary(record)) => return Some(Ok(record)),
                Ok(Record::Secondary(_)) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<R: Read> FusedIterator for PrimaryRecords<R> {}

/// Secondary records of one pass
pub struct SecondaryRecords<R> {
    stream: RecordStream<R>,
}

impl<R: Read> SecondaryRecords<R> {
    /// The underlying combined stream
    #[must_use]
    pub fn stream(&self) -> &RecordStream<R> {
        &self.stream
    }
}

impl<R: Read> Iterator for SecondaryRecords<R> {
    type Item = Result<SecondaryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stream.next()? {
                Ok(Record::Secondary(record)) => return Some(Ok(record)),
                Ok(Record::Primary(_)) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<R: Read> FusedIterator for SecondaryRecords<R> {}
