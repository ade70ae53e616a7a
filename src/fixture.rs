//! Synthetic log files for unit tests
//!
//! Timestamps advance 1000 us per primary record so that no record starts
//! with the sentinel byte.

use crate::format::{
    FILE_MAGIC, FOOTER_MAGIC, FORMAT_VERSION, HEADER_SIZE, PRIMARY_RECORD_SIZE,
    SECONDARY_RECORD_SIZE, SENTINEL_BYTE,
};

pub(crate) fn header_bytes(primary_rate_hz: u32, secondary_rate_hz: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_SIZE);
    bytes.extend_from_slice(&FILE_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&(HEADER_SIZE as u16).to_le_bytes());
    bytes.extend_from_slice(&primary_rate_hz.to_le_bytes());
    bytes.extend_from_slice(&secondary_rate_hz.to_le_bytes());
    bytes.extend_from_slice(&1_700_000_000_000_000u64.to_le_bytes());
    let mut id = [0u8; 32];
    id[..14].copy_from_slice(b"TC023L0-000025");
    bytes.extend_from_slice(&id);
    // flags, gain, bits, accel scale, gyro scale, reserved
    bytes.extend_from_slice(&[0, 1, 24, 0, 1, 0, 0, 0]);
    bytes
}

pub(crate) fn primary_bytes(timestamp: u32, raw: i32, sequence: i32) -> [u8; PRIMARY_RECORD_SIZE] {
    let mut block = [0u8; PRIMARY_RECORD_SIZE];
    block[0..4].copy_from_slice(&timestamp.to_le_bytes());
    block[4..8].copy_from_slice(&raw.to_le_bytes());
    block[8..12].copy_from_slice(&sequence.to_le_bytes());
    block
}

pub(crate) fn secondary_bytes(
    timestamp: u32,
    accel: [i16; 3],
    gyro: [i16; 3],
) -> [u8; SECONDARY_RECORD_SIZE] {
    let mut block = [0u8; SECONDARY_RECORD_SIZE];
    block[0..4].copy_from_slice(&timestamp.to_le_bytes());
    for (i, v) in accel.iter().chain(gyro.iter()).enumerate() {
        block[4 + i * 2..6 + i * 2].copy_from_slice(&v.to_le_bytes());
    }
    block
}

pub(crate) fn footer_bytes(total_primary: u64, total_secondary: u64, checksum: u32) -> Vec<u8> {
    let end_timestamp = total_primary.saturating_sub(1) as u32 * 1_000;
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(&FOOTER_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&total_primary.to_le_bytes());
    bytes.extend_from_slice(&total_secondary.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&end_timestamp.to_le_bytes());
    bytes.extend_from_slice(&checksum.to_le_bytes());
    bytes
}

/// Builds a log the way the producer lays it out
pub(crate) struct LogBuilder {
    bytes: Vec<u8>,
    ratio: u64,
    primaries: u64,
    secondaries: u64,
    next_sequence: i32,
}

impl LogBuilder {
    pub(crate) fn new(primary_rate_hz: u32, secondary_rate_hz: u32) -> Self {
        let ratio = if secondary_rate_hz == 0 {
            0
        } else {
            u64::from(primary_rate_hz / secondary_rate_hz)
        };
        Self {
            bytes: header_bytes(primary_rate_hz, secondary_rate_hz),
            ratio,
            primaries: 0,
            secondaries: 0,
            next_sequence: 0,
        }
    }

    pub(crate) fn primary(mut self, sequence: i32) -> Self {
        let timestamp = self.primaries as u32 * 1_000;
        self.bytes
            .extend_from_slice(&primary_bytes(timestamp, sequence.wrapping_mul(10), sequence));
        self.primaries += 1;
        self.next_sequence = sequence.wrapping_add(1);

        if self.ratio > 0 && self.primaries % self.ratio == 0 {
            let k = self.secondaries as i16;
            self.bytes
                .extend_from_slice(&secondary_bytes(timestamp, [k, -k, 1_000], [0, k, -k]));
            self.secondaries += 1;
        }
        self
    }

    pub(crate) fn sequential(mut self, count: usize) -> Self {
        for _ in 0..count {
            let sequence = self.next_sequence;
            self = self.primary(sequence);
        }
        self
    }

    pub(crate) fn skip(mut self, missing: i32) -> Self {
        self.next_sequence += missing;
        self
    }

    pub(crate) fn sentinel(mut self) -> Self {
        self.bytes.extend_from_slice(&[SENTINEL_BYTE; PRIMARY_RECORD_SIZE]);
        self
    }

    pub(crate) fn primaries(&self) -> u64 {
        self.primaries
    }

    pub(crate) fn secondaries(&self) -> u64 {
        self.secondaries
    }

    /// Bytes with no footer, as after power loss
    pub(crate) fn unterminated(self) -> Vec<u8> {
        self.bytes
    }

    /// Bytes with a footer declaring the built counts
    pub(crate) fn finish(self) -> Vec<u8> {
        let (primaries, secondaries) = (self.primaries, self.secondaries);
        self.finish_with_counts(primaries, secondaries)
    }

    pub(crate) fn finish_with_counts(
        mut self,
        total_primary: u64,
        total_secondary: u64,
    ) -> Vec<u8> {
        let checksum = crc32fast::hash(&self.bytes);
        self.bytes
            .extend_from_slice(&footer_bytes(total_primary, total_secondary, checksum));
        self.bytes
    }
}
