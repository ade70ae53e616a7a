//! Synthetic log files for integration tests

#![allow(dead_code)]

use lclog::format::{
    FILE_MAGIC, FOOTER_MAGIC, FORMAT_VERSION, HEADER_SIZE, PRIMARY_RECORD_SIZE, SENTINEL_BYTE,
};

pub const START_US: u64 = 1_700_000_000_000_000;

/// Builds logs the way the producer lays them out
///
/// Primary timestamps advance 1000 us per record, so no primary block
/// starts with the sentinel byte.
pub struct SyntheticLog {
    bytes: Vec<u8>,
    ratio: u64,
    pub primaries: u64,
    pub secondaries: u64,
    next_sequence: i32,
}

impl SyntheticLog {
    pub fn new(primary_rate_hz: u32, secondary_rate_hz: u32) -> Self {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.extend_from_slice(&FILE_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&(HEADER_SIZE as u16).to_le_bytes());
        bytes.extend_from_slice(&primary_rate_hz.to_le_bytes());
        bytes.extend_from_slice(&secondary_rate_hz.to_le_bytes());
        bytes.extend_from_slice(&START_US.to_le_bytes());
        let mut id = [0u8; 32];
        id[..9].copy_from_slice(b"LC-BENCH1");
        bytes.extend_from_slice(&id);
        bytes.extend_from_slice(&[0, 1, 24, 0, 1, 0, 0, 0]);

        let ratio = if secondary_rate_hz == 0 {
            0
        } else {
            u64::from(primary_rate_hz / secondary_rate_hz)
        };
        Self {
            bytes,
            ratio,
            primaries: 0,
            secondaries: 0,
            next_sequence: 0,
        }
    }

    pub fn primary(mut self, sequence: i32) -> Self {
        let timestamp = self.primaries as u32 * 1_000;
        self.bytes.extend_from_slice(&timestamp.to_le_bytes());
        self.bytes.extend_from_slice(&sequence.wrapping_mul(3).wrapping_sub(7).to_le_bytes());
        self.bytes.extend_from_slice(&sequence.to_le_bytes());
        self.primaries += 1;
        self.next_sequence = sequence.wrapping_add(1);

        if self.ratio > 0 && self.primaries % self.ratio == 0 {
            let k = self.secondaries as i16;
            self.bytes.extend_from_slice(&timestamp.to_le_bytes());
            for axis in [k, k + 1, k + 2, -k, -k - 1, -k - 2] {
                self.bytes.extend_from_slice(&axis.to_le_bytes());
            }
            self.secondaries += 1;
        }
        self
    }

    pub fn sequential(mut self, count: usize) -> Self {
        for _ in 0..count {
            let sequence = self.next_sequence;
            self = self.primary(sequence);
        }
        self
    }

    pub fn skip(mut self, missing: i32) -> Self {
        self.next_sequence += missing;
        self
    }

    pub fn sentinel(mut self) -> Self {
        self.bytes.extend_from_slice(&[SENTINEL_BYTE; PRIMARY_RECORD_SIZE]);
        self
    }

    /// Bytes with no footer, as after power loss
    pub fn unterminated(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Bytes with a footer declaring the built counts and checksum
    pub fn finish(&self) -> Vec<u8> {
        let mut bytes = self.bytes.clone();
        let checksum = crc32fast::hash(&bytes);
        let end_timestamp = self.primaries.saturating_sub(1) as u32 * 1_000;
        bytes.extend_from_slice(&FOOTER_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&self.primaries.to_le_bytes());
        bytes.extend_from_slice(&self.secondaries.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&end_timestamp.to_le_bytes());
        bytes.extend_from_slice(&checksum.to_le_bytes());
        bytes
    }
}
