//! File header (64 bytes)

use std::num::NonZeroU32;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Buf;
use serde::Serialize;
use thiserror::Error;

use super::{
    DEVICE_ID_LEN, FILE_MAGIC, FORMAT_VERSION, HEADER_SIZE, PRIMARY_RECORD_SIZE,
    SECONDARY_RECORD_SIZE,
};
use crate::error::FormatError;

/// Structural defect found in a decoded header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum StructuralError {
    /// Magic does not identify this format
    #[error("Invalid header magic: {0:#010X}")]
    BadMagic(u32),

    /// Format revision is not the supported one
    #[error("Unsupported format version: {0}, expected {}", FORMAT_VERSION)]
    UnsupportedVersion(u16),

    /// Declared header size disagrees with the fixed layout
    #[error("Invalid header size: {0}, expected {}", HEADER_SIZE)]
    BadHeaderSize(u16),
}

/// Decoded file header
///
/// Decoding never rejects bad magic or version; inspect
/// [`FileHeader::structural_errors`] to find out what is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    /// Format magic
    pub magic: u32,
    /// Format version
    pub version: u16,
    /// Declared header size
    pub header_size: u16,
    /// Primary channel sample rate (Hz)
    pub primary_rate_hz: u32,
    /// Secondary channel sample rate (Hz), 0 when absent
    pub secondary_rate_hz: u32,
    /// Capture start (microseconds since Unix epoch)
    pub start_timestamp_us: u64,
    /// Device identifier, lossily decoded up to the first NUL
    pub device_id: String,
    /// Producer flags
    pub flags: u8,
    /// Primary channel gain setting
    pub gain: u8,
    /// Primary channel resolution in bits
    pub bit_depth: u8,
    /// Accelerometer full-scale selector
    pub accel_scale: u8,
    /// Gyroscope full-scale selector
    pub gyro_scale: u8,
}

impl FileHeader {
    /// Decode a header from the first 64 bytes of `data`
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Truncated`] if fewer than 64 bytes are given
    pub fn decode(data: &[u8]) -> std::result::Result<Self, FormatError> {
        if data.len() < HEADER_SIZE {
            return Err(FormatError::Truncated {
                region: "header",
                needed: HEADER_SIZE,
                available: data.len(),
            });
        }

        let mut buf = &data[..HEADER_SIZE];
        let magic = buf.get_u32_le();
        let version = buf.get_u16_le();
        let header_size = buf.get_u16_le();
        let primary_rate_hz = buf.get_u32_le();
        let secondary_rate_hz = buf.get_u32_le();
        let start_timestamp_us = buf.get_u64_le();

        let raw_id = &buf[..DEVICE_ID_LEN];
        let id_len = raw_id.iter().position(|&b| b == 0).unwrap_or(DEVICE_ID_LEN);
        let device_id = String::from_utf8_lossy(&raw_id[..id_len]).into_owned();
        buf.advance(DEVICE_ID_LEN);

        let flags = buf.get_u8();
        let gain = buf.get_u8();
        let bit_depth = buf.get_u8();
        let accel_scale = buf.get_u8();
        let gyro_scale = buf.get_u8();
        // 3 reserved bytes remain

        Ok(Self {
            magic,
            version,
            header_size,
            primary_rate_hz,
            secondary_rate_hz,
            start_timestamp_us,
            device_id,
            flags,
            gain,
            bit_depth,
            accel_scale,
            gyro_scale,
        })
    }

    /// List every structural defect, in layout order
    #[must_use]
    pub fn structural_errors(&self) -> Vec<StructuralError> {
        let mut errors = Vec::new();
        if self.magic != FILE_MAGIC {
            errors.push(StructuralError::BadMagic(self.magic));
        }
        if self.version != FORMAT_VERSION {
            errors.push(StructuralError::UnsupportedVersion(self.version));
        }
        if usize::from(self.header_size) != HEADER_SIZE {
            errors.push(StructuralError::BadHeaderSize(self.header_size));
        }
        errors
    }

    /// Whether magic, version and declared size all match the format
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.magic == FILE_MAGIC
            && self.version == FORMAT_VERSION
            && usize::from(self.header_size) == HEADER_SIZE
    }

    /// Primary records per secondary record
    ///
    /// `None` disables interleaving: either the secondary rate is zero or
    /// it exceeds the primary rate so that the floor division is zero.
    #[must_use]
    pub fn interleave_ratio(&self) -> Option<NonZeroU32> {
        if self.secondary_rate_hz == 0 {
            return None;
        }
        NonZeroU32::new(self.primary_rate_hz / self.secondary_rate_hz)
    }

    /// Capture start as wall-clock time, `None` if the platform clock cannot
    /// represent it
    #[must_use]
    pub fn start_time(&self) -> Option<SystemTime> {
        UNIX_EPOCH.checked_add(Duration::from_micros(self.start_timestamp_us))
    }

    /// Data rate the producer writes at the declared sample rates
    #[must_use]
    pub fn bytes_per_second(&self) -> u64 {
        u64::from(self.primary_rate_hz) * PRIMARY_RECORD_SIZE as u64
            + u64::from(self.secondary_rate_hz) * SECONDARY_RECORD_SIZE as u64
    }

    /// Expected file size (without footer) for a capture of `duration_secs`,
    /// saturating at `u64::MAX`
    #[must_use]
    pub fn estimated_file_size(&self, duration_secs: u64) -> u64 {
        self.bytes_per_second()
            .saturating_mul(duration_secs)
            .saturating_add(HEADER_SIZE as u64)
    }
}
