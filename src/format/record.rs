//! Primary and secondary sample records

use bytes::Buf;
use serde::Serialize;

use super::{FileHeader, PRIMARY_RECORD_SIZE, SECONDARY_RECORD_SIZE};

/// Force sensor sample (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrimaryRecord {
    /// Microseconds since capture start
    pub timestamp_offset_us: u32,
    /// Signed raw sample
    pub raw_value: i32,
    /// Producer-assigned sequence number, starting at 0
    pub sequence: i32,
}

/// Inertial sensor sample (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecondaryRecord {
    /// Microseconds since capture start
    pub timestamp_offset_us: u32,
    /// Linear acceleration, X axis (raw)
    pub accel_x: i16,
    /// Linear acceleration, Y axis (raw)
    pub accel_y: i16,
    /// Linear acceleration, Z axis (raw)
    pub accel_z: i16,
    /// Angular rate, X axis (raw)
    pub gyro_x: i16,
    /// Angular rate, Y axis (raw)
    pub gyro_y: i16,
    /// Angular rate, Z axis (raw)
    pub gyro_z: i16,
}

/// One decoded record from the data region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// Force sensor sample
    Primary(PrimaryRecord),
    /// Inertial sensor sample
    Secondary(SecondaryRecord),
}

impl PrimaryRecord {
    /// Decode a full primary block
    #[must_use]
    pub fn decode(block: &[u8; PRIMARY_RECORD_SIZE]) -> Self {
        let mut buf = &block[..];
        Self {
            timestamp_offset_us: buf.get_u32_le(),
            raw_value: buf.get_i32_le(),
            sequence: buf.get_i32_le(),
        }
    }

    /// Seconds since capture start
    #[must_use]
    pub fn timestamp_secs(&self) -> f64 {
        f64::from(self.timestamp_offset_us) / 1_000_000.0
    }

    /// Microseconds since Unix epoch, saturating at `u64::MAX`
    #[must_use]
    pub fn absolute_timestamp_us(&self, header: &FileHeader) -> u64 {
        header
            .start_timestamp_us
            .saturating_add(u64::from(self.timestamp_offset_us))
    }
}

impl SecondaryRecord {
    /// Decode a full secondary block
    #[must_use]
    pub fn decode(block: &[u8; SECONDARY_RECORD_SIZE]) -> Self {
        let mut buf = &block[..];
        Self {
            timestamp_offset_us: buf.get_u32_le(),
            accel_x: buf.get_i16_le(),
            accel_y: buf.get_i16_le(),
            accel_z: buf.get_i16_le(),
            gyro_x: buf.get_i16_le(),
            gyro_y: buf.get_i16_le(),
            gyro_z: buf.get_i16_le(),
        }
    }

    /// Acceleration axes as `[x, y, z]`
    #[must_use]
    pub fn accel(&self) -> [i16; 3] {
        [self.accel_x, self.accel_y, self.accel_z]
    }

    /// Angular rate axes as `[x, y, z]`
    #[must_use]
    pub fn gyro(&self) -> [i16; 3] {
        [self.gyro_x, self.gyro_y, self.gyro_z]
    }

    /// Seconds since capture start
    #[must_use]
    pub fn timestamp_secs(&self) -> f64 {
        f64::from(self.timestamp_offset_us) / 1_000_000.0
    }

    /// Microseconds since Unix epoch, saturating at `u64::MAX`
    #[must_use]
    pub fn absolute_timestamp_us(&self, header: &FileHeader) -> u64 {
        header
            .start_timestamp_us
            .saturating_add(u64::from(self.timestamp_offset_us))
    }
}

impl Record {
    /// Timestamp offset of either kind
    #[must_use]
    pub fn timestamp_offset_us(&self) -> u32 {
        match self {
            Self::Primary(r) => r.timestamp_offset_us,
            Self::Secondary(r) => r.timestamp_offset_us,
        }
    }

    /// The primary sample, if this is one
    #[must_use]
    pub fn as_primary(&self) -> Option<&PrimaryRecord> {
        match self {
            Self::Primary(r) => Some(r),
            Self::Secondary(_) => None,
        }
    }

    /// The secondary sample, if this is one
    #[must_use]
    pub fn as_secondary(&self) -> Option<&SecondaryRecord> {
        match self {
            Self::Secondary(r) => Some(r),
            Self::Primary(_) => None,
        }
    }
}
