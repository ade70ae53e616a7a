//! File footer (32 bytes)

use bytes::Buf;
use serde::Serialize;

use super::{FOOTER_MAGIC, FOOTER_SIZE, HEADER_SIZE};

/// Trailing integrity block written on clean stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileFooter {
    /// Footer magic
    pub magic: u32,
    /// Primary records written
    pub total_primary: u64,
    /// Secondary records written
    pub total_secondary: u64,
    /// Samples the producer dropped on overflow
    pub dropped: u32,
    /// Timestamp offset of the last sample (microseconds)
    pub end_timestamp_us: u32,
    /// CRC-32 of every byte before the footer, 0 if not computed
    pub checksum: u32,
}

/// Outcome of looking for a footer at the end of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FooterProbe {
    /// A footer with valid magic
    Present(FileFooter),
    /// Source too short to hold a header followed by a footer
    NoRegion {
        /// Total length of the probed source in bytes
        source_len: u64,
    },
    /// A footer-sized tail whose magic does not match
    MagicMismatch {
        /// Magic read from the tail
        magic: u32,
    },
}

impl FileFooter {
    /// Probe a whole in-memory source for a footer in its last 32 bytes
    ///
    /// A footer region exists only if `data` can hold a header followed by
    /// a footer.
    #[must_use]
    pub fn probe(data: &[u8]) -> FooterProbe {
        if data.len() < HEADER_SIZE + FOOTER_SIZE {
            return FooterProbe::NoRegion {
                source_len: data.len() as u64,
            };
        }

        let mut tail = [0u8; FOOTER_SIZE];
        tail.copy_from_slice(&data[data.len() - FOOTER_SIZE..]);
        Self::probe_tail(&tail)
    }

    /// Decode the final 32-byte block of a source long enough to hold one
    #[must_use]
    pub fn probe_tail(tail: &[u8; FOOTER_SIZE]) -> FooterProbe {
        let mut buf = &tail[..];
        let magic = buf.get_u32_le();
        if magic != FOOTER_MAGIC {
            return FooterProbe::MagicMismatch { magic };
        }

        FooterProbe::Present(Self {
            magic,
            total_primary: buf.get_u64_le(),
            total_secondary: buf.get_u64_le(),
            dropped: buf.get_u32_le(),
            end_timestamp_us: buf.get_u32_le(),
            checksum: buf.get_u32_le(),
        })
    }

    /// Decode the footer of a whole source, treating absence and bad magic
    /// alike
    #[must_use]
    pub fn decode(data: &[u8]) -> Option<Self> {
        Self::probe(data).into_footer()
    }

    /// Whether the magic matches the footer constant
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.magic == FOOTER_MAGIC
    }

    /// Capture duration according to the footer
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        f64::from(self.end_timestamp_us) / 1_000_000.0
    }
}

impl FooterProbe {
    /// The footer, if one was found
    #[must_use]
    pub fn footer(&self) -> Option<&FileFooter> {
        match self {
            Self::Present(footer) => Some(footer),
            _ => None,
        }
    }

    /// Consume the probe, keeping only a found footer
    #[must_use]
    pub fn into_footer(self) -> Option<FileFooter> {
        match self {
            Self::Present(footer) => Some(footer),
            _ => None,
        }
    }

    /// Whether a valid footer was found
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::footer_bytes;

    fn tail(bytes: Vec<u8>) -> [u8; FOOTER_SIZE] {
        bytes.try_into().unwrap()
    }

    #[test]
    fn test_probe_present() {
        let probe = FileFooter::probe_tail(&tail(footer_bytes(25, 2, 0xCAFE_BABE)));
        let footer = probe.into_footer().unwrap();

        assert!(footer.is_valid());
        assert_eq!(footer.total_primary, 25);
        assert_eq!(footer.total_secondary, 2);
        assert_eq!(footer.dropped, 0);
        assert_eq!(footer.end_timestamp_us, 24_000);
        assert_eq!(footer.checksum, 0xCAFE_BABE);
        assert!((footer.duration_secs() - 0.024).abs() < 1e-9);
    }

    #[test]
    fn test_probe_uses_last_32_bytes() {
        let mut bytes = vec![0xAB; 100];
        bytes.extend_from_slice(&footer_bytes(7, 0, 0));
        assert_eq!(FileFooter::decode(&bytes).unwrap().total_primary, 7);
    }

    #[test]
    fn test_probe_no_region() {
        assert_eq!(
            FileFooter::probe(&[0u8; 31]),
            FooterProbe::NoRegion { source_len: 31 }
        );
        assert!(FileFooter::decode(&[]).is_none());

        // a bare footer with no room for a header is not a footer region
        let bare = footer_bytes(3, 0, 0);
        assert_eq!(
            FileFooter::probe(&bare),
            FooterProbe::NoRegion { source_len: 32 }
        );

        let mut minimal = vec![0u8; HEADER_SIZE];
        minimal.extend_from_slice(&bare);
        assert!(FileFooter::probe(&minimal).is_present());
    }

    #[test]
    fn test_probe_magic_mismatch() {
        let mut bytes = footer_bytes(1, 1, 0);
        bytes[0] = 0x00;
        let probe = FileFooter::probe_tail(&tail(bytes));

        assert_eq!(probe, FooterProbe::MagicMismatch { magic: 0xF007_F000 });
        assert!(!probe.is_present());
        assert!(probe.footer().is_none());
    }
}
