//! Property tests over generated logs

mod common;

use proptest::prelude::*;

use common::SyntheticLog;
use lclog::format::{Record, HEADER_SIZE, PRIMARY_RECORD_SIZE, SECONDARY_RECORD_SIZE};
use lclog::{decode_header, open_record_stream, validate};

/// File offset of the raw value of primary `index`
fn raw_value_offset(index: usize, ratio: usize) -> usize {
    HEADER_SIZE + index * PRIMARY_RECORD_SIZE + (index / ratio) * SECONDARY_RECORD_SIZE + 4
}

/// File offset of secondary record `index`
fn secondary_offset(index: usize, ratio: usize) -> usize {
    HEADER_SIZE + (index + 1) * ratio * PRIMARY_RECORD_SIZE + index * SECONDARY_RECORD_SIZE
}

proptest! {
    #[test]
    fn interleave_follows_ratio(count in 0usize..400, ratio in 1u32..20) {
        let bytes = SyntheticLog::new(ratio * 50, 50).sequential(count).finish();
        let header = decode_header(&bytes).unwrap();

        let mut primaries_seen = 0usize;
        let mut secondaries_seen = 0usize;
        for record in open_record_stream(&bytes, &header).unwrap() {
            match record.unwrap() {
                Record::Primary(p) => {
                    prop_assert_eq!(p.sequence as usize, primaries_seen);
                    primaries_seen += 1;
                }
                Record::Secondary(s) => {
                    // secondary k follows primary k * ratio
                    prop_assert_eq!(primaries_seen, (secondaries_seen + 1) * ratio as usize);
                    prop_assert_eq!(s.accel_x as usize, secondaries_seen);
                    secondaries_seen += 1;
                }
            }
        }

        prop_assert_eq!(primaries_seen, count);
        prop_assert_eq!(secondaries_seen, count / ratio as usize);
    }

    #[test]
    fn bit_flip_only_breaks_checksum(
        count in 1usize..200,
        target in any::<prop::sample::Index>(),
        byte in 0usize..4,
        bit in 0u8..8,
    ) {
        let ratio = 10;
        let mut bytes = SyntheticLog::new(1_000, 100).sequential(count).finish();
        let index = target.index(count);
        bytes[raw_value_offset(index, ratio) + byte] ^= 1 << bit;

        let report = validate(&bytes, true, true).unwrap();
        prop_assert!(!report.is_valid);
        prop_assert!(report.crc_checked);
        prop_assert!(!report.crc_valid);
        prop_assert!(report.header_valid);
        prop_assert!(report.gaps.is_empty());
        prop_assert_eq!(report.primary_count, count as u64);
        prop_assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn secondary_bit_flip_only_breaks_checksum(
        count in 10usize..200,
        target in any::<prop::sample::Index>(),
        byte in 0usize..SECONDARY_RECORD_SIZE,
        bit in 0u8..8,
    ) {
        let ratio = 10;
        let mut bytes = SyntheticLog::new(1_000, 100).sequential(count).finish();
        let index = target.index(count / ratio);
        bytes[secondary_offset(index, ratio) + byte] ^= 1 << bit;

        let report = validate(&bytes, true, true).unwrap();
        prop_assert!(!report.is_valid);
        prop_assert!(!report.crc_valid);
        prop_assert!(report.header_valid);
        prop_assert!(report.gaps.is_empty());
        prop_assert_eq!(report.primary_count, count as u64);
        prop_assert_eq!(report.secondary_count, (count / ratio) as u64);
        prop_assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn truncation_never_panics(count in 0usize..60, cut in 0usize..2_000) {
        let bytes = SyntheticLog::new(1_000, 250)
            .sequential(count)
            .sentinel()
            .finish();
        let cut = cut.min(bytes.len());
        let truncated = &bytes[..cut];

        match validate(truncated, true, true) {
            Ok(report) => prop_assert!(report.primary_count <= count as u64),
            Err(_) => prop_assert!(cut < HEADER_SIZE),
        }
    }
}
