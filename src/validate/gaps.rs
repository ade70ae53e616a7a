//! Sequence gap detection

use crate::format::PrimaryRecord;

use super::Gap;

/// Tracks the expected next sequence number across primary records
#[derive(Debug, Default)]
pub struct GapDetector {
    expected: i64,
    position: u64,
    gaps: Vec<Gap>,
    total_missing: i64,
}

impl GapDetector {
    /// Start expecting sequence 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the next primary record; returns the gap it reveals, if any
    pub fn observe(&mut self, record: &PrimaryRecord) -> Option<&Gap> {
        let observed = i64::from(record.sequence);
        let position = self.position;
        self.position += 1;

        let expected = self.expected;
        self.expected = observed + 1;
        if observed == expected {
            return None;
        }

        let gap = Gap {
            position,
            expected_sequence: expected,
            observed_sequence: observed,
            missing_count: observed - expected,
            timestamp_us: record.timestamp_offset_us,
        };
        self.total_missing += gap.missing_count;
        self.gaps.push(gap);
        self.gaps.last()
    }

    /// Gaps found so far
    #[must_use]
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    /// Sum of `missing_count` over all gaps
    #[must_use]
    pub fn total_missing(&self) -> i64 {
        self.total_missing
    }

    /// Consume the detector, returning gaps and total missing
    #[must_use]
    pub fn finish(self) -> (Vec<Gap>, i64) {
        (self.gaps, self.total_missing)
    }
}
