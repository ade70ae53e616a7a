//! Interleave tracking for one pass

use std::num::NonZeroU32;

/// Decides when a secondary record follows the current primary record
///
/// One instance belongs to one pass; it is never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interleave {
    ratio: Option<NonZeroU32>,
    count_so_far: u64,
}

impl Interleave {
    /// Start a pass with the given primary-per-secondary ratio
    #[must_use]
    pub fn new(ratio: Option<NonZeroU32>) -> Self {
        Self {
            ratio,
            count_so_far: 0,
        }
    }

    /// Count one primary record; returns true if a secondary record follows it
    pub fn record_primary(&mut self) -> bool {
        self.count_so_far += 1;
        match self.ratio {
            Some(ratio) => self.count_so_far % u64::from(ratio.get()) == 0,
            None => false,
        }
    }

    /// Primary records counted so far
    #[must_use]
    pub fn count_so_far(&self) -> u64 {
        self.count_so_far
    }

    /// Active ratio, if any
    #[must_use]
    pub fn ratio(&self) -> Option<NonZeroU32> {
        self.ratio
    }
}
