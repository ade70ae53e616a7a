//! Validation report and its text rendering

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::decode::StreamEnd;
use crate::format::{FileFooter, StructuralError};

/// A discontinuity in primary sequence numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gap {
    /// Index of the primary record where the gap was seen
    pub position: u64,
    /// Sequence number that should have appeared
    pub expected_sequence: i64,
    /// Sequence number that did appear
    pub observed_sequence: i64,
    /// `observed - expected`; negative if the sequence stepped backwards
    pub missing_count: i64,
    /// Timestamp offset of the record that revealed the gap
    pub timestamp_us: u32,
}

/// Everything one validation run found
///
/// `is_valid` turns false only through [`ValidationReport::add_error`];
/// warnings never affect it.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Label of the validated source, usually its path
    pub source: Option<String>,
    /// False if any error-class finding fired
    pub is_valid: bool,

    /// Header magic, version and size all correct
    pub header_valid: bool,
    /// Structural defects of the header
    pub structural_errors: Vec<StructuralError>,

    /// A footer with valid magic was found
    pub footer_present: bool,
    /// The footer region is trustworthy
    pub footer_valid: bool,
    /// The decoded footer
    pub footer: Option<FileFooter>,

    /// The checksum was verified
    pub crc_checked: bool,
    /// Checksum matched, or was not checked
    pub crc_valid: bool,
    /// Checksum declared by the footer
    pub crc_expected: u32,
    /// Checksum computed from the file
    pub crc_computed: u32,

    /// Primary records decoded
    pub primary_count: u64,
    /// Secondary records decoded
    pub secondary_count: u64,
    /// Primary records declared by the footer
    pub expected_primary_count: Option<u64>,
    /// Secondary records declared by the footer
    pub expected_secondary_count: Option<u64>,
    /// Samples the producer reported dropping
    pub dropped_samples: Option<u32>,

    /// Sequence gaps, in stream order
    pub gaps: Vec<Gap>,
    /// Sum of `missing_count` over all gaps
    pub total_missing: i64,

    /// How the record pass ended
    pub stream_end: Option<StreamEnd>,

    /// Error-class findings
    pub errors: Vec<String>,
    /// Warning-class findings
    pub warnings: Vec<String>,

    #[serde(skip)]
    pub(crate) max_listed_gaps: usize,
}

impl ValidationReport {
    pub(crate) fn new(source: Option<String>, max_listed_gaps: usize) -> Self {
        Self {
            source,
            is_valid: true,
            header_valid: true,
            structural_errors: Vec::new(),
            footer_present: false,
            footer_valid: false,
            footer: None,
            crc_checked: false,
            crc_valid: true,
            crc_expected: 0,
            crc_computed: 0,
            primary_count: 0,
            secondary_count: 0,
            expected_primary_count: None,
            expected_secondary_count: None,
            dropped_samples: None,
            gaps: Vec::new(),
            total_missing: 0,
            stream_end: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            max_listed_gaps,
        }
    }

    /// Record an error and mark the report invalid
    pub fn add_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        warn!("{}: {}", self.label(), msg);
        self.errors.push(msg);
        self.is_valid = false;
    }

    /// Record a warning
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        warn!("{}: {}", self.label(), msg);
        self.warnings.push(msg);
    }

    /// Source label, or a placeholder
    #[must_use]
    pub fn label(&self) -> &str {
        self.source.as_deref().unwrap_or("<source>")
    }
}

fn ok_or(flag: bool, bad: &str) -> &str {
    if flag {
        "OK"
    } else {
        bad
    }
}

fn count_line(count: u64, expected: Option<u64>) -> String {
    match expected {
        Some(expected) => format!("{count} (expected: {expected})"),
        None => format!("{count} (no footer)"),
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report: {}", self.label())?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Status: {}", if self.is_valid { "VALID" } else { "INVALID" })?;
        writeln!(f)?;
        writeln!(f, "Header:  {}", ok_or(self.header_valid, "INVALID"))?;
        writeln!(f, "Footer:  {}", ok_or(self.footer_valid, "MISSING/INVALID"))?;
        if self.crc_checked {
            writeln!(f, "CRC32:   {}", ok_or(self.crc_valid, "MISMATCH"))?;
            if !self.crc_valid {
                writeln!(f, "  Expected: {:#010X}", self.crc_expected)?;
                writeln!(f, "  Computed: {:#010X}", self.crc_computed)?;
            }
        } else {
            writeln!(f, "CRC32:   NOT CHECKED")?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Primary samples:   {}",
            count_line(self.primary_count, self.expected_primary_count)
        )?;
        writeln!(
            f,
            "Secondary samples: {}",
            count_line(self.secondary_count, self.expected_secondary_count)
        )?;
        if let Some(dropped) = self.dropped_samples {
            writeln!(f, "Dropped (footer):  {dropped}")?;
        }
        match self.stream_end {
            Some(StreamEnd::Sentinel { offset }) => {
                writeln!(f, "Data end:          end marker at byte {offset}")?;
            }
            Some(StreamEnd::EndOfData { offset }) => {
                writeln!(f, "Data end:          byte {offset}")?;
            }
            Some(
                StreamEnd::TruncatedPrimary { offset, partial }
                | StreamEnd::TruncatedSecondary { offset, partial },
            ) => {
                writeln!(
                    f,
                    "Data end:          partial record at byte {offset} ({partial} bytes)"
                )?;
            }
            None => {}
        }

        if !self.gaps.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sequence Gaps: {}", self.gaps.len())?;
            writeln!(f, "Total Missing: {} samples", self.total_missing)?;
            for gap in self.gaps.iter().take(self.max_listed_gaps) {
                writeln!(
                    f,
                    "  - Gap at record {}: expected seq {}, got {} ({} missing)",
                    gap.position, gap.expected_sequence, gap.observed_sequence, gap.missing_count
                )?;
            }
            if self.gaps.len() > self.max_listed_gaps {
                writeln!(
                    f,
                    "  ... and {} more gaps",
                    self.gaps.len() - self.max_listed_gaps
                )?;
            }
        }

        if !self.errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors:")?;
            for err in &self.errors {
                writeln!(f, "  - {err}")?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  - {warning}")?;
            }
        }

        Ok(())
    }
}
