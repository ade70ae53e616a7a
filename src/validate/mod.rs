//! Integrity validation
//!
//! A run makes two independent passes, each with its own cursor: a raw
//! checksum pass over everything before the footer, and a record pass that
//! counts samples and tracks sequence numbers. Both reuse the decoding
//! primitives that ordinary consumers use.

mod batch;
mod checksum;
mod gaps;
mod report;

use tracing::{debug, info};

pub use batch::{collect_logs, validate_path, validate_paths};
pub use checksum::ChecksumOutcome;
pub use gaps::GapDetector;
pub use report::{Gap, ValidationReport};

use crate::config::Config;
use crate::decode::{decode_header, open_region, probe_footer, DataRegion, StreamEnd};
use crate::format::{FooterProbe, Record, FOOTER_SIZE, PRIMARY_RECORD_SIZE};
use crate::source::ByteSource;
use crate::Result;

const UNCLEAN_END: &str = "file may have ended uncleanly";

/// Runs validation passes with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: Config,
    label: Option<String>,
}

impl Validator {
    /// Create a validator
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            label: None,
        }
    }

    /// Name the source in the report
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Validate `source`
    ///
    /// # Errors
    ///
    /// Returns error only if the header is truncated or the source cannot
    /// be read; every other problem is reported in the returned value
    pub fn run<S: ByteSource + ?Sized>(&self, source: &S) -> Result<ValidationReport> {
        let header = decode_header(source)?;
        let source_len = source.byte_len()?;
        let probe = probe_footer(source)?;
        let footer = probe.footer().copied();

        let mut report =
            ValidationReport::new(self.label.clone(), self.config.report.max_listed_gaps);
        debug!("Validating {} ({} bytes)", report.label(), source_len);

        // Header
        let structural = header.structural_errors();
        report.header_valid = structural.is_empty();
        for err in &structural {
            report.add_error(err.to_string());
        }
        report.structural_errors = structural;

        // Checksum pass
        let checksum = match footer {
            Some(footer) if self.config.validation.check_checksum && footer.checksum != 0 => {
                let computed = checksum::checksum_prefix(
                    source,
                    source_len - FOOTER_SIZE as u64,
                    self.config.report.read_buffer_size,
                )?;
                Some(ChecksumOutcome {
                    valid: computed == footer.checksum,
                    expected: footer.checksum,
                    computed,
                })
            }
            _ => None,
        };

        // Record pass
        let region = DataRegion::new(source_len, &probe);
        let mut stream = open_region(source, &header, region)?;
        let mut detector = self.config.validation.check_gaps.then(GapDetector::new);
        for record in stream.by_ref() {
            if let (Record::Primary(primary), Some(detector)) = (record?, detector.as_mut()) {
                detector.observe(&primary);
            }
        }
        report.primary_count = stream.primaries_read();
        report.secondary_count = stream.secondaries_read();
        report.stream_end = stream.end();
        drop(stream);

        // Footer
        match probe {
            FooterProbe::Present(footer) => {
                report.footer_present = true;
                report.footer_valid = true;
                report.footer = Some(footer);
                report.expected_primary_count = Some(footer.total_primary);
                report.expected_secondary_count = Some(footer.total_secondary);
                report.dropped_samples = Some(footer.dropped);
            }
            FooterProbe::NoRegion { .. } => {
                report.add_warning(format!("Footer missing - {UNCLEAN_END}"));
            }
            FooterProbe::MagicMismatch { magic } => {
                if footer_written_after_marker(report.stream_end, source_len) {
                    report.add_error(format!(
                        "Invalid footer magic {magic:#010X} after end-of-data marker"
                    ));
                } else {
                    report.add_warning(format!(
                        "No footer magic at end of file (found {magic:#010X}) - {UNCLEAN_END}"
                    ));
                }
            }
        }

        // Checksum
        if let Some(outcome) = checksum {
            report.crc_checked = true;
            report.crc_valid = outcome.valid;
            report.crc_expected = outcome.expected;
            report.crc_computed = outcome.computed;
            if !outcome.valid {
                report.add_error("CRC32 mismatch - file may be corrupted");
            }
        }

        // Counts
        if let Some(footer) = report.footer {
            if report.primary_count != footer.total_primary {
                report.add_warning(format!(
                    "Primary count mismatch: found {}, footer says {}",
                    report.primary_count, footer.total_primary
                ));
            }
            if report.secondary_count != footer.total_secondary {
                report.add_warning(format!(
                    "Secondary count mismatch: found {}, footer says {}",
                    report.secondary_count, footer.total_secondary
                ));
            }
        }

        // Gaps
        if let Some(detector) = detector {
            let (gaps, total_missing) = detector.finish();
            report.gaps = gaps;
            report.total_missing = total_missing;
        }
        if !report.gaps.is_empty() {
            report.add_warning(format!(
                "Found {} sequence gaps ({} missing samples)",
                report.gaps.len(),
                report.total_missing
            ));
        }

        info!(
            "Validated {}: {} ({} errors, {} warnings, {} gaps)",
            report.label(),
            if report.is_valid { "valid" } else { "invalid" },
            report.errors.len(),
            report.warnings.len(),
            report.gaps.len()
        );

        Ok(report)
    }
}

/// A footer-sized block follows the end-of-data marker
///
/// The producer writes the marker and then the footer, so a mismatched
/// tail in that position is a damaged footer rather than a missing one.
fn footer_written_after_marker(end: Option<StreamEnd>, source_len: u64) -> bool {
    match end {
        Some(StreamEnd::Sentinel { offset }) => {
            source_len >= offset + (PRIMARY_RECORD_SIZE + FOOTER_SIZE) as u64
        }
        _ => false,
    }
}

/// Validate `source` with the given checks enabled
///
/// # Errors
///
/// Returns error only if the header is truncated or the source cannot be read
pub fn validate<S: ByteSource + ?Sized>(
    source: &S,
    check_checksum: bool,
    check_gaps: bool,
) -> Result<ValidationReport> {
    let mut config = Config::default();
    config.validation.check_checksum = check_checksum;
    config.validation.check_gaps = check_gaps;
    Validator::new(config).run(source)
}

/// All sequence gaps in `source`
///
/// # Errors
///
/// Returns error only if the header is truncated or the source cannot be read
pub fn find_gaps<S: ByteSource + ?Sized>(source: &S) -> Result<Vec<Gap>> {
    Ok(validate(source, false, true)?.gaps)
}

/// Compare the footer checksum with the file contents
///
/// Returns `None` if there is no footer or it carries no checksum.
///
/// # Errors
///
/// Returns error if the source cannot be read
pub fn verify_checksum<S: ByteSource + ?Sized>(source: &S) -> Result<Option<ChecksumOutcome>> {
    let Some(footer) = probe_footer(source)?.into_footer() else {
        return Ok(None);
    };
    if footer.checksum == 0 {
        return Ok(None);
    }

    let len = source.byte_len()? - FOOTER_SIZE as u64;
    let buffer_size = Config::default().report.read_buffer_size;
    let computed = checksum::checksum_prefix(source, len, buffer_size)?;
    Ok(Some(ChecksumOutcome {
        valid: computed == footer.checksum,
        expected: footer.checksum,
        computed,
    }))
}
