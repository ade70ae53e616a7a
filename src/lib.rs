//! lclog - decoder and integrity validator for load-cell datalogger logs
//!
//! Logs hold a 64-byte header, fixed-width force samples interleaved with
//! inertial samples at a rate ratio, an optional end-of-data sentinel and an
//! optional 32-byte footer written on clean stop. Decoding is streaming and
//! single-pass, so memory use does not depend on file size.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::field_reassign_with_default,
    clippy::multiple_crate_versions
)]

pub mod config;
pub mod decode;
pub mod error;
pub mod format;
mod log_file;
pub mod source;
pub mod validate;

#[cfg(test)]
mod fixture;

pub use decode::{decode_footer, decode_header, open_record_stream, probe_footer};
pub use error::{FormatError, LogError, Result};
pub use log_file::LogFile;
pub use validate::{find_gaps, validate, verify_checksum, ValidationReport, Validator};
