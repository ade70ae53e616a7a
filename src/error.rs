//! Error types for lclog

use std::io;
use thiserror::Error;

/// Result type for lclog operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Errors that can occur while reading a log file
///
/// Only conditions that make a pass impossible are errors. Malformed but
/// well-sized data is reported through [`crate::validate::ValidationReport`].
#[derive(Debug, Error)]
pub enum LogError {
    /// I/O error on the byte source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fixed-size region could not be decoded
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Log file not found
    #[error("Log file not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Errors raised while decoding a mandatory fixed-size region
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Source ended before the region was complete
    #[error("{region} truncated: need {needed} bytes, only {available} available")]
    Truncated {
        /// Name of the region being decoded
        region: &'static str,
        /// Bytes the region requires
        needed: usize,
        /// Bytes actually available
        available: usize,
    },
}
