//! Scan error types

use crate::processing::parser::ParseError;
use thiserror::Error;

/// Failures reported by signal sources and the sampler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// The scanning backend could not be reached or failed to run
    #[error("Scanner '{scanner}' unavailable: {reason}")]
    Unavailable { scanner: String, reason: String },
    /// The backend produced output that could not be parsed
    #[error("Failed to parse scan output: {0}")]
    Parse(#[from] ParseError),
    /// The backend has no further scans to offer
    #[error("Scanner '{scanner}' returned no readings")]
    NoReadings { scanner: String },
    /// The requested access point never appeared during sampling
    #[error("No reading for '{identifier}' in {scans} scans")]
    SignalNotFound { identifier: String, scans: u32 },
    /// Reading a capture file failed
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;
