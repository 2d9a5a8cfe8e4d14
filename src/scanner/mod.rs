//! Signal acquisition boundary
//!
//! The positioning core only consumes finished lists of readings and calibration
//! samples. This module provides the capability trait that produces them, plus a
//! command-backed source, a capture-file source, a mock source and a sampler that
//! averages repeated scans.

pub mod command;
pub mod error;
pub mod mock;
pub mod sampler;
pub mod source;

pub use command::{CaptureFileSource, CommandSignalSource};
pub use error::{ScanError, ScanResult};
pub use mock::MockSignalSource;
pub use sampler::{RssiSampler, SamplingConfig};
pub use source::{ScannerConfig, SignalSource};
