//! Wi-Fi RSS Positioning System
//!
//! Estimates a device position on a 2-D floor plan from the received signal strength
//! of three access points at known locations. Signal strengths are converted to
//! distances with a calibrated log-distance path-loss model, and the distances are
//! combined by linearized trilateration.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod scanner;
pub mod api;

// Re-export commonly used types
pub use core::{
    AnchorPoint, CalibrationSample, DistanceEstimate, PathLossParameters, Position, SignalReading,
};
pub use algorithms::{CalibrationReport, Calibrator, PathLossModel, Trilaterator};
pub use processing::{ParseError, ScanOutputParser};
pub use validation::{GeometryIssue, LinearSolve, PositioningError, PositioningResult};
pub use utils::{AnchorConfig, ConfigError, ConfigurationManager, PositioningConfig};
pub use scanner::{
    CaptureFileSource, CommandSignalSource, MockSignalSource, RssiSampler, SamplingConfig,
    ScanError, ScannerConfig, SignalSource,
};
pub use api::{OutputFormat, PositionEstimate, PositioningPipeline, ReportFormatter};
