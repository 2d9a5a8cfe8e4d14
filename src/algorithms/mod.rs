//! Core positioning algorithms

pub mod calibration;
pub mod path_loss;
pub mod trilateration;

pub use calibration::{CalibrationReport, Calibrator};
pub use path_loss::PathLossModel;
pub use trilateration::Trilaterator;
