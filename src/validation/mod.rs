//! Error taxonomy and input validation

pub mod data;
pub mod error;

pub use error::{GeometryIssue, LinearSolve, PositioningError, PositioningResult};
