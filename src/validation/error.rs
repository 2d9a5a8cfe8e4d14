use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error classification for the positioning core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositioningError {
    /// Invalid numeric input to a pure function
    #[error("Domain error in {operation}: {reason}")]
    Domain {
        operation: &'static str,
        reason: String,
    },

    /// A linear system required by the computation has no unique solution
    #[error("Singular matrix in {solve} solve (determinant {determinant:e})")]
    SingularMatrix {
        solve: LinearSolve,
        determinant: f64,
    },

    /// A sequence of the wrong length was supplied
    #[error("Expected {expected} {what}, got {actual}")]
    InputCount {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The trilateration system is singular because of the anchor layout
    #[error("Degenerate anchor geometry ({issue}): determinant {determinant:e}")]
    DegenerateGeometry {
        issue: GeometryIssue,
        determinant: f64,
    },

    /// No reading was found for a configured anchor
    #[error("No reading for anchor '{identifier}'")]
    MissingReading { identifier: String },
}

/// Which linear solve failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinearSolve {
    Calibration,
    Trilateration,
}

impl fmt::Display for LinearSolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinearSolve::Calibration => write!(f, "calibration"),
            LinearSolve::Trilateration => write!(f, "trilateration"),
        }
    }
}

/// Types of anchor layouts that make trilateration impossible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryIssue {
    /// All anchors lie on one line
    Collinear,
    /// Two or more anchors share a location
    CoincidentAnchors,
}

impl fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryIssue::Collinear => write!(f, "collinear anchors"),
            GeometryIssue::CoincidentAnchors => write!(f, "coincident anchors"),
        }
    }
}

impl PositioningError {
    /// True for every failure caused by a singular linear system, including degenerate geometry
    pub fn is_singular_matrix(&self) -> bool {
        matches!(
            self,
            PositioningError::SingularMatrix { .. } | PositioningError::DegenerateGeometry { .. }
        )
    }

    /// The linear solve that failed, if any
    pub fn failed_solve(&self) -> Option<LinearSolve> {
        match self {
            PositioningError::SingularMatrix { solve, .. } => Some(*solve),
            PositioningError::DegenerateGeometry { .. } => Some(LinearSolve::Trilateration),
            _ => None,
        }
    }
}

/// Result type for positioning operations
pub type PositioningResult<T> = Result<T, PositioningError>;
