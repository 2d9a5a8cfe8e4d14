//! Core data types for the positioning system

use crate::core::constants::{
    DEFAULT_PATH_LOSS_EXPONENT, DEFAULT_REFERENCE_DISTANCE, DEFAULT_REFERENCE_RSSI_DBM,
};
use crate::validation::error::{PositioningError, PositioningResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Estimated distance to an access point, in the caller's distance unit
pub type DistanceEstimate = f64;

/// Signal strength of one access point as reported by a scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReading {
    identifier: String,
    rssi_dbm: f64,
}

impl SignalReading {
    pub fn new(identifier: impl Into<String>, rssi_dbm: f64) -> Self {
        Self {
            identifier: identifier.into(),
            rssi_dbm,
        }
    }

    /// SSID or other access point identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Received signal strength (dBm)
    pub fn rssi_dbm(&self) -> f64 {
        self.rssi_dbm
    }
}

impl fmt::Display for SignalReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} dBm)", self.identifier, self.rssi_dbm)
    }
}

/// Known location of an access point in the positioning plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub x: f64,
    pub y: f64,
}

impl AnchorPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &AnchorPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub(crate) fn norm_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

/// Estimated device position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, anchor: &AnchorPoint) -> f64 {
        ((self.x - anchor.x).powi(2) + (self.y - anchor.y).powi(2)).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Parameters of the log-distance path-loss model
///
/// `rssi(d) = reference_rssi - 10 * path_loss_exponent * log10(d / reference_distance)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathLossParameters {
    /// RSS at `reference_distance` (dBm)
    pub reference_rssi: f64,
    /// Decay rate, typically 2-4 indoors
    pub path_loss_exponent: f64,
    /// Distance at which `reference_rssi` holds; must be positive
    #[serde(default = "default_reference_distance")]
    pub reference_distance: f64,
}

fn default_reference_distance() -> f64 {
    DEFAULT_REFERENCE_DISTANCE
}

impl PathLossParameters {
    /// Create parameters with an explicit reference distance
    pub fn new(
        reference_rssi: f64,
        path_loss_exponent: f64,
        reference_distance: f64,
    ) -> PositioningResult<Self> {
        let params = Self {
            reference_rssi,
            path_loss_exponent,
            reference_distance,
        };
        params.check_reference_distance()?;
        Ok(params)
    }

    /// Create parameters referenced to one distance unit
    pub fn at_unit_distance(reference_rssi: f64, path_loss_exponent: f64) -> Self {
        Self {
            reference_rssi,
            path_loss_exponent,
            reference_distance: DEFAULT_REFERENCE_DISTANCE,
        }
    }

    pub(crate) fn check_reference_distance(&self) -> PositioningResult<()> {
        if !(self.reference_distance.is_finite() && self.reference_distance > 0.0) {
            return Err(PositioningError::Domain {
                operation: "path loss parameters",
                reason: format!(
                    "reference distance must be positive, got {}",
                    self.reference_distance
                ),
            });
        }
        Ok(())
    }
}

impl Default for PathLossParameters {
    fn default() -> Self {
        Self::at_unit_distance(DEFAULT_REFERENCE_RSSI_DBM, DEFAULT_PATH_LOSS_EXPONENT)
    }
}

impl fmt::Display for PathLossParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reference RSS {:.2} dBm @ {}, exponent {:.2}",
            self.reference_rssi, self.reference_distance, self.path_loss_exponent
        )
    }
}

/// RSS observed at a known distance from the access point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSample {
    pub distance: f64,
    pub rssi_dbm: f64,
}

impl CalibrationSample {
    pub fn new(distance: f64, rssi_dbm: f64) -> Self {
        Self { distance, rssi_dbm }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = PathLossParameters::default();
        assert_eq!(params.reference_rssi, DEFAULT_REFERENCE_RSSI_DBM);
        assert_eq!(params.path_loss_exponent, DEFAULT_PATH_LOSS_EXPONENT);
        assert_eq!(params.reference_distance, 1.0);
    }

    #[test]
    fn test_reference_distance_must_be_positive() {
        assert!(PathLossParameters::new(-40.0, 3.0, 1.0).is_ok());
        assert!(matches!(
            PathLossParameters::new(-40.0, 3.0, 0.0),
            Err(PositioningError::Domain { .. })
        ));
        assert!(PathLossParameters::new(-40.0, 3.0, -2.0).is_err());
    }

    #[test]
    fn test_reference_distance_defaults_when_deserialized() {
        let params: PathLossParameters =
            serde_json::from_str(r#"{"reference_rssi": -45.0, "path_loss_exponent": 2.5}"#)
                .unwrap();
        assert_eq!(params.reference_distance, 1.0);
    }

    #[test]
    fn test_signal_reading_accessors() {
        let reading = SignalReading::new("office-ap", -61.5);
        assert_eq!(reading.identifier(), "office-ap");
        assert_eq!(reading.rssi_dbm(), -61.5);
        assert_eq!(reading.to_string(), "office-ap (-61.5 dBm)");
    }

    #[test]
    fn test_position_distance() {
        let p = Position::new(3.0, 4.0);
        assert_eq!(p.distance_to(&AnchorPoint::new(0.0, 0.0)), 5.0);
    }
}
