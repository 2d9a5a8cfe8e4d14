//! Numeric input checks shared by the positioning algorithms

use crate::core::{AnchorPoint, CalibrationSample, SignalReading};
use crate::validation::error::{PositioningError, PositioningResult};

/// Reject NaN and infinite values
pub fn ensure_finite(operation: &'static str, name: &str, value: f64) -> PositioningResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PositioningError::Domain {
            operation,
            reason: format!("{} must be finite, got {}", name, value),
        })
    }
}

/// Reject values that are not strictly positive
pub fn ensure_positive(operation: &'static str, name: &str, value: f64) -> PositioningResult<f64> {
    ensure_finite(operation, name, value)?;
    if value <= 0.0 {
        return Err(PositioningError::Domain {
            operation,
            reason: format!("{} must be positive, got {}", name, value),
        });
    }
    Ok(value)
}

/// Check that a sequence has exactly the expected length
pub fn ensure_count(what: &'static str, expected: usize, actual: usize) -> PositioningResult<()> {
    if actual != expected {
        return Err(PositioningError::InputCount {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Check that a sequence has at least `minimum` entries
pub fn ensure_min_count(
    what: &'static str,
    minimum: usize,
    actual: usize,
) -> PositioningResult<()> {
    if actual < minimum {
        return Err(PositioningError::InputCount {
            what,
            expected: minimum,
            actual,
        });
    }
    Ok(())
}

pub fn validate_reading(reading: &SignalReading) -> PositioningResult<()> {
    ensure_finite("signal reading", "rssi_dbm", reading.rssi_dbm())?;
    Ok(())
}

pub fn validate_anchor(anchor: &AnchorPoint) -> PositioningResult<()> {
    ensure_finite("anchor", "x", anchor.x)?;
    ensure_finite("anchor", "y", anchor.y)?;
    Ok(())
}

/// Distances feed `log10`, so they must be strictly positive
pub fn validate_sample(sample: &CalibrationSample) -> PositioningResult<()> {
    ensure_positive("calibration", "sample distance", sample.distance)?;
    ensure_finite("calibration", "sample rssi_dbm", sample.rssi_dbm)?;
    Ok(())
}
