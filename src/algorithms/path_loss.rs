//! Log-distance path-loss model
//!
//! Converts received signal strength into an estimated distance:
//!
//! `d = d0 * 10^((P0 - rssi) / (10 * n))`
//!
//! where `P0` is the RSS at reference distance `d0` and `n` is the path-loss exponent.

use crate::core::{DistanceEstimate, PathLossParameters, SignalReading};
use crate::validation::data::{ensure_finite, ensure_positive};
use crate::validation::error::{PositioningError, PositioningResult};

/// Stateless RSS/distance conversions
pub struct PathLossModel;

impl PathLossModel {
    /// Estimate the distance at which `rssi_dbm` would be received
    pub fn distance(
        rssi_dbm: f64,
        params: &PathLossParameters,
    ) -> PositioningResult<DistanceEstimate> {
        Self::check_parameters(params)?;
        ensure_finite("path loss distance", "rssi_dbm", rssi_dbm)?;

        let exponent =
            (params.reference_rssi - rssi_dbm) / (10.0 * params.path_loss_exponent);
        let distance = params.reference_distance * 10_f64.powf(exponent);
        if !distance.is_finite() {
            return Err(PositioningError::Domain {
                operation: "path loss distance",
                reason: format!("{} dBm maps to a distance beyond the f64 range", rssi_dbm),
            });
        }
        Ok(distance)
    }

    /// Expected RSS at `distance`; the forward form of [`PathLossModel::distance`]
    pub fn expected_rssi(distance: f64, params: &PathLossParameters) -> PositioningResult<f64> {
        Self::check_parameters(params)?;
        ensure_positive("path loss rssi", "distance", distance)?;

        Ok(params.reference_rssi
            - 10.0 * params.path_loss_exponent * (distance / params.reference_distance).log10())
    }

    /// Convert every reading, preserving order
    pub fn distances(
        readings: &[SignalReading],
        params: &PathLossParameters,
    ) -> PositioningResult<Vec<DistanceEstimate>> {
        readings
            .iter()
            .map(|reading| Self::distance(reading.rssi_dbm(), params))
            .collect()
    }

    fn check_parameters(params: &PathLossParameters) -> PositioningResult<()> {
        params.check_reference_distance()?;
        ensure_finite("path loss model", "reference_rssi", params.reference_rssi)?;
        ensure_finite("path loss model", "path_loss_exponent", params.path_loss_exponent)?;
        if params.path_loss_exponent == 0.0 {
            return Err(PositioningError::Domain {
                operation: "path loss model",
                reason: "path loss exponent must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(reference_rssi: f64, n: f64, d0: f64) -> PathLossParameters {
        PathLossParameters::new(reference_rssi, n, d0).unwrap()
    }

    #[test]
    fn test_reference_rssi_maps_to_reference_distance() {
        let p = params(-40.0, 3.0, 1.0);
        let d = PathLossModel::distance(-40.0, &p).unwrap();
        assert!((d - 1.0).abs() < 1e-12);

        let p = params(-40.0, 3.0, 2.5);
        let d = PathLossModel::distance(-40.0, &p).unwrap();
        assert!((d - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_known_distance() {
        // 30 dB of loss with n = 3 is one decade of distance
        let p = params(-40.0, 3.0, 1.0);
        let d = PathLossModel::distance(-70.0, &p).unwrap();
        assert!((d - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            params(-41.4568, 3.6105, 1.0),
            params(-30.0, 2.0, 1.0),
            params(-55.0, 4.2, 0.5),
            params(-48.0, 2.7, 3.0),
        ];
        for p in &cases {
            for &d in &[0.1, 0.75, 1.0, 2.0, 6.5, 37.0, 250.0] {
                let rssi = PathLossModel::expected_rssi(d, p).unwrap();
                let recovered = PathLossModel::distance(rssi, p).unwrap();
                assert!(
                    (recovered - d).abs() < 1e-9 * d.max(1.0),
                    "expected {}, got {}",
                    d,
                    recovered
                );
            }
        }
    }

    #[test]
    fn test_monotonic_in_rssi() {
        let p = PathLossParameters::default();
        let mut previous = PathLossModel::distance(-20.0, &p).unwrap();
        for step in 1..80 {
            let rssi = -20.0 - step as f64;
            let d = PathLossModel::distance(rssi, &p).unwrap();
            assert!(d > previous, "distance must grow as rssi drops");
            previous = d;
        }
    }

    #[test]
    fn test_zero_exponent_is_domain_error() {
        let p = PathLossParameters::at_unit_distance(-40.0, 0.0);
        let result = PathLossModel::distance(-60.0, &p);
        assert!(matches!(result, Err(PositioningError::Domain { .. })));
    }

    #[test]
    fn test_invalid_reference_distance_rejected() {
        let p = PathLossParameters {
            reference_rssi: -40.0,
            path_loss_exponent: 3.0,
            reference_distance: 0.0,
        };
        assert!(PathLossModel::distance(-60.0, &p).is_err());
        assert!(PathLossModel::expected_rssi(1.0, &p).is_err());
    }

    #[test]
    fn test_expected_rssi_rejects_non_positive_distance() {
        let p = PathLossParameters::default();
        assert!(PathLossModel::expected_rssi(0.0, &p).is_err());
        assert!(PathLossModel::expected_rssi(-3.0, &p).is_err());
    }

    #[test]
    fn test_distances_preserve_order() {
        let p = params(-40.0, 2.0, 1.0);
        let readings = vec![
            SignalReading::new("a", -40.0),
            SignalReading::new("b", -60.0),
            SignalReading::new("c", -50.0),
        ];
        let d = PathLossModel::distances(&readings, &p).unwrap();
        assert!((d[0] - 1.0).abs() < 1e-12);
        assert!((d[1] - 10.0).abs() < 1e-9);
        assert!((d[2] - 10_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_nan_rssi_rejected() {
        let p = PathLossParameters::default();
        assert!(PathLossModel::distance(f64::NAN, &p).is_err());
    }

    #[test]
    fn test_overflowing_distance_is_domain_error() {
        let p = PathLossParameters::default();
        let result = PathLossModel::distance(-20000.0, &p);
        assert!(matches!(result, Err(PositioningError::Domain { .. })));

        let tiny_exponent = PathLossParameters::at_unit_distance(-40.0, 1e-300);
        assert!(PathLossModel::distance(-41.0, &tiny_exponent).is_err());
    }
}
