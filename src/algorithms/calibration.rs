//! Path-loss parameter estimation
//!
//! Fits the linearized model `rssi = P0 - 10 n log10(d / d0)` by ordinary least
//! squares. With design matrix `Z` (rows `[1, -10 log10(d_i / d0)]`) and targets `Y`
//! the normal equations give `X = (Z^T Z)^-1 Z^T Y`, where `X = [P0, n]`.

use crate::core::{
    CalibrationSample, PathLossParameters, DEFAULT_REFERENCE_DISTANCE, DEGENERACY_TOLERANCE,
};
use crate::validation::data::{ensure_positive, validate_sample};
use crate::validation::error::{LinearSolve, PositioningError, PositioningResult};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Least-squares estimator for [`PathLossParameters`]
#[derive(Debug, Clone)]
pub struct Calibrator {
    reference_distance: f64,
}

/// Fitted parameters together with goodness-of-fit figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub parameters: PathLossParameters,
    pub sample_count: usize,
    pub distinct_distances: usize,
    /// Root-mean-square residual of the fit (dB)
    pub rms_residual_db: f64,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            reference_distance: DEFAULT_REFERENCE_DISTANCE,
        }
    }
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit against a reference distance other than one unit
    pub fn with_reference_distance(reference_distance: f64) -> PositioningResult<Self> {
        ensure_positive("calibration", "reference distance", reference_distance)?;
        Ok(Self { reference_distance })
    }

    pub fn reference_distance(&self) -> f64 {
        self.reference_distance
    }

    /// Estimate reference RSS and path-loss exponent from samples at known distances
    pub fn fit(&self, samples: &[CalibrationSample]) -> PositioningResult<PathLossParameters> {
        self.fit_with_report(samples).map(|report| report.parameters)
    }

    /// Same as [`Calibrator::fit`], also reporting the residual of the fit
    pub fn fit_with_report(
        &self,
        samples: &[CalibrationSample],
    ) -> PositioningResult<CalibrationReport> {
        for sample in samples {
            validate_sample(sample)?;
        }

        let distinct_distances = count_distinct_distances(samples);
        if distinct_distances < 2 {
            return Err(PositioningError::SingularMatrix {
                solve: LinearSolve::Calibration,
                determinant: 0.0,
            });
        }

        let n = samples.len();
        let z = DMatrix::from_fn(n, 2, |row, col| {
            if col == 0 {
                1.0
            } else {
                -10.0 * (samples[row].distance / self.reference_distance).log10()
            }
        });
        let y = DVector::from_iterator(n, samples.iter().map(|s| s.rssi_dbm));

        let z_t = z.transpose();
        let z_t_z = &z_t * &z;

        let determinant = z_t_z.determinant();
        let scale = z_t_z[(0, 0)] * z_t_z[(1, 1)];
        if !(determinant.abs() > DEGENERACY_TOLERANCE * scale) {
            return Err(PositioningError::SingularMatrix {
                solve: LinearSolve::Calibration,
                determinant,
            });
        }

        let inverse = z_t_z
            .try_inverse()
            .ok_or(PositioningError::SingularMatrix {
                solve: LinearSolve::Calibration,
                determinant,
            })?;
        let x = inverse * (&z_t * &y);

        let residuals = &y - &z * &x;
        let rms_residual_db = (residuals.norm_squared() / n as f64).sqrt();

        Ok(CalibrationReport {
            parameters: PathLossParameters {
                reference_rssi: x[0],
                path_loss_exponent: x[1],
                reference_distance: self.reference_distance,
            },
            sample_count: n,
            distinct_distances,
            rms_residual_db,
        })
    }
}

fn count_distinct_distances(samples: &[CalibrationSample]) -> usize {
    let mut distances: Vec<f64> = samples.iter().map(|s| s.distance).collect();
    distances.sort_by(|a, b| a.total_cmp(b));
    distances.dedup();
    distances.len()
}

impl fmt::Display for CalibrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reference RSS: {:.2} dBm", self.parameters.reference_rssi)?;
        writeln!(f, "Path Loss Exponent: {:.2}", self.parameters.path_loss_exponent)?;
        write!(
            f,
            "Samples: {} ({} distances), RMS residual {:.2} dB",
            self.sample_count,
            self.distinct_distances,
            self.rms_residual_db
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::path_loss::PathLossModel;

    fn synthetic_samples(params: &PathLossParameters, distances: &[f64]) -> Vec<CalibrationSample> {
        distances
            .iter()
            .map(|&d| CalibrationSample::new(d, PathLossModel::expected_rssi(d, params).unwrap()))
            .collect()
    }

    #[test]
    fn test_recovers_noiseless_parameters() {
        let truth = PathLossParameters::at_unit_distance(-40.0, 3.0);
        let samples = synthetic_samples(&truth, &[1.0, 2.0, 4.0, 8.0]);

        let fitted = Calibrator::new().fit(&samples).unwrap();
        assert!((fitted.reference_rssi - (-40.0)).abs() < 1e-9);
        assert!((fitted.path_loss_exponent - 3.0).abs() < 1e-9);
        assert_eq!(fitted.reference_distance, 1.0);
    }

    #[test]
    fn test_report_residual_is_zero_without_noise() {
        let truth = PathLossParameters::default();
        let samples = synthetic_samples(&truth, &crate::core::DEFAULT_CALIBRATION_DISTANCES);
        let report = Calibrator::new().fit_with_report(&samples).unwrap();
        assert_eq!(report.sample_count, 10);
        assert_eq!(report.distinct_distances, 10);
        assert!(report.rms_residual_db < 1e-9);
        assert!((report.parameters.path_loss_exponent - truth.path_loss_exponent).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_fit_stays_close() {
        let truth = PathLossParameters::at_unit_distance(-45.0, 2.5);
        let noise = [0.8, -0.6, 0.3, -0.9, 0.5, -0.2, 0.7, -0.4];
        let distances = [1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.5, 8.0];
        let samples: Vec<CalibrationSample> = distances
            .iter()
            .zip(noise.iter())
            .map(|(&d, &e)| {
                CalibrationSample::new(d, PathLossModel::expected_rssi(d, &truth).unwrap() + e)
            })
            .collect();

        let report = Calibrator::new().fit_with_report(&samples).unwrap();
        assert!((report.parameters.reference_rssi - truth.reference_rssi).abs() < 1.5);
        assert!((report.parameters.path_loss_exponent - truth.path_loss_exponent).abs() < 0.5);
        assert!(report.rms_residual_db > 0.0 && report.rms_residual_db < 1.0);
    }

    #[test]
    fn test_custom_reference_distance() {
        let truth = PathLossParameters::new(-50.0, 2.2, 2.0).unwrap();
        let samples = synthetic_samples(&truth, &[1.0, 2.0, 3.0, 5.0, 9.0]);

        let calibrator = Calibrator::with_reference_distance(2.0).unwrap();
        let fitted = calibrator.fit(&samples).unwrap();
        assert!((fitted.reference_rssi - (-50.0)).abs() < 1e-9);
        assert!((fitted.path_loss_exponent - 2.2).abs() < 1e-9);
        assert_eq!(fitted.reference_distance, 2.0);
    }

    #[test]
    fn test_identical_distances_are_singular() {
        let samples = vec![
            CalibrationSample::new(2.0, -50.0),
            CalibrationSample::new(2.0, -52.0),
            CalibrationSample::new(2.0, -51.0),
        ];
        let result = Calibrator::new().fit(&samples);
        assert!(matches!(
            result,
            Err(PositioningError::SingularMatrix {
                solve: LinearSolve::Calibration,
                ..
            })
        ));
    }

    #[test]
    fn test_too_few_samples_are_singular() {
        assert!(matches!(
            Calibrator::new().fit(&[]),
            Err(PositioningError::SingularMatrix { .. })
        ));
        assert!(matches!(
            Calibrator::new().fit(&[CalibrationSample::new(1.0, -40.0)]),
            Err(PositioningError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_two_distinct_distances_suffice() {
        let truth = PathLossParameters::at_unit_distance(-38.0, 2.0);
        let samples = synthetic_samples(&truth, &[1.0, 10.0]);
        let fitted = Calibrator::new().fit(&samples).unwrap();
        assert!((fitted.reference_rssi - (-38.0)).abs() < 1e-9);
        assert!((fitted.path_loss_exponent - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_distance_is_domain_error() {
        let samples = vec![
            CalibrationSample::new(1.0, -40.0),
            CalibrationSample::new(0.0, -30.0),
            CalibrationSample::new(4.0, -58.0),
        ];
        assert!(matches!(
            Calibrator::new().fit(&samples),
            Err(PositioningError::Domain { .. })
        ));

        let samples = vec![
            CalibrationSample::new(-2.0, -40.0),
            CalibrationSample::new(4.0, -58.0),
        ];
        assert!(matches!(
            Calibrator::new().fit(&samples),
            Err(PositioningError::Domain { .. })
        ));
    }

    #[test]
    fn test_invalid_reference_distance() {
        assert!(Calibrator::with_reference_distance(0.0).is_err());
    }
}
