//! Averaging of repeated RSS measurements before calibration

use crate::core::CalibrationSample;

/// Arithmetic mean, or `None` for an empty slice
pub fn average_rssi(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Repeated measurements grouped by the known distance they were taken at
#[derive(Debug, Clone, Default)]
pub struct SampleAccumulator {
    points: Vec<(f64, Vec<f64>)>,
}

impl SampleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one RSS measurement taken at `distance`
    pub fn add(&mut self, distance: f64, rssi_dbm: f64) {
        match self.points.iter_mut().find(|(d, _)| *d == distance) {
            Some((_, values)) => values.push(rssi_dbm),
            None => self.points.push((distance, vec![rssi_dbm])),
        }
    }

    /// Record several measurements taken at the same distance
    pub fn extend(&mut self, distance: f64, rssi_values: impl IntoIterator<Item = f64>) {
        for rssi in rssi_values {
            self.add(distance, rssi);
        }
    }

    /// Number of distinct distances recorded
    pub fn distance_count(&self) -> usize {
        self.points.len()
    }

    /// Total number of measurements recorded
    pub fn measurement_count(&self) -> usize {
        self.points.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One averaged sample per distance, ordered by distance
    pub fn averaged_samples(&self) -> Vec<CalibrationSample> {
        let mut samples: Vec<CalibrationSample> = self
            .points
            .iter()
            .filter_map(|(distance, values)| {
                average_rssi(values).map(|rssi| CalibrationSample::new(*distance, rssi))
            })
            .collect();
        samples.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        samples
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
