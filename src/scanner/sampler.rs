//! Repeated sampling of a signal source
//!
//! Single scans are noisy, so both live positioning and calibration average several
//! scans. Scans are spaced by a configurable pause.

use crate::core::{
    CalibrationSample, SignalReading, DEFAULT_SAMPLES_PER_POINT, DEFAULT_SAMPLE_PAUSE_MS,
};
use crate::processing::averaging::{average_rssi, SampleAccumulator};
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::source::SignalSource;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How many scans to take and how far apart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Scans averaged per measurement
    pub samples_per_point: u32,
    /// Pause between consecutive scans (milliseconds)
    pub pause_ms: u64,
    /// Access point sampled during calibration
    pub identifier: Option<String>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples_per_point: DEFAULT_SAMPLES_PER_POINT,
            pause_ms: DEFAULT_SAMPLE_PAUSE_MS,
            identifier: None,
        }
    }
}

impl SamplingConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

/// Averages repeated scans from a [`SignalSource`]
pub struct RssiSampler<S: SignalSource> {
    source: S,
    config: SamplingConfig,
}

impl<S: SignalSource> RssiSampler<S> {
    pub fn new(source: S, config: SamplingConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Mean RSS of one access point over `samples_per_point` scans
    ///
    /// Scans in which the access point is missing are skipped; a scan failure aborts.
    pub fn average_signal(&mut self, identifier: &str) -> ScanResult<f64> {
        let scans = self.config.samples_per_point.max(1);
        let mut values = Vec::with_capacity(scans as usize);

        for scan_index in 0..scans {
            if scan_index > 0 {
                self.pause();
            }
            let readings = self.source.scan()?;
            match readings.iter().find(|r| r.identifier() == identifier) {
                Some(reading) => values.push(reading.rssi_dbm()),
                None => tracing::warn!(
                    identifier,
                    scan = scan_index + 1,
                    "access point missing from scan"
                ),
            }
        }

        let average = average_rssi(&values).ok_or_else(|| ScanError::SignalNotFound {
            identifier: identifier.to_string(),
            scans,
        })?;
        tracing::debug!(identifier, average, seen = values.len(), scans, "averaged signal");
        Ok(average)
    }

    /// Averaged readings of every access point seen across `samples_per_point` scans,
    /// in order of first appearance
    pub fn averaged_scan(&mut self) -> ScanResult<Vec<SignalReading>> {
        let scans = self.config.samples_per_point.max(1);
        let mut seen: Vec<(String, Vec<f64>)> = Vec::new();

        for scan_index in 0..scans {
            if scan_index > 0 {
                self.pause();
            }
            for reading in self.source.scan()? {
                match seen.iter_mut().find(|(id, _)| id == reading.identifier()) {
                    Some((_, values)) => values.push(reading.rssi_dbm()),
                    None => seen.push((reading.identifier().to_string(), vec![reading.rssi_dbm()])),
                }
            }
        }

        if seen.is_empty() {
            return Err(ScanError::NoReadings {
                scanner: self.source.name().to_string(),
            });
        }

        Ok(seen
            .into_iter()
            .filter_map(|(id, values)| {
                average_rssi(&values).map(|rssi| SignalReading::new(id, rssi))
            })
            .collect())
    }

    /// One averaged calibration sample taken at a known distance
    pub fn collect_sample(
        &mut self,
        distance: f64,
        identifier: &str,
    ) -> ScanResult<CalibrationSample> {
        let rssi = self.average_signal(identifier)?;
        Ok(CalibrationSample::new(distance, rssi))
    }

    /// Averaged calibration samples for each distance
    ///
    /// `before_point` runs before sampling each distance, e.g. to let the operator move
    /// the device into place.
    pub fn collect_samples<F>(
        &mut self,
        distances: &[f64],
        identifier: &str,
        mut before_point: F,
    ) -> ScanResult<Vec<CalibrationSample>>
    where
        F: FnMut(f64),
    {
        let mut accumulator = SampleAccumulator::new();
        for &distance in distances {
            before_point(distance);
            let rssi = self.average_signal(identifier)?;
            tracing::info!(distance, rssi, "calibration point sampled");
            accumulator.add(distance, rssi);
        }
        Ok(accumulator.averaged_samples())
    }

    fn pause(&self) {
        if self.config.pause_ms > 0 {
            std::thread::sleep(self.config.pause());
        }
    }
}
