//! Mock signal source for testing and development

use crate::core::SignalReading;
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::source::SignalSource;
use std::collections::VecDeque;

/// Signal source that replays canned scans
pub struct MockSignalSource {
    name: String,
    scans: VecDeque<Vec<SignalReading>>,
    repeat_last: bool,
    last_scan: Option<Vec<SignalReading>>,
    connected: bool,
    scan_count: u32,
}

impl MockSignalSource {
    /// Create a new mock source with no queued scans
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            scans: VecDeque::new(),
            repeat_last: false,
            last_scan: None,
            connected: true,
            scan_count: 0,
        }
    }

    /// Create a mock source preloaded with scans
    pub fn with_scans(scans: Vec<Vec<SignalReading>>) -> Self {
        let mut source = Self::new();
        source.scans.extend(scans);
        source
    }

    /// Keep returning the final scan once the queue is drained
    pub fn repeat_last_scan(mut self, repeat: bool) -> Self {
        self.repeat_last = repeat;
        self
    }

    /// Queue one scan
    pub fn push_scan(&mut self, readings: Vec<SignalReading>) {
        self.scans.push_back(readings);
    }

    /// Queue one scan built from `(identifier, rssi_dbm)` pairs
    pub fn push_readings(&mut self, pairs: &[(&str, f64)]) {
        self.push_scan(
            pairs
                .iter()
                .map(|(id, rssi)| SignalReading::new(*id, *rssi))
                .collect(),
        );
    }

    /// Simulate the scanning backend going away
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
    }

    /// Number of successful scans served
    pub fn scan_count(&self) -> u32 {
        self.scan_count
    }

    pub fn queued_scan_count(&self) -> usize {
        self.scans.len()
    }
}

impl Default for MockSignalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for MockSignalSource {
    fn scan(&mut self) -> ScanResult<Vec<SignalReading>> {
        if !self.connected {
            return Err(ScanError::Unavailable {
                scanner: self.name.clone(),
                reason: "disconnected".to_string(),
            });
        }

        let scan = match self.scans.pop_front() {
            Some(scan) => scan,
            None => match (&self.last_scan, self.repeat_last) {
                (Some(last), true) => last.clone(),
                _ => {
                    return Err(ScanError::NoReadings {
                        scanner: self.name.clone(),
                    })
                }
            },
        };

        self.scan_count += 1;
        self.last_scan = Some(scan.clone());
        Ok(scan)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
