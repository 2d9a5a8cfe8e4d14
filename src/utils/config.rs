use crate::algorithms::Trilaterator;
use crate::core::{
    AnchorPoint, PathLossParameters, SignalReading, DEFAULT_ANCHOR_LAYOUT,
    DEFAULT_CALIBRATION_DISTANCES, MIN_ANCHORS,
};
use crate::scanner::{SamplingConfig, ScannerConfig};
use crate::validation::error::{PositioningError, PositioningResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Access point with a known location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// SSID (or other identifier) reported by scans for this access point
    pub identifier: String,
    pub x: f64,
    pub y: f64,
}

impl AnchorConfig {
    pub fn new(identifier: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            identifier: identifier.into(),
            x,
            y,
        }
    }

    pub fn point(&self) -> AnchorPoint {
        AnchorPoint::new(self.x, self.y)
    }
}

/// Calibration run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Known distances at which samples are taken
    pub distances: Vec<f64>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            distances: DEFAULT_CALIBRATION_DISTANCES.to_vec(),
        }
    }
}

/// Complete configuration of a positioning deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositioningConfig {
    pub path_loss: PathLossParameters,
    /// Anchors in the order their readings are fed to the solver
    pub anchors: Vec<AnchorConfig>,
    pub sampling: SamplingConfig,
    pub calibration: CalibrationConfig,
    pub scanner: ScannerConfig,
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            path_loss: PathLossParameters::default(),
            anchors: DEFAULT_ANCHOR_LAYOUT
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| AnchorConfig::new(format!("AP-{}", i + 1), x, y))
                .collect(),
            sampling: SamplingConfig::default(),
            calibration: CalibrationConfig::default(),
            scanner: ScannerConfig::default(),
        }
    }
}

impl PositioningConfig {
    /// Anchor coordinates in configured order
    pub fn anchor_points(&self) -> Vec<AnchorPoint> {
        self.anchors.iter().map(AnchorConfig::point).collect()
    }

    /// Pick one reading per configured anchor, in anchor order
    ///
    /// Readings for unknown access points are ignored. The first reading wins when an
    /// identifier appears more than once.
    pub fn order_readings(
        &self,
        readings: &[SignalReading],
    ) -> PositioningResult<Vec<SignalReading>> {
        self.anchors
            .iter()
            .map(|anchor| {
                readings
                    .iter()
                    .find(|r| r.identifier() == anchor.identifier)
                    .cloned()
                    .ok_or_else(|| PositioningError::MissingReading {
                        identifier: anchor.identifier.clone(),
                    })
            })
            .collect()
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("Invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Anchor layout cannot produce a position
    #[error("Anchor geometry invalid: {reason}")]
    Geometry { reason: String },
    /// Configuration file I/O error
    #[error("{message}")]
    Io { message: String },
    /// JSON serialization/deserialization error
    #[error("{message}")]
    Serialization { message: String },
}

/// Configuration validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn invalid(&mut self, parameter: &str, value: impl ToString, reason: &str) {
        self.errors.push(ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        });
    }

    fn into_result(self) -> Result<Vec<String>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.warnings),
        }
    }
}

/// Loads, validates and saves [`PositioningConfig`]
pub struct ConfigurationManager {
    config: PositioningConfig,
    config_file_path: Option<PathBuf>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: PositioningConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &PositioningConfig {
        &self.config
    }

    /// Replace the whole configuration after validating it
    pub fn update_config(&mut self, config: PositioningConfig) -> Result<(), ConfigError> {
        Self::apply_validation(&config)?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Install new path-loss parameters, e.g. the result of a calibration run
    pub fn set_path_loss(&mut self, params: PathLossParameters) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.path_loss = params;
        self.update_config(config)
    }

    pub fn set_anchors(&mut self, anchors: Vec<AnchorConfig>) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.anchors = anchors;
        self.update_config(config)
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: PositioningConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        Self::apply_validation(&config)?;

        tracing::info!(path = %path_str, anchors = config.anchors.len(), "configuration loaded");
        self.config = config;
        self.config_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::Serialization {
                message: format!("Failed to serialize config: {}", e),
            }
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        tracing::info!(path = %path_str, "configuration saved");
        self.config_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::Io {
                message: "No file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Validate a configuration without applying it
    pub fn validate_config(config: &PositioningConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        let params = &config.path_loss;
        if !params.reference_rssi.is_finite() {
            result.invalid("path_loss.reference_rssi", params.reference_rssi, "must be finite");
        } else if params.reference_rssi > 0.0 {
            result
                .warnings
                .push(format!("reference RSS {} dBm is unusually high", params.reference_rssi));
        }
        if !params.path_loss_exponent.is_finite() || params.path_loss_exponent == 0.0 {
            result.invalid(
                "path_loss.path_loss_exponent",
                params.path_loss_exponent,
                "must be finite and non-zero",
            );
        } else if !(2.0..=4.0).contains(&params.path_loss_exponent) {
            result.warnings.push(format!(
                "path loss exponent {} is outside the typical indoor range 2-4",
                params.path_loss_exponent
            ));
        }
        if !(params.reference_distance.is_finite() && params.reference_distance > 0.0) {
            result.invalid(
                "path_loss.reference_distance",
                params.reference_distance,
                "must be positive",
            );
        }

        Self::validate_anchors(&config.anchors, &mut result);

        let distances = &config.calibration.distances;
        if let Some(bad) = distances.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
            result.invalid("calibration.distances", bad, "distances must be positive");
        }
        let distinct: HashSet<u64> = distances.iter().map(|d| d.to_bits()).collect();
        if distinct.len() < 2 {
            result.invalid(
                "calibration.distances",
                format!("{:?}", distances),
                "at least two distinct distances are required",
            );
        }

        if config.sampling.samples_per_point == 0 {
            result.invalid("sampling.samples_per_point", 0, "must be at least 1");
        }
        if config.scanner.program.trim().is_empty() {
            result.invalid("scanner.program", "\"\"", "must name a command");
        }

        result.is_valid = result.errors.is_empty();
        result
    }

    fn validate_anchors(anchors: &[AnchorConfig], result: &mut ValidationResult) {
        if anchors.len() < MIN_ANCHORS {
            result.invalid(
                "anchors",
                anchors.len(),
                "at least three anchors are required",
            );
            return;
        }

        let mut identifiers = HashSet::new();
        for anchor in anchors {
            if !identifiers.insert(anchor.identifier.as_str()) {
                result.invalid("anchors.identifier", &anchor.identifier, "duplicate identifier");
            }
            if !(anchor.x.is_finite() && anchor.y.is_finite()) {
                result.invalid(
                    "anchors.position",
                    format!("({}, {})", anchor.x, anchor.y),
                    "coordinates must be finite",
                );
                return;
            }
        }

        let points: Vec<AnchorPoint> = anchors.iter().map(AnchorConfig::point).collect();
        if let Err(e) = Trilaterator::check_geometry(&points[..MIN_ANCHORS]) {
            result.errors.push(ConfigError::Geometry {
                reason: format!("first three anchors: {}", e),
            });
        } else if anchors.len() > MIN_ANCHORS {
            if let Err(e) = Trilaterator::check_geometry(&points) {
                result.errors.push(ConfigError::Geometry {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn apply_validation(config: &PositioningConfig) -> Result<(), ConfigError> {
        let warnings = Self::validate_config(config).into_result()?;
        for warning in warnings {
            tracing::warn!("{}", warning);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PositioningConfig::default();
        assert_eq!(config.anchors.len(), 3);
        assert_eq!(config.anchors[1], AnchorConfig::new("AP-2", 6.0, 3.5));
        assert_eq!(config.calibration.distances.len(), 10);

        let result = ConfigurationManager::validate_config(&config);
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let mut manager = ConfigurationManager::new();
        manager
            .set_anchors(vec![
                AnchorConfig::new("Office", 0.0, 0.0),
                AnchorConfig::new("Lab", 8.0, 0.0),
                AnchorConfig::new("Hall", 0.0, 6.0),
                AnchorConfig::new("Den", 8.0, 6.0),
            ])
            .unwrap();
        manager
            .set_path_loss(PathLossParameters::at_unit_distance(-44.0, 2.9))
            .unwrap();
        assert!(manager.is_modified());

        let path = temp_path("wifi_config_roundtrip");
        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.config(), manager.config());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_path("wifi_config_partial");
        fs::write(
            &path,
            r#"{ "path_loss": { "reference_rssi": -45.0, "path_loss_exponent": 3.0 } }"#,
        )
        .unwrap();

        let manager = ConfigurationManager::from_file(&path).unwrap();
        let config = manager.config();
        assert_eq!(config.path_loss.reference_distance, 1.0);
        assert_eq!(config.anchors, PositioningConfig::default().anchors);
        assert_eq!(config.sampling, SamplingConfig::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let json = r#"{
            "sampling": { "samples_per_point": 5 },
            "calibration": {},
            "scanner": { "program": "iw" }
        }"#;
        let config: PositioningConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.sampling.samples_per_point, 5);
        assert_eq!(config.sampling.pause_ms, SamplingConfig::default().pause_ms);
        assert_eq!(config.sampling.identifier, None);
        assert_eq!(config.calibration, CalibrationConfig::default());
        assert_eq!(config.scanner.program, "iw");
        assert_eq!(config.scanner.args, ScannerConfig::default().args);
        assert!(ConfigurationManager::validate_config(&config).is_valid);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigurationManager::from_file(temp_path("wifi_config_missing"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_zero_exponent_rejected() {
        let mut manager = ConfigurationManager::new();
        let result = manager.set_path_loss(PathLossParameters::at_unit_distance(-40.0, 0.0));
        assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));
        assert_eq!(manager.config().path_loss, PathLossParameters::default());
    }

    #[test]
    fn test_unusual_exponent_warns() {
        let mut config = PositioningConfig::default();
        config.path_loss.path_loss_exponent = 5.5;
        let result = ConfigurationManager::validate_config(&config);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_anchor_validation() {
        let mut manager = ConfigurationManager::new();

        let duplicate = vec![
            AnchorConfig::new("a", 0.0, 0.0),
            AnchorConfig::new("a", 5.0, 0.0),
            AnchorConfig::new("b", 0.0, 5.0),
        ];
        assert!(manager.set_anchors(duplicate).is_err());

        let collinear = vec![
            AnchorConfig::new("a", 0.0, 0.0),
            AnchorConfig::new("b", 1.0, 1.0),
            AnchorConfig::new("c", 2.0, 2.0),
        ];
        assert!(matches!(
            manager.set_anchors(collinear),
            Err(ConfigError::Geometry { .. })
        ));

        let too_few = vec![AnchorConfig::new("a", 0.0, 0.0), AnchorConfig::new("b", 1.0, 0.0)];
        assert!(manager.set_anchors(too_few).is_err());
    }

    #[test]
    fn test_calibration_distance_validation() {
        let mut config = PositioningConfig::default();
        config.calibration.distances = vec![2.0, 2.0];
        assert!(!ConfigurationManager::validate_config(&config).is_valid);

        config.calibration.distances = vec![1.0, -2.0, 3.0];
        assert!(!ConfigurationManager::validate_config(&config).is_valid);
    }

    #[test]
    fn test_order_readings() {
        let config = PositioningConfig::default();
        let readings = vec![
            SignalReading::new("AP-3", -70.0),
            SignalReading::new("Neighbour", -85.0),
            SignalReading::new("AP-1", -55.0),
            SignalReading::new("AP-2", -60.0),
            SignalReading::new("AP-1", -90.0),
        ];
        let ordered = config.order_readings(&readings).unwrap();
        let ids: Vec<&str> = ordered.iter().map(|r| r.identifier()).collect();
        assert_eq!(ids, vec!["AP-1", "AP-2", "AP-3"]);
        assert_eq!(ordered[0].rssi_dbm(), -55.0);

        let result = config.order_readings(&readings[..2]);
        assert_eq!(
            result,
            Err(PositioningError::MissingReading {
                identifier: "AP-1".to_string()
            })
        );
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::Io { .. })));
    }
}
