//! Utility modules for configuration

pub mod config;

pub use config::{
    AnchorConfig, CalibrationConfig, ConfigError, ConfigurationManager, PositioningConfig,
};
