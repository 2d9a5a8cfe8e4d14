//! Output formatting for position estimates and calibration results

use crate::algorithms::CalibrationReport;
use crate::api::pipeline::PositionEstimate;
use crate::core::SignalReading;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Text formatting failed")]
    Text(#[from] std::fmt::Error),
}

/// Renders results for display
pub trait ReportFormatter {
    fn format_position(&self, estimate: &PositionEstimate) -> Result<String, FormatError>;
    fn format_calibration(&self, report: &CalibrationReport) -> Result<String, FormatError>;
    fn format_readings(&self, readings: &[SignalReading]) -> Result<String, FormatError>;
}

impl OutputFormat {
    pub fn formatter(&self) -> Box<dyn ReportFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::default()),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

/// Plain text formatter
#[derive(Debug, Clone)]
pub struct TextFormatter {
    /// Decimal places for coordinates and distances
    pub precision: usize,
    /// Include the per-anchor ranges
    pub show_ranges: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            precision: 2,
            show_ranges: true,
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format_position(&self, estimate: &PositionEstimate) -> Result<String, FormatError> {
        let p = self.precision;
        let mut out = String::new();
        if self.show_ranges {
            for range in &estimate.ranges {
                writeln!(
                    out,
                    "{:<24} {:>7.1} dBm -> {:.p$} from ({:.p$}, {:.p$})",
                    range.identifier,
                    range.rssi_dbm,
                    range.distance,
                    range.anchor.x,
                    range.anchor.y,
                    p = p
                )?;
            }
        }
        write!(
            out,
            "Estimated Position: ({:.p$}, {:.p$})",
            estimate.position.x,
            estimate.position.y,
            p = p
        )?;
        Ok(out)
    }

    fn format_calibration(&self, report: &CalibrationReport) -> Result<String, FormatError> {
        Ok(report.to_string())
    }

    fn format_readings(&self, readings: &[SignalReading]) -> Result<String, FormatError> {
        let mut out = String::new();
        for reading in readings {
            writeln!(out, "{:<24} {:>7.1} dBm", reading.identifier(), reading.rssi_dbm())?;
        }
        Ok(out.trim_end().to_string())
    }
}

/// JSON formatter
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format_position(&self, estimate: &PositionEstimate) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(estimate)?)
    }

    fn format_calibration(&self, report: &CalibrationReport) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_readings(&self, readings: &[SignalReading]) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(readings)?)
    }
}
