//! Parser for the text report of `netsh wlan show network mode=Bssid`
//!
//! The report lists one block per network:
//!
//! ```text
//! SSID 1 : Office
//!     Network type            : Infrastructure
//!     ...
//!     BSSID 1                 : 00:11:22:33:44:55
//!          Signal             : 82%
//! ```
//!
//! Signal quality is reported as a percentage and converted with
//! `dBm = percent / 2 - 100`.

use crate::core::SignalReading;
use thiserror::Error;

/// Errors that can occur while parsing a scan report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Signal entry at token {token_index} does not belong to any SSID")]
    OrphanSignal { token_index: usize },
    #[error("Malformed signal value '{value}' for SSID '{ssid}'")]
    InvalidSignal { ssid: String, value: String },
    #[error("Truncated report: {details}")]
    Truncated { details: String },
}

/// Convert a Windows signal quality percentage to dBm
pub fn percent_to_dbm(percent: f64) -> f64 {
    percent / 2.0 - 100.0
}

/// Converts scan report text into signal readings
pub struct ScanOutputParser {
    strict_validation: bool,
}

impl Default for ScanOutputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanOutputParser {
    /// Create a parser that rejects malformed signal entries
    pub fn new() -> Self {
        Self {
            strict_validation: true,
        }
    }

    /// Enable or disable strict validation; lenient parsing skips bad entries
    pub fn set_strict_validation(&mut self, strict: bool) {
        self.strict_validation = strict;
    }

    /// Parse a full report; each SSID yields the signal of its first BSSID
    pub fn parse(&self, text: &str) -> Result<Vec<SignalReading>, ParseError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut readings = Vec::new();
        let mut current: Option<(String, bool)> = None;

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                "SSID" => {
                    let (name, next) = Self::read_ssid_name(&tokens, i)?;
                    current = Some((name, false));
                    i = next;
                    continue;
                }
                "Signal" => {
                    let (ssid, seen) = current
                        .as_mut()
                        .ok_or(ParseError::OrphanSignal { token_index: i })?;
                    let value = tokens.get(i + 2).ok_or_else(|| ParseError::Truncated {
                        details: format!("missing signal value for SSID '{}'", ssid),
                    })?;

                    match Self::parse_percent(value) {
                        Some(percent) if !*seen => {
                            *seen = true;
                            if !ssid.is_empty() {
                                let rssi = percent_to_dbm(percent);
                                readings.push(SignalReading::new(ssid.clone(), rssi));
                            }
                        }
                        Some(_) => {}
                        None if self.strict_validation => {
                            return Err(ParseError::InvalidSignal {
                                ssid: ssid.clone(),
                                value: value.to_string(),
                            });
                        }
                        None => {}
                    }
                    i += 3;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        Ok(readings)
    }

    /// Name tokens run from three past `SSID` (skipping the index and colon) to the
    /// `Network type` line, so names may themselves contain `Network`
    fn read_ssid_name(
        tokens: &[&str],
        ssid_index: usize,
    ) -> Result<(String, usize), ParseError> {
        let start = ssid_index + 3;
        if start > tokens.len() {
            return Err(ParseError::Truncated {
                details: format!("SSID header at token {} is incomplete", ssid_index),
            });
        }
        let end = tokens[start..]
            .windows(2)
            .position(|pair| pair[0] == "Network" && pair[1] == "type")
            .map(|offset| start + offset)
            .unwrap_or(tokens.len());

        Ok((tokens[start..end].join(" "), end))
    }

    fn parse_percent(token: &str) -> Option<f64> {
        let percent: f64 = token.strip_suffix('%')?.parse().ok()?;
        if (0.0..=100.0).contains(&percent) {
            Some(percent)
        } else {
            None
        }
    }
}
