//! Signal source capability and scanner configuration

use crate::core::SignalReading;
use crate::scanner::error::ScanResult;
use serde::{Deserialize, Serialize};

/// Anything that can report the currently visible access points
pub trait SignalSource {
    /// Take one scan and return every visible access point with its signal strength
    fn scan(&mut self) -> ScanResult<Vec<SignalReading>>;

    /// Short name used in logs and errors
    fn name(&self) -> &str;
}

impl<S: SignalSource + ?Sized> SignalSource for Box<S> {
    fn scan(&mut self) -> ScanResult<Vec<SignalReading>> {
        (**self).scan()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Platform command used by [`crate::scanner::CommandSignalSource`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            program: "netsh".to_string(),
            args: ["wlan", "show", "network", "mode=Bssid"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ScannerConfig {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(|s| s.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
