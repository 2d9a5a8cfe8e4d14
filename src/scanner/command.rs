//! Signal sources backed by the platform scan report

use crate::core::SignalReading;
use crate::processing::parser::ScanOutputParser;
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::source::{ScannerConfig, SignalSource};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs the configured scan command and parses its report
pub struct CommandSignalSource {
    config: ScannerConfig,
    parser: ScanOutputParser,
}

impl CommandSignalSource {
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            config,
            parser: ScanOutputParser::new(),
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }
}

impl SignalSource for CommandSignalSource {
    fn scan(&mut self) -> ScanResult<Vec<SignalReading>> {
        tracing::debug!(command = %self.config.command_line(), "running scan command");

        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .output()
            .map_err(|e| ScanError::Unavailable {
                scanner: self.config.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ScanError::Unavailable {
                scanner: self.config.program.clone(),
                reason: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let readings = self.parser.parse(&text)?;
        tracing::debug!(count = readings.len(), "scan complete");
        Ok(readings)
    }

    fn name(&self) -> &str {
        &self.config.program
    }
}

/// Replays a saved scan report from disk on every scan
pub struct CaptureFileSource {
    path: PathBuf,
    name: String,
    parser: ScanOutputParser,
}

impl CaptureFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.to_string_lossy().to_string(),
            path,
            parser: ScanOutputParser::new(),
        }
    }
}

impl SignalSource for CaptureFileSource {
    fn scan(&mut self) -> ScanResult<Vec<SignalReading>> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| ScanError::Io {
            path: self.name.clone(),
            message: e.to_string(),
        })?;
        Ok(self.parser.parse(&text)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_unavailable() {
        let mut source = CommandSignalSource::new(ScannerConfig {
            program: "definitely-not-a-real-scan-tool".to_string(),
            args: vec![],
        });
        assert!(matches!(source.scan(), Err(ScanError::Unavailable { .. })));
    }

    #[test]
    fn test_capture_file_source() {
        let path = std::env::temp_dir().join(format!("wifi_capture_{}.txt", std::process::id()));
        std::fs::write(
            &path,
            "SSID 1 : Den\n Network type : Infrastructure\n BSSID 1 : aa\n Signal : 90%\n",
        )
        .unwrap();

        let mut source = CaptureFileSource::new(&path);
        let readings = source.scan().unwrap();
        assert_eq!(readings, vec![SignalReading::new("Den", -55.0)]);

        let _ = std::fs::remove_file(&path);
        assert!(matches!(source.scan(), Err(ScanError::Io { .. })));
    }

    #[test]
    fn test_default_command_line() {
        assert_eq!(
            ScannerConfig::default().command_line(),
            "netsh wlan show network mode=Bssid"
        );
    }
}
