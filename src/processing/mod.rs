//! Scan output parsing and measurement preprocessing

pub mod averaging;
pub mod parser;

pub use averaging::{average_rssi, SampleAccumulator};
pub use parser::{percent_to_dbm, ParseError, ScanOutputParser};
