//! Core types and constants for the Wi-Fi positioning system

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
