//! Public positioning API
//!
//! The pipeline turns readings into positions; the formatters render results for the
//! command-line tool.

pub mod formatting;
pub mod pipeline;

pub use formatting::{FormatError, JsonFormatter, OutputFormat, ReportFormatter, TextFormatter};
pub use pipeline::{AnchorRange, PositionEstimate, PositioningPipeline};
