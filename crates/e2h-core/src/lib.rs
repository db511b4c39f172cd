//! email2hash core library
//!
//! Replaces the email column of a CSV file with one digest per row:
//! - Row reading and column location
//! - Streaming (unkeyed) and sort-then-write (keyed) sinks
//! - Interactive secret acquisition for `hmac-sha3-256`
//! - Run configuration, reporting and exit codes
//!
//! The binary entry point is in `main.rs`.

pub mod column;
pub mod config;
pub mod driver;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod report;
pub mod rows;
pub mod secret;

pub use config::{ConfigError, ConfigOptions, MalformedRowPolicy, RunConfig};
pub use driver::{run, run_from, SinkMode};
pub use error::{AppError, PipelineError, Result};
pub use exit_codes::ExitCode;
pub use report::{ReportFormat, RunReport};
