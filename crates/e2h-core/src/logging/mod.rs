//! Diagnostics for email2hash.
//!
//! stdout carries only the run report; every log line goes to stderr, either
//! human-readable or one JSON object per line. Email values and secrets are
//! never logged, only counts, paths and row numbers.
//!
//! ```no_run
//! use e2h_core::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! tracing::info!(rows = 3, "Run finished");
//! ```

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events pass the filter.
const TARGETS: [&str; 4] = ["email2hash", "e2h_core", "e2h_archive", "e2h_digest"];

/// Filter directives enabling our crates at `level`.
pub fn filter_directives(level: LogLevel) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the global subscriber.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::new(filter_directives(config.level));

    let result = match config.format {
        LogFormat::Human => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false)
                    .flatten_event(true),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        let directives = filter_directives(LogLevel::Debug);
        assert_eq!(
            directives,
            "email2hash=debug,e2h_core=debug,e2h_archive=debug,e2h_digest=debug"
        );
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_off_parses() {
        assert!(EnvFilter::try_new(filter_directives(LogLevel::Off)).is_ok());
    }

    #[test]
    fn test_init_twice() {
        let config = LogConfig::default().with_timestamps(false);
        init_logging(&config);
        init_logging(&config.with_format(LogFormat::Jsonl));
    }
}
