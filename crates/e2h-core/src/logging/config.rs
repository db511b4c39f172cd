//! Logging configuration.
//!
//! Resolution order (highest first):
//! 1. `--log-level` / `--log-format`
//! 2. `--silent` (errors only) and `-v` counts
//! 3. `E2H_LOG`, then `RUST_LOG`; `E2H_LOG_FORMAT`
//! 4. Defaults: warn, human

use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines on stderr (default).
    #[default]
    Human,
    /// One JSON object per line on stderr.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Nothing at all.
    Off,
    /// Errors only (used by `--silent`).
    Error,
    /// Warnings, including skipped rows (default).
    #[default]
    Warn,
    /// Run start/finish and archive events.
    Info,
    /// Column position, file lifecycle, progress.
    Debug,
    Trace,
}

impl LogLevel {
    /// Level for a `-v` count: 0 keeps `self`, each step is one level louder.
    pub fn raised_by(self, steps: u8) -> Self {
        let order = [
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let current = order.iter().position(|l| *l == self).unwrap_or(2);
        order[(current + steps as usize).min(order.len() - 1)]
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        };
        f.write_str(name)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Include timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Create config from environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        let mut config = LogConfig::default();

        if let Some(level) = level_from_env() {
            config.level = level;
        }
        if let Some(format) = std::env::var("E2H_LOG_FORMAT")
            .ok()
            .and_then(|val| val.parse().ok())
        {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }
        config
    }

    /// Resolve the CLI's verbosity flags on top of the environment.
    ///
    /// An explicit `--log-level` beats both `--silent` and `-v`.
    pub fn for_cli(
        verbose: u8,
        silent: bool,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = Self::from_env(None, cli_format);
        if silent {
            config.level = LogLevel::Error;
        } else if verbose > 0 {
            config.level = LogLevel::Warn.raised_by(verbose);
        }
        if let Some(level) = cli_level {
            config.level = level;
        }
        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}

fn level_from_env() -> Option<LogLevel> {
    if let Ok(val) = std::env::var("E2H_LOG") {
        return val.parse().ok();
    }
    level_from_directives(&std::env::var("RUST_LOG").ok()?)
}

/// Loudest level named in a `RUST_LOG`-style directive list.
///
/// Each directive is either a bare level or `target=level`; bare targets
/// are ignored.
fn level_from_directives(directives: &str) -> Option<LogLevel> {
    directives
        .split(',')
        .filter_map(|directive| {
            let level = match directive.rsplit_once('=') {
                Some((_, level)) => level,
                None => directive,
            };
            level.trim().parse::<LogLevel>().ok()
        })
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_raised_by() {
        assert_eq!(LogLevel::Warn.raised_by(0), LogLevel::Warn);
        assert_eq!(LogLevel::Warn.raised_by(1), LogLevel::Info);
        assert_eq!(LogLevel::Warn.raised_by(2), LogLevel::Debug);
        assert_eq!(LogLevel::Warn.raised_by(9), LogLevel::Trace);
    }

    #[test]
    fn test_explicit_level_beats_silent() {
        let config = LogConfig::for_cli(0, true, Some(LogLevel::Debug), None);
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn test_silent_and_verbose() {
        assert_eq!(LogConfig::for_cli(2, true, None, None).level, LogLevel::Error);
        assert_eq!(LogConfig::for_cli(1, false, None, None).level, LogLevel::Info);
    }

    #[test]
    fn test_cli_format_override() {
        let config = LogConfig::from_env(None, Some(LogFormat::Jsonl));
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_builder() {
        let config = LogConfig::default()
            .with_format(LogFormat::Jsonl)
            .with_level(LogLevel::Debug)
            .with_timestamps(false);
        assert_eq!(config.format, LogFormat::Jsonl);
        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.timestamps);
    }

    #[test]
    fn test_directives_match_whole_tokens() {
        assert_eq!(level_from_directives("information_sink=warn"), Some(LogLevel::Warn));
        assert_eq!(level_from_directives("debug_helpers"), None);
        assert_eq!(level_from_directives("e2h_core=debug,hyper=info"), Some(LogLevel::Debug));
        assert_eq!(level_from_directives("trace"), Some(LogLevel::Trace));
        assert_eq!(level_from_directives("error,my_crate=info"), Some(LogLevel::Info));
        assert_eq!(level_from_directives(""), None);
    }
}
