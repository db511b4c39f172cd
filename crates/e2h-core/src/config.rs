//! Run configuration.
//!
//! The CLI collects raw options into [`ConfigOptions`]; [`RunConfig::resolve`]
//! validates them against a digest [`Registry`] and fills in defaults. All
//! checks here happen before any file is opened.

use crate::column::EMAIL_COLUMN;
use clap::ValueEnum;
use e2h_archive::archive_path_for;
use e2h_digest::{Algorithm, DigestError, Registry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Algorithm used when none is requested.
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::Sha256;

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Algorithm(#[from] DigestError),

    #[error("--compress is only available with a keyed algorithm (got {0})")]
    CompressRequiresKeyed(Algorithm),

    #[error("output path {} is the input file", .0.display())]
    OutputIsInput(PathBuf),

    #[error("cannot derive an output name from input path {}", .0.display())]
    NoInputFileName(PathBuf),

    #[error("column name cannot be empty")]
    EmptyColumn,

    #[error("archive path {} would overwrite the input or output file", .0.display())]
    ArchiveCollision(PathBuf),
}

/// What to do with a data row that has too few fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Fail the run (default).
    #[default]
    Abort,
    /// Log a warning and continue without emitting a digest.
    Skip,
}

impl std::fmt::Display for MalformedRowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedRowPolicy::Abort => write!(f, "abort"),
            MalformedRowPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Raw options as collected by the CLI.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Input CSV file.
    pub input_path: PathBuf,
    /// Explicit output path (highest priority).
    pub output_path: Option<PathBuf>,
    /// Algorithm identifier; `None` selects [`DEFAULT_ALGORITHM`].
    pub algorithm: Option<String>,
    /// Package the output into a ZIP archive (keyed only).
    pub compress: bool,
    /// Suppress the run report.
    pub silent: bool,
    /// Column to hash; `None` selects `email`.
    pub column: Option<String>,
    pub malformed_rows: MalformedRowPolicy,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub algorithm: Algorithm,
    pub compress: bool,
    pub silent: bool,
    pub column: String,
    pub malformed_rows: MalformedRowPolicy,
}

impl RunConfig {
    /// Validate `options` and apply defaults.
    pub fn resolve(options: ConfigOptions, registry: &Registry) -> Result<Self, ConfigError> {
        let algorithm = match options.algorithm.as_deref() {
            Some(name) => registry.resolve(name)?,
            None if registry.contains(DEFAULT_ALGORITHM) => DEFAULT_ALGORITHM,
            None => registry
                .algorithms()
                .next()
                .ok_or_else(|| DigestError::UnsupportedAlgorithm(DEFAULT_ALGORITHM.to_string()))?,
        };

        if options.compress && !algorithm.is_keyed() {
            return Err(ConfigError::CompressRequiresKeyed(algorithm));
        }

        let column = options.column.unwrap_or_else(|| EMAIL_COLUMN.to_string());
        if column.is_empty() {
            return Err(ConfigError::EmptyColumn);
        }

        let output_path = match options.output_path {
            Some(path) => path,
            None => default_output_path(&options.input_path, algorithm)?,
        };
        if same_path(&options.input_path, &output_path) {
            return Err(ConfigError::OutputIsInput(output_path));
        }
        if options.compress {
            let archive_path = archive_path_for(&output_path);
            if same_path(&archive_path, &output_path) || same_path(&archive_path, &options.input_path) {
                return Err(ConfigError::ArchiveCollision(archive_path));
            }
        }

        Ok(Self {
            input_path: options.input_path,
            output_path,
            algorithm,
            compress: options.compress,
            silent: options.silent,
            column,
            malformed_rows: options.malformed_rows,
        })
    }

    /// Keyed runs buffer and sort; unkeyed runs stream.
    pub fn is_keyed(&self) -> bool {
        self.algorithm.is_keyed()
    }

    /// Archive path, when compression was requested.
    pub fn archive_path(&self) -> Option<PathBuf> {
        self.compress.then(|| archive_path_for(&self.output_path))
    }

    /// Every file this run will create or truncate.
    pub fn destinations(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.output_path.clone()];
        paths.extend(self.archive_path());
        paths
    }
}

/// Default output file for `input`, placed in the current directory.
///
/// `sha3-256` and `hmac-sha3-256` produce `<stem>_hashed<ext>`; the other
/// algorithms produce `<stem>.hashed`.
pub fn default_output_path(input: &Path, algorithm: Algorithm) -> Result<PathBuf, ConfigError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ConfigError::NoInputFileName(input.to_path_buf()))?;

    let name = match algorithm {
        Algorithm::Sha3_256 | Algorithm::HmacSha3_256 => match input.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}_hashed.{ext}"),
            None => format!("{stem}_hashed"),
        },
        Algorithm::Sha1 | Algorithm::Sha256 | Algorithm::Blake2s | Algorithm::Blake2b => {
            format!("{stem}.hashed")
        }
    };
    Ok(PathBuf::from(name))
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
