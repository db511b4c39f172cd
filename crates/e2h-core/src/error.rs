//! Error types for a hashing run.

use crate::config::ConfigError;
use crate::exit_codes::ExitCode;
use crate::secret::SecretError;
use e2h_archive::ArchiveError;
use e2h_digest::DigestError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal failures of the transformation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input unreadable or output unwritable.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header has no field equal to the requested column.
    #[error("unable to find column '{column}' in input file {}", .path.display())]
    ColumnNotFound { column: String, path: PathBuf },

    /// A data row has too few fields to reach the email column.
    #[error("row {row} has {fields} field(s), expected at least {required}")]
    MalformedRow {
        row: u64,
        fields: usize,
        required: usize,
    },

    /// Digester could not be built.
    #[error(transparent)]
    Digest(#[from] DigestError),

    /// Archive creation failed.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            PipelineError::Io { .. } => ExitCode::IoError,
            PipelineError::ColumnNotFound { .. } => ExitCode::ColumnNotFound,
            PipelineError::MalformedRow { .. } => ExitCode::MalformedRow,
            PipelineError::Digest(DigestError::UnsupportedAlgorithm(_)) => ExitCode::ArgsError,
            PipelineError::Digest(_) => ExitCode::InternalError,
            PipelineError::Archive(_) => ExitCode::ArchiveError,
        }
    }
}

/// Any failure of one CLI invocation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Overwrite not confirmed.
    #[error("not overwriting {}", .0.display())]
    Declined(PathBuf),

    /// Destination exists and there is no terminal to ask.
    #[error("output file {} exists; pass --yes to overwrite", .0.display())]
    OverwriteNeedsConfirmation(PathBuf),

    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

impl From<DigestError> for AppError {
    fn from(err: DigestError) -> Self {
        AppError::Pipeline(PipelineError::Digest(err))
    }
}

impl AppError {
    /// Exit code for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Config(_) => ExitCode::ArgsError,
            AppError::Secret(_) => ExitCode::SecretError,
            AppError::Pipeline(err) => err.exit_code(),
            AppError::Declined(_) => ExitCode::Declined,
            AppError::OverwriteNeedsConfirmation(_) => ExitCode::ArgsError,
            AppError::Prompt(_) => ExitCode::IoError,
        }
    }
}
