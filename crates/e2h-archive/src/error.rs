//! Error types for archive operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or reading an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O error on a specific file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The source has no file name to use as the entry name
    #[error("cannot derive an entry name from {}", .0.display())]
    NoFileName(PathBuf),

    /// Archive and source would be the same file
    #[error("archive path {} is the source file", .0.display())]
    SameFile(PathBuf),

    /// Archive does not hold exactly one entry
    #[error("expected exactly one archive entry, found {0}")]
    EntryCount(usize),

    /// Entry content does not match the expected checksum
    #[error("checksum mismatch for '{entry}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        entry: String,
        expected: String,
        actual: String,
    },
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
