//! Archive packaging for email2hash output files.
//!
//! Keyed runs can ask for their sorted digest file to be packaged into a
//! ZIP archive. The archive always holds exactly one Deflate-compressed
//! entry: the output file itself, under its own file name. The source file
//! is left in place.
//!
//! Archive bytes are not reproducible (entry timestamps vary); only the
//! decompressed entry is guaranteed to match the source byte for byte. The
//! returned [`ArchiveSummary`] carries a SHA-256 of the entry so callers can
//! verify that on read-back.
//!
//! # Example
//!
//! ```no_run
//! use e2h_archive::{compress, ArchiveReader};
//! use std::path::Path;
//!
//! let summary = compress(Path::new("people_hashed.csv")).unwrap();
//! assert_eq!(summary.archive_path, Path::new("people_hashed.zip"));
//!
//! let mut reader = ArchiveReader::open(&summary.archive_path).unwrap();
//! reader.verify(&summary.sha256).unwrap();
//! ```

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{ArchiveError, Result};
pub use reader::ArchiveReader;
pub use writer::{archive_path_for, compress, compress_to, ArchiveSummary, ARCHIVE_EXTENSION};
