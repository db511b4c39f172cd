//! Archive writer.
//!
//! Streams the source file into a single Deflate entry while hashing it, so
//! the source is never held in memory.

use crate::{ArchiveError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Extension given to archives derived from a source path.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Path of the archive file.
    pub archive_path: PathBuf,
    /// Name of the single entry inside the archive.
    pub entry_name: String,
    /// Size of the entry before compression.
    pub uncompressed_bytes: u64,
    /// Size of the archive file on disk.
    pub compressed_bytes: u64,
    /// Hex SHA-256 of the entry content.
    pub sha256: String,
}

/// The default archive path for `source`: its extension replaced by `.zip`.
pub fn archive_path_for(source: &Path) -> PathBuf {
    source.with_extension(ARCHIVE_EXTENSION)
}

/// Package `source` into an archive next to it, named by [`archive_path_for`].
pub fn compress(source: &Path) -> Result<ArchiveSummary> {
    compress_to(source, &archive_path_for(source))
}

/// Package `source` into the archive at `archive_path` (created or truncated).
///
/// On failure the partially written archive is removed.
pub fn compress_to(source: &Path, archive_path: &Path) -> Result<ArchiveSummary> {
    if source == archive_path {
        return Err(ArchiveError::SameFile(archive_path.to_path_buf()));
    }

    let entry_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| ArchiveError::NoFileName(source.to_path_buf()))?;

    let input = File::open(source).map_err(|e| ArchiveError::io(source, e))?;
    let output = File::create(archive_path).map_err(|e| ArchiveError::io(archive_path, e))?;

    match write_entry(input, output, source, archive_path, &entry_name) {
        Ok((uncompressed_bytes, sha256)) => {
            let compressed_bytes = std::fs::metadata(archive_path)
                .map_err(|e| ArchiveError::io(archive_path, e))?
                .len();

            info!(
                archive = %archive_path.display(),
                entry = %entry_name,
                uncompressed_bytes,
                compressed_bytes,
                "Archive written"
            );

            Ok(ArchiveSummary {
                archive_path: archive_path.to_path_buf(),
                entry_name,
                uncompressed_bytes,
                compressed_bytes,
                sha256,
            })
        }
        Err(err) => {
            if let Err(remove_err) = std::fs::remove_file(archive_path) {
                warn!(
                    archive = %archive_path.display(),
                    error = %remove_err,
                    "Failed to remove partial archive"
                );
            }
            Err(err)
        }
    }
}

fn write_entry(
    input: File,
    output: File,
    source: &Path,
    archive_path: &Path,
    entry_name: &str,
) -> Result<(u64, String)> {
    let mut zip = ZipWriter::new(output);

    let options: FileOptions<'_, ()> = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    zip.start_file(entry_name, options)?;

    let mut reader = HashingReader::new(BufReader::new(input));
    let bytes = io::copy(&mut reader, &mut zip).map_err(|e| {
        // Read errors belong to the source, write errors to the archive.
        if reader.failed {
            ArchiveError::io(source, e)
        } else {
            ArchiveError::io(archive_path, e)
        }
    })?;

    zip.finish()?;

    debug!(entry = entry_name, bytes, "Archive entry finished");

    Ok((bytes, hex::encode(reader.hasher.finalize())))
}

/// Hashes everything read through it.
struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
    failed: bool,
}

impl<R: Read> HashingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            failed: false,
        }
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => {
                self.hasher.update(&buf[..n]);
                Ok(n)
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_archive_path_for() {
        assert_eq!(
            archive_path_for(Path::new("people_hashed.csv")),
            PathBuf::from("people_hashed.zip")
        );
        assert_eq!(
            archive_path_for(Path::new("out/people.hashed")),
            PathBuf::from("out/people.zip")
        );
        assert_eq!(
            archive_path_for(Path::new("digests")),
            PathBuf::from("digests.zip")
        );
    }

    #[test]
    fn test_compress_writes_zip() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("people_hashed.csv");
        std::fs::write(&source, b"aaa\nbbb\n").unwrap();

        let summary = compress(&source).unwrap();

        assert_eq!(summary.archive_path, temp_dir.path().join("people_hashed.zip"));
        assert_eq!(summary.entry_name, "people_hashed.csv");
        assert_eq!(summary.uncompressed_bytes, 8);
        assert!(summary.compressed_bytes > 0);

        let bytes = std::fs::read(&summary.archive_path).unwrap();
        assert_eq!(&bytes[0..2], b"PK");

        // Source is kept.
        assert!(source.exists());
    }

    #[test]
    fn test_checksum_matches_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("d.csv");
        std::fs::write(&source, b"hello\n").unwrap();

        let summary = compress(&source).unwrap();
        let expected = hex::encode(Sha256::digest(b"hello\n"));
        assert_eq!(summary.sha256, expected);
    }

    #[test]
    fn test_missing_source_fails_without_archive() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("missing.csv");

        let err = compress(&source).unwrap_err();
        assert!(matches!(err, ArchiveError::Io { ref path, .. } if path == &source));
        assert!(!temp_dir.path().join("missing.zip").exists());
    }

    #[test]
    fn test_same_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("already.zip");
        std::fs::write(&source, b"x").unwrap();

        let err = compress(&source).unwrap_err();
        assert!(matches!(err, ArchiveError::SameFile(_)));
        assert_eq!(std::fs::read(&source).unwrap(), b"x");
    }

    #[test]
    fn test_compress_to_explicit_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("d.csv");
        let dest = temp_dir.path().join("custom.zip");
        std::fs::write(&source, b"abc\n").unwrap();

        let summary = compress_to(&source, &dest).unwrap();
        assert_eq!(summary.archive_path, dest);
        assert!(dest.exists());
    }
}
