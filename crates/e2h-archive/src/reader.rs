//! Archive reader for checking a packaged output file.

use crate::{ArchiveError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Reader over a single-entry archive.
pub struct ArchiveReader<R: Read + Seek> {
    archive: ZipArchive<R>,
    entry_name: String,
}

impl ArchiveReader<File> {
    /// Open an archive from a file path.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Create a reader from any Read + Seek source.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        if archive.len() != 1 {
            return Err(ArchiveError::EntryCount(archive.len()));
        }
        let entry_name = archive.by_index(0)?.name().to_string();
        Ok(Self {
            archive,
            entry_name,
        })
    }

    /// Name of the single entry.
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Decompress the entry.
    pub fn read_entry(&mut self) -> Result<Vec<u8>> {
        let mut entry = self.archive.by_index(0)?;
        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(|e| ArchiveError::Zip(zip::result::ZipError::Io(e)))?;

        debug!(entry = %self.entry_name, bytes = data.len(), "Read archive entry");
        Ok(data)
    }

    /// Decompress the entry and compare its SHA-256 with `expected` (hex).
    pub fn verify(&mut self, expected: &str) -> Result<Vec<u8>> {
        let data = self.read_entry()?;
        let actual = hex::encode(Sha256::digest(&data));
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(ArchiveError::ChecksumMismatch {
                entry: self.entry_name.clone(),
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(data)
    }
}
