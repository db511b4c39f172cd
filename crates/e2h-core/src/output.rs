//! Output writer and the sorted digest buffer.
//!
//! The writer assumes permission to replace the destination has already
//! been obtained; it never prompts.

use crate::error::{PipelineError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Line terminator written after every digest.
pub const LINE_TERMINATOR: &str = "\n";

/// Writes one hex digest per line to a file.
pub struct OutputWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
}

impl OutputWriter {
    /// Create or truncate `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
        debug!(path = %path.display(), "Output file opened");
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Append one digest line.
    pub fn write_digest(&mut self, hex: &str) -> Result<()> {
        self.writer
            .write_all(hex.as_bytes())
            .and_then(|()| self.writer.write_all(LINE_TERMINATOR.as_bytes()))
            .map_err(|e| PipelineError::io(&self.path, e))?;
        self.lines += 1;
        Ok(())
    }

    /// Flush everything to disk and close the file.
    ///
    /// If the final flush or sync fails the destination is emptied.
    pub fn finish(self) -> Result<u64> {
        let Self {
            path,
            writer,
            lines,
        } = self;
        let file = match writer.into_inner() {
            Ok(file) => file,
            Err(err) => {
                let (error, writer) = err.into_parts();
                let (file, _unwritten) = writer.into_parts();
                empty_after_failure(&file, &path);
                return Err(PipelineError::io(&path, error));
            }
        };
        if let Err(error) = file.sync_all() {
            empty_after_failure(&file, &path);
            return Err(PipelineError::io(&path, error));
        }
        debug!(path = %path.display(), lines, "Output file finished");
        Ok(lines)
    }

    /// Drop buffered lines and leave the destination empty.
    pub fn abandon(self) -> Result<()> {
        let Self { path, writer, .. } = self;
        let (file, _unwritten) = writer.into_parts();
        file.set_len(0).map_err(|e| PipelineError::io(&path, e))?;
        debug!(path = %path.display(), "Output file emptied after failure");
        Ok(())
    }
}

fn empty_after_failure(file: &File, path: &Path) {
    if let Err(cleanup) = file.set_len(0) {
        warn!(path = %path.display(), error = %cleanup, "Failed to empty partial output");
    }
}

/// All digests of a keyed run, held until the input ends so they can be
/// sorted. Memory grows linearly with the number of rows.
#[derive(Debug, Default)]
pub struct DigestCollection {
    digests: Vec<String>,
}

impl DigestCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hex: String) {
        self.digests.push(hex);
    }

    /// Digests in ascending lexicographic order of their hex form.
    pub fn into_sorted(mut self) -> Vec<String> {
        self.digests.sort_unstable();
        self.digests
    }

    /// Sort and write every digest, consuming the collection.
    ///
    /// Any write failure leaves the destination empty.
    pub fn write_sorted(self, mut writer: OutputWriter) -> Result<u64> {
        for hex in self.into_sorted() {
            if let Err(err) = writer.write_digest(&hex) {
                if let Err(cleanup) = writer.abandon() {
                    warn!(error = %cleanup, "Failed to empty partial output");
                }
                return Err(err);
            }
        }
        writer.finish()
    }
}
