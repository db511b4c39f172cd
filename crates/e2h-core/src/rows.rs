//! Delimited-row reader.
//!
//! Splits lines strictly on [`DELIMITER`]. There is no quoting or escaping;
//! a comma inside a field starts a new field. The line terminator (`\n` or
//! `\r\n`) is removed before splitting, so it never ends up in the last field.
//!
//! Rows are produced lazily and one at a time, so memory use does not grow
//! with the input.

use crate::error::{PipelineError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Field separator.
pub const DELIMITER: char = ',';

/// Column names from the first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    fields: Vec<String>,
}

impl Header {
    /// Split a header line.
    pub fn parse(line: &str) -> Self {
        Self {
            fields: strip_terminator(line)
                .split(DELIMITER)
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One data row. Lives only while it is being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    row: u64,
    line: String,
}

impl Record {
    fn new(row: u64, mut line: String) -> Self {
        let len = strip_terminator(&line).len();
        line.truncate(len);
        Self { row, line }
    }

    /// 1-based position among data rows (the header is row 0).
    pub fn row(&self) -> u64 {
        self.row
    }

    /// Field at `index`, untrimmed.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.line.split(DELIMITER).nth(index)
    }

    pub fn field_count(&self) -> usize {
        self.line.split(DELIMITER).count()
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Reader over a delimited text source, before its header is consumed.
pub struct RowReader<R> {
    reader: R,
    source: PathBuf,
}

impl RowReader<BufReader<File>> {
    /// Open a file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> RowReader<R> {
    /// Wrap an already-open source. `source` is used in error messages.
    pub fn new(reader: R, source: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            source: source.into(),
        }
    }

    /// Path reported in errors.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Consume the first line as the header and return the remaining rows.
    ///
    /// An empty source yields a header with one empty field.
    pub fn read_header(mut self) -> Result<(Header, Records<R>)> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| PipelineError::io(&self.source, e))?;

        let header = Header::parse(&line);
        let records = Records {
            reader: self.reader,
            source: self.source,
            row: 0,
            done: false,
        };
        Ok((header, records))
    }
}

/// Lazy sequence of data rows. Restartable only by reopening the source.
pub struct Records<R> {
    reader: R,
    source: PathBuf,
    row: u64,
    done: bool,
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.row += 1;
                Some(Ok(Record::new(self.row, line)))
            }
            Err(e) => {
                // A mid-stream read error ends the sequence.
                self.done = true;
                Some(Err(PipelineError::io(&self.source, e)))
            }
        }
    }
}
