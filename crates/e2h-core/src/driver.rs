//! Transformation driver.
//!
//! Reads the header, locates the email column once, then digests every data
//! row. Two sink modes:
//!
//! - **Stream** (unkeyed algorithms): each digest is written as soon as it is
//!   computed, in input order. Memory use is one row.
//! - **Sort then write** (keyed algorithm): digests are collected, sorted by
//!   hex value and written after the input ends, optionally followed by
//!   archiving. Memory use grows with the number of rows, so this mode is not
//!   meant for unbounded inputs.
//!
//! The output file is only created after the column has been located, so a
//! missing column leaves any existing destination untouched.

use crate::column::locate;
use crate::config::{MalformedRowPolicy, RunConfig};
use crate::error::{PipelineError, Result};
use crate::output::{DigestCollection, OutputWriter};
use crate::report::RunReport;
use crate::rows::{Record, RowReader};
use e2h_archive::ArchiveSummary;
use e2h_digest::{Algorithm, Digester};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Rows between progress log events.
const PROGRESS_INTERVAL: u64 = 1_000_000;

/// How digests reach the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// Write each digest immediately, in input order.
    Stream,
    /// Collect, sort ascending, then write.
    SortThenWrite,
}

impl SinkMode {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        if algorithm.is_keyed() {
            SinkMode::SortThenWrite
        } else {
            SinkMode::Stream
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    processed: u64,
    skipped: u64,
}

impl Counts {
    fn progress(&self) {
        let seen = self.processed + self.skipped;
        if seen > 0 && seen % PROGRESS_INTERVAL == 0 {
            debug!(rows = seen, "Hashing progress");
        }
    }
}

/// Run the pipeline on the configured input file.
pub fn run(config: &RunConfig, digester: Digester) -> Result<RunReport> {
    let started = Instant::now();
    let rows = RowReader::open(&config.input_path)?;
    run_from(rows, config, digester, started)
}

/// Run the pipeline on an already-open source.
///
/// `started` is the instant the run is timed from.
pub fn run_from<R: BufRead>(
    rows: RowReader<R>,
    config: &RunConfig,
    mut digester: Digester,
    started: Instant,
) -> Result<RunReport> {
    let algorithm = digester.algorithm();
    let mode = SinkMode::for_algorithm(algorithm);
    let source = rows.source().to_path_buf();

    info!(
        input = %source.display(),
        output = %config.output_path.display(),
        algorithm = %algorithm,
        mode = ?mode,
        "Run started"
    );

    let (header, records) = rows.read_header()?;
    let index = locate(&header, &config.column, &source)?;
    debug!(column = %config.column, index, fields = header.len(), "Column located");

    let mut digest_row = |record: &Record| -> Result<Option<String>> {
        Ok(extract(record, index, config.malformed_rows)?
            .map(|email| digester.hex_digest(email.as_bytes())))
    };

    let (counts, archive) = match mode {
        SinkMode::Stream => {
            let mut writer = OutputWriter::create(&config.output_path)?;
            let mut counts = Counts::default();
            let streamed = records.into_iter().try_for_each(|record| {
                match digest_row(&record?)? {
                    Some(hex) => {
                        writer.write_digest(&hex)?;
                        counts.processed += 1;
                    }
                    None => counts.skipped += 1,
                }
                counts.progress();
                Ok(())
            });
            if let Err(err) = streamed {
                if let Err(cleanup) = writer.abandon() {
                    warn!(error = %cleanup, "Failed to empty partial output");
                }
                return Err(err);
            }
            writer.finish()?;
            (counts, None)
        }
        SinkMode::SortThenWrite => {
            let mut collection = DigestCollection::new();
            let mut counts = Counts::default();
            for record in records {
                match digest_row(&record?)? {
                    Some(hex) => {
                        collection.push(hex);
                        counts.processed += 1;
                    }
                    None => counts.skipped += 1,
                }
                counts.progress();
            }
            debug!(digests = counts.processed, "Input exhausted, sorting digests");

            let writer = OutputWriter::create(&config.output_path)?;
            collection.write_sorted(writer)?;

            let archive = match config.archive_path() {
                Some(archive_path) => Some(package_output(&config.output_path, &archive_path)?),
                None => None,
            };
            (counts, archive)
        }
    };

    let elapsed_seconds = started.elapsed().as_secs_f64();
    let report = RunReport {
        rows_processed: counts.processed,
        rows_skipped: counts.skipped,
        elapsed_seconds,
        algorithm,
        output_path: absolute(&config.output_path),
        archive_path: archive.map(|summary| absolute(&summary.archive_path)),
    };

    info!(
        rows = report.rows_processed,
        skipped = report.rows_skipped,
        elapsed_seconds = report.elapsed_seconds,
        output = %report.output_path.display(),
        "Run finished"
    );

    Ok(report)
}

/// The trimmed email field of `record`, or `None` when the row is skipped.
fn extract(record: &Record, index: usize, policy: MalformedRowPolicy) -> Result<Option<&str>> {
    match record.field(index) {
        Some(field) => Ok(Some(field.trim())),
        None => {
            let fields = record.field_count();
            match policy {
                MalformedRowPolicy::Abort => Err(PipelineError::MalformedRow {
                    row: record.row(),
                    fields,
                    required: index + 1,
                }),
                MalformedRowPolicy::Skip => {
                    warn!(row = record.row(), fields, required = index + 1, "Skipping malformed row");
                    Ok(None)
                }
            }
        }
    }
}

fn package_output(output: &Path, archive_path: &Path) -> Result<ArchiveSummary> {
    let summary = e2h_archive::compress_to(output, archive_path)?;
    debug!(sha256 = %summary.sha256, "Archive checksum");
    Ok(summary)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
