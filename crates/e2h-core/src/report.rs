//! Run report handed to the presentation layer.

use clap::ValueEnum;
use e2h_digest::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the CLI prints the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One human-readable line (default).
    #[default]
    Human,
    /// The report as a JSON object.
    Json,
}

/// Counters and paths of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Data rows digested (equals the number of output lines).
    pub rows_processed: u64,
    /// Data rows skipped as malformed (only with the skip policy).
    pub rows_skipped: u64,
    /// Wall time from header read to output finalisation.
    pub elapsed_seconds: f64,
    pub algorithm: Algorithm,
    /// Absolute path of the digest file.
    pub output_path: PathBuf,
    /// Absolute path of the archive, when one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<PathBuf>,
}

impl RunReport {
    /// `Hashed N email addresses in S.SS seconds using ALG to PATH`.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "Hashed {} email addresses in {:.2} seconds using {} to {}",
            self.rows_processed,
            self.elapsed_seconds,
            self.algorithm,
            self.output_path.display()
        );
        if self.rows_skipped > 0 {
            line.push_str(&format!(" ({} malformed rows skipped)", self.rows_skipped));
        }
        if let Some(archive) = &self.archive_path {
            line.push_str(&format!(", compressed to {}", archive.display()));
        }
        line
    }

    /// Render in the requested format.
    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Human => self.summary_line(),
            ReportFormat::Json => serde_json::to_string_pretty(self)
                .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            rows_processed: 5,
            rows_skipped: 0,
            elapsed_seconds: 0.004,
            algorithm: Algorithm::Sha256,
            output_path: PathBuf::from("/tmp/people.hashed"),
            archive_path: None,
        }
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            report().summary_line(),
            "Hashed 5 email addresses in 0.00 seconds using sha256 to /tmp/people.hashed"
        );
    }

    #[test]
    fn test_summary_with_archive_and_skips() {
        let mut report = report();
        report.rows_skipped = 2;
        report.archive_path = Some(PathBuf::from("/tmp/people.zip"));
        let line = report.summary_line();
        assert!(line.contains("(2 malformed rows skipped)"));
        assert!(line.ends_with(", compressed to /tmp/people.zip"));
    }

    #[test]
    fn test_json_render() {
        let json: serde_json::Value = serde_json::from_str(&report().render(ReportFormat::Json)).unwrap();
        assert_eq!(json["rows_processed"], 5);
        assert_eq!(json["algorithm"], "sha256");
        assert!(json.get("archive_path").is_none());
    }
}
