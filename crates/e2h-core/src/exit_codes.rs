//! Exit codes for the email2hash CLI.
//!
//! Exit code ranges:
//! - 0-1: Success / user chose not to proceed
//! - 10-19: Input or configuration errors (fixable by the user)
//! - 20-29: I/O and internal errors

/// Exit codes for email2hash runs.
///
/// These codes are a stable contract for scripts wrapping the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Success / Operational Outcomes (0-1)
    // ========================================================================
    /// Output written
    Success = 0,

    /// User declined to overwrite an existing output file
    Declined = 1,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments or configuration (includes unsupported algorithm)
    ArgsError = 10,

    /// Header lacks the requested column
    ColumnNotFound = 11,

    /// A data row is shorter than the email column position
    MalformedRow = 12,

    /// No usable secret could be obtained
    SecretError = 13,

    // ========================================================================
    // Internal / I/O Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error reading input or writing output
    IoError = 21,

    /// Archive could not be created
    ArchiveError = 22,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Check if this exit code is a user/input error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Check if this exit code indicates any error requiring attention.
    pub fn is_error(self) -> bool {
        self.as_i32() >= 10
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Success => "OK",
            ExitCode::Declined => "OK_DECLINED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ColumnNotFound => "ERR_COLUMN_NOT_FOUND",
            ExitCode::MalformedRow => "ERR_MALFORMED_ROW",
            ExitCode::SecretError => "ERR_SECRET",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
            ExitCode::ArchiveError => "ERR_ARCHIVE",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
