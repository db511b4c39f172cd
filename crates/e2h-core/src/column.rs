//! Column locator.

use crate::error::{PipelineError, Result};
use crate::rows::Header;
use std::path::Path;

/// Default column holding the values to hash.
pub const EMAIL_COLUMN: &str = "email";

/// Position of `name` in `header`: exact, case-sensitive, first occurrence.
///
/// `source` is only used for the error message.
pub fn locate(header: &Header, name: &str, source: &Path) -> Result<usize> {
    header
        .fields()
        .iter()
        .position(|field| field == name)
        .ok_or_else(|| PipelineError::ColumnNotFound {
            column: name.to_string(),
            path: std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf()),
        })
}
