//! Error types for digest selection and construction.

use thiserror::Error;

/// Result type for digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;

/// Errors raised while resolving or building a digest strategy.
///
/// All of these surface at configuration time, before any file is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// The requested identifier is not in the registry.
    #[error("unsupported algorithm '{0}' (supported: {supported})", supported = crate::Algorithm::supported_list())]
    UnsupportedAlgorithm(String),

    /// A keyed algorithm was requested without a secret.
    #[error("algorithm {0} requires a secret")]
    MissingSecret(crate::Algorithm),

    /// A secret was supplied for an algorithm that does not take one.
    #[error("algorithm {0} does not take a secret")]
    UnexpectedSecret(crate::Algorithm),

    /// The MAC rejected the key material.
    #[error("invalid key for {0}")]
    InvalidKey(crate::Algorithm),
}
