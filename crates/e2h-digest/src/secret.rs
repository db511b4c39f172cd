//! HMAC secret value and strength policy.
//!
//! The secret is used directly as the HMAC key (no key derivation). It is
//! held in memory for one run and never written anywhere.

use thiserror::Error;

/// Minimum secret length in characters. Enforced.
pub const MIN_SECRET_LEN: usize = 10;

/// Recommended secret length in bytes (the SHA3-256 output size). Advisory only.
pub const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Why a candidate secret was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretRejection {
    /// Nothing was entered.
    #[error("the secret cannot be empty")]
    Empty,

    /// Fewer characters than [`MIN_SECRET_LEN`].
    #[error("the secret must be at least {min} characters long (got {len})")]
    TooShort { len: usize, min: usize },

    /// The confirmation entry did not match the first entry.
    #[error("the secrets do not match")]
    Mismatch,
}

/// A validated HMAC key.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Validate a candidate against the length policy.
    pub fn new(value: impl Into<String>) -> Result<Self, SecretRejection> {
        let value = value.into();
        Self::check(&value)?;
        Ok(Self(value))
    }

    /// Run the policy checks without taking ownership.
    pub fn check(value: &str) -> Result<(), SecretRejection> {
        if value.is_empty() {
            return Err(SecretRejection::Empty);
        }
        let len = value.chars().count();
        if len < MIN_SECRET_LEN {
            return Err(SecretRejection::TooShort {
                len,
                min: MIN_SECRET_LEN,
            });
        }
        Ok(())
    }

    /// Key bytes (UTF-8).
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length of the key in bytes.
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    /// True when the key is shorter than [`RECOMMENDED_SECRET_BYTES`].
    pub fn below_recommended(&self) -> bool {
        self.byte_len() < RECOMMENDED_SECRET_BYTES
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        // Best effort only: overwrite in place (capacity is unchanged) before free.
        let len = self.0.len();
        self.0.clear();
        self.0.extend(std::iter::repeat('\0').take(len));
        self.0.clear();
    }
}
