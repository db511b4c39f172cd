//! Canonical algorithm identifiers.

use crate::error::DigestError;
use serde::{Deserialize, Serialize};

/// A digest algorithm selectable for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
    /// SHA-1 (20-byte digest).
    #[serde(rename = "sha1")]
    Sha1,
    /// SHA-256 (32-byte digest).
    #[serde(rename = "sha256")]
    Sha256,
    /// BLAKE2s with a 32-byte digest.
    #[serde(rename = "blake2s")]
    Blake2s,
    /// BLAKE2b with a 64-byte digest.
    #[serde(rename = "blake2b")]
    Blake2b,
    /// SHA3-256 (32-byte digest).
    #[serde(rename = "sha3-256")]
    Sha3_256,
    /// HMAC over SHA3-256, the only keyed algorithm.
    #[serde(rename = "hmac-sha3-256")]
    HmacSha3_256,
}

impl Algorithm {
    /// Every supported algorithm, unkeyed first.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Blake2s,
        Algorithm::Blake2b,
        Algorithm::Sha3_256,
        Algorithm::HmacSha3_256,
    ];

    /// The canonical identifier, as accepted by [`str::parse`].
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Blake2s => "blake2s",
            Algorithm::Blake2b => "blake2b",
            Algorithm::Sha3_256 => "sha3-256",
            Algorithm::HmacSha3_256 => "hmac-sha3-256",
        }
    }

    /// Whether this algorithm needs a secret.
    pub fn is_keyed(self) -> bool {
        matches!(self, Algorithm::HmacSha3_256)
    }

    /// Digest length in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Algorithm::Sha1 => 20,
            Algorithm::Blake2b => 64,
            Algorithm::Sha256 | Algorithm::Blake2s | Algorithm::Sha3_256 | Algorithm::HmacSha3_256 => 32,
        }
    }

    pub(crate) fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|a| a.id())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for Algorithm {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.id() == wanted)
            .ok_or_else(|| DigestError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
