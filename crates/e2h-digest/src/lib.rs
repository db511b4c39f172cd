//! Digest strategies for email2hash.
//!
//! This crate owns everything that turns one email value into a digest:
//!
//! - **Algorithm identifiers**: the canonical names accepted on the command
//!   line (`sha1`, `sha256`, `blake2s`, `blake2b`, `sha3-256`, `hmac-sha3-256`).
//! - **Registry**: an explicit, immutable table from identifier to constructor,
//!   built once at startup.
//! - **Digesters**: a constructed strategy, bound to its key in keyed mode,
//!   that produces raw bytes or lowercase hex per input.
//! - **Secrets**: the HMAC key value with its strength policy. A secret is
//!   never printed, logged or persisted.
//!
//! # Example
//!
//! ```
//! use e2h_digest::{Registry, Secret};
//!
//! let registry = Registry::standard();
//!
//! let algorithm = registry.resolve("sha256").unwrap();
//! let mut digester = registry.build(algorithm, None).unwrap();
//! assert_eq!(digester.hex_digest(b"a@b.com").len(), 64);
//!
//! let keyed = registry.resolve("hmac-sha3-256").unwrap();
//! let secret = Secret::new("longenoughsecret").unwrap();
//! let mut digester = registry.build(keyed, Some(&secret)).unwrap();
//! assert_eq!(digester.digest(b"a@b.com").len(), 32);
//! ```

pub mod algorithm;
pub mod error;
pub mod registry;
pub mod secret;

pub use algorithm::Algorithm;
pub use error::{DigestError, Result};
pub use registry::{Constructor, Digester, KeyedMac, Registry};
pub use secret::{Secret, SecretRejection, MIN_SECRET_LEN, RECOMMENDED_SECRET_BYTES};
