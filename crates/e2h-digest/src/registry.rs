//! Registry of digest constructors and the digesters they build.
//!
//! The registry is an ordinary value built once at startup. Nothing in it is
//! global or mutable after construction; a caller that wants a narrower
//! selection (for example a build that only ships `sha3-256`) builds a
//! restricted registry instead.

use crate::algorithm::Algorithm;
use crate::error::{DigestError, Result};
use crate::secret::Secret;
use digest::DynDigest;
use hmac::{Hmac, Mac};
use sha3::Sha3_256;
use std::collections::BTreeMap;

/// The keyed MAC used by `hmac-sha3-256`.
pub type KeyedMac = Hmac<Sha3_256>;

/// How to construct one algorithm.
#[derive(Clone, Copy)]
pub enum Constructor {
    /// Unkeyed hash; a fresh boxed hasher.
    Plain(fn() -> Box<dyn DynDigest>),
    /// Keyed MAC initialised from key bytes.
    Keyed(fn(&[u8]) -> std::result::Result<KeyedMac, digest::InvalidLength>),
}

impl std::fmt::Debug for Constructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constructor::Plain(_) => f.write_str("Constructor::Plain"),
            Constructor::Keyed(_) => f.write_str("Constructor::Keyed"),
        }
    }
}

fn new_sha1() -> Box<dyn DynDigest> {
    Box::new(sha1::Sha1::default())
}

fn new_sha256() -> Box<dyn DynDigest> {
    Box::new(sha2::Sha256::default())
}

fn new_blake2s() -> Box<dyn DynDigest> {
    Box::new(blake2::Blake2s256::default())
}

fn new_blake2b() -> Box<dyn DynDigest> {
    Box::new(blake2::Blake2b512::default())
}

fn new_sha3_256() -> Box<dyn DynDigest> {
    Box::new(Sha3_256::default())
}

fn new_hmac_sha3_256(key: &[u8]) -> std::result::Result<KeyedMac, digest::InvalidLength> {
    KeyedMac::new_from_slice(key)
}

/// Identifier → constructor table.
#[derive(Debug, Clone)]
pub struct Registry {
    constructors: BTreeMap<Algorithm, Constructor>,
}

impl Registry {
    /// All supported algorithms.
    pub fn standard() -> Self {
        let constructors = BTreeMap::from([
            (Algorithm::Sha1, Constructor::Plain(new_sha1)),
            (Algorithm::Sha256, Constructor::Plain(new_sha256)),
            (Algorithm::Blake2s, Constructor::Plain(new_blake2s)),
            (Algorithm::Blake2b, Constructor::Plain(new_blake2b)),
            (Algorithm::Sha3_256, Constructor::Plain(new_sha3_256)),
            (Algorithm::HmacSha3_256, Constructor::Keyed(new_hmac_sha3_256)),
        ]);
        Self { constructors }
    }

    /// The standard registry narrowed to `allowed`.
    pub fn restricted(allowed: &[Algorithm]) -> Self {
        let mut registry = Self::standard();
        registry
            .constructors
            .retain(|algorithm, _| allowed.contains(algorithm));
        registry
    }

    /// Algorithms available in this registry, in identifier order.
    pub fn algorithms(&self) -> impl Iterator<Item = Algorithm> + '_ {
        self.constructors.keys().copied()
    }

    /// Whether `algorithm` can be built by this registry.
    pub fn contains(&self, algorithm: Algorithm) -> bool {
        self.constructors.contains_key(&algorithm)
    }

    /// Map an identifier to an algorithm this registry can build.
    pub fn resolve(&self, name: &str) -> Result<Algorithm> {
        let algorithm: Algorithm = name.parse()?;
        if !self.contains(algorithm) {
            return Err(DigestError::UnsupportedAlgorithm(name.to_string()));
        }
        Ok(algorithm)
    }

    /// Build a digester, binding the secret for keyed algorithms.
    pub fn build(&self, algorithm: Algorithm, secret: Option<&Secret>) -> Result<Digester> {
        let constructor = self
            .constructors
            .get(&algorithm)
            .ok_or_else(|| DigestError::UnsupportedAlgorithm(algorithm.id().to_string()))?;

        let engine = match (constructor, secret) {
            (Constructor::Plain(new), None) => Engine::Plain(new()),
            (Constructor::Plain(_), Some(_)) => {
                return Err(DigestError::UnexpectedSecret(algorithm));
            }
            (Constructor::Keyed(_), None) => return Err(DigestError::MissingSecret(algorithm)),
            (Constructor::Keyed(new), Some(secret)) => {
                let mac = new(secret.as_bytes()).map_err(|_| DigestError::InvalidKey(algorithm))?;
                Engine::Keyed(Box::new(mac))
            }
        };

        Ok(Digester { algorithm, engine })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

enum Engine {
    Plain(Box<dyn DynDigest>),
    /// Key schedule already applied; cloned per message.
    Keyed(Box<KeyedMac>),
}

/// A constructed digest strategy, ready to hash one value at a time.
pub struct Digester {
    algorithm: Algorithm,
    engine: Engine,
}

impl Digester {
    /// The algorithm this digester implements.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Digest one input.
    pub fn digest(&mut self, input: &[u8]) -> Vec<u8> {
        match &mut self.engine {
            Engine::Plain(hasher) => {
                hasher.update(input);
                hasher.finalize_reset().into_vec()
            }
            Engine::Keyed(mac) => {
                let mut mac = (**mac).clone();
                Mac::update(&mut mac, input);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    /// Digest one input, rendered as lowercase hex.
    pub fn hex_digest(&mut self, input: &[u8]) -> String {
        hex::encode(self.digest(input))
    }
}

impl std::fmt::Debug for Digester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Digester")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn secret() -> Secret {
        Secret::new("longenoughsecret").unwrap()
    }

    #[test]
    fn test_known_vectors() {
        let registry = Registry::standard();

        let mut sha1 = registry.build(Algorithm::Sha1, None).unwrap();
        assert_eq!(sha1.digest(b"abc"), hex!("a9993e364706816aba3e25717850c26c9cd0d89d"));

        let mut sha256 = registry.build(Algorithm::Sha256, None).unwrap();
        assert_eq!(
            sha256.digest(b"abc"),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );

        let mut sha3 = registry.build(Algorithm::Sha3_256, None).unwrap();
        assert_eq!(
            sha3.digest(b"abc"),
            hex!("3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532")
        );

        let mut blake2s = registry.build(Algorithm::Blake2s, None).unwrap();
        assert_eq!(
            blake2s.digest(b"abc"),
            hex!("508c5e8c327c14e2e1a72ba34eeb452f37458b209ed63a294d999b4c86675982")
        );
    }

    #[test]
    fn test_digest_lengths_match_algorithm() {
        let registry = Registry::standard();
        for algorithm in Algorithm::ALL {
            let secret = secret();
            let key = algorithm.is_keyed().then_some(&secret);
            let mut digester = registry.build(algorithm, key).unwrap();
            assert_eq!(digester.digest(b"a@b.com").len(), algorithm.digest_len());
        }
    }

    #[test]
    fn test_reuse_resets_state() {
        let registry = Registry::standard();
        let mut digester = registry.build(Algorithm::Sha256, None).unwrap();
        let first = digester.hex_digest(b"a@b.com");
        digester.hex_digest(b"other@example.com");
        assert_eq!(digester.hex_digest(b"a@b.com"), first);
    }

    #[test]
    fn test_keyed_reuse_is_stable() {
        let registry = Registry::standard();
        let secret = secret();
        let mut digester = registry.build(Algorithm::HmacSha3_256, Some(&secret)).unwrap();
        let first = digester.hex_digest(b"a@b.com");
        digester.hex_digest(b"x@y.com");
        assert_eq!(digester.hex_digest(b"a@b.com"), first);
    }

    #[test]
    fn test_hex_is_lowercase() {
        let registry = Registry::standard();
        let mut digester = registry.build(Algorithm::Blake2b, None).unwrap();
        let hex = digester.hex_digest(b"a@b.com");
        assert_eq!(hex.len(), 128);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_keyed_requires_secret() {
        let registry = Registry::standard();
        let err = registry.build(Algorithm::HmacSha3_256, None).unwrap_err();
        assert_eq!(err, DigestError::MissingSecret(Algorithm::HmacSha3_256));
    }

    #[test]
    fn test_unkeyed_rejects_secret() {
        let registry = Registry::standard();
        let secret = secret();
        let err = registry.build(Algorithm::Sha1, Some(&secret)).unwrap_err();
        assert_eq!(err, DigestError::UnexpectedSecret(Algorithm::Sha1));
    }

    #[test]
    fn test_restricted_registry() {
        let registry = Registry::restricted(&[Algorithm::Sha3_256, Algorithm::HmacSha3_256]);
        assert_eq!(registry.resolve("sha3-256").unwrap(), Algorithm::Sha3_256);
        assert_eq!(
            registry.resolve("sha1").unwrap_err(),
            DigestError::UnsupportedAlgorithm("sha1".to_string())
        );
        assert!(registry.build(Algorithm::Sha256, None).is_err());
        assert_eq!(registry.algorithms().count(), 2);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = Registry::standard();
        assert!(matches!(
            registry.resolve("md5"),
            Err(DigestError::UnsupportedAlgorithm(name)) if name == "md5"
        ));
    }
}
