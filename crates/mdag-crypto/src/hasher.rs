use std::fmt;
use std::str::FromStr;

use mdag_types::ObjectId;
use serde::{Deserialize, Serialize};
use sha2::Digest;

/// A resettable digest accumulator producing 256-bit object ids.
///
/// Implementations hold mutable state between `update` calls. Callers that
/// hash whole objects should use [`digest`](ObjectHasher::digest), which
/// resets first so nothing fed by an earlier caller can leak into the result.
pub trait ObjectHasher: Send {
    /// The algorithm this hasher implements.
    fn algorithm(&self) -> HashAlgorithm;

    /// Discard any accumulated input.
    fn reset(&mut self);

    /// Feed bytes into the accumulator.
    fn update(&mut self, data: &[u8]);

    /// Produce the digest of everything fed since the last reset, then reset.
    fn finalize_reset(&mut self) -> ObjectId;

    /// Hash `data` from a clean state.
    fn digest(&mut self, data: &[u8]) -> ObjectId {
        self.reset();
        self.update(data);
        self.finalize_reset()
    }
}

/// BLAKE3 hasher.
#[derive(Clone, Default)]
pub struct Blake3Hasher {
    inner: blake3::Hasher,
}

impl Blake3Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectHasher for Blake3Hasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Blake3
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize_reset(&mut self) -> ObjectId {
        let id = ObjectId::from_hash(*self.inner.finalize().as_bytes());
        self.inner.reset();
        id
    }
}

/// SHA-256 hasher.
#[derive(Clone, Default)]
pub struct Sha256Hasher {
    inner: sha2::Sha256,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectHasher for Sha256Hasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.inner);
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize_reset(&mut self) -> ObjectId {
        ObjectId::from_hash(Digest::finalize_reset(&mut self.inner).into())
    }
}

/// Built-in digest algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    /// A fresh hasher for this algorithm. Each build should own its own.
    pub fn hasher(&self) -> Box<dyn ObjectHasher> {
        match self {
            Self::Blake3 => Box::new(Blake3Hasher::new()),
            Self::Sha256 => Box::new(Sha256Hasher::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Blake3 => "blake3",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HasherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(Self::Blake3),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            _ => Err(HasherError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}
