//! Chunking limits and digest selection for a build.

use std::path::Path;

use mdag_crypto::HashAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};

/// Largest leaf chunk, in bytes.
pub const CHUNK_SIZE: usize = 256 * 1024;
/// Largest number of links in one index node.
pub const MAX_LISTLINE: usize = 4096;

/// Tree-shaping parameters for a build.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// chunk_size = 1048576
/// algorithm = "sha256"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Largest leaf chunk, in bytes.
    pub chunk_size: usize,
    /// Largest fan-out of an index node.
    pub max_links: usize,
    /// Digest used for object ids.
    pub algorithm: HashAlgorithm,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            max_links: MAX_LISTLINE,
            algorithm: HashAlgorithm::default(),
        }
    }
}

impl BuildConfig {
    /// Default configuration with different chunking limits.
    pub fn with_limits(chunk_size: usize, max_links: usize) -> Self {
        Self {
            chunk_size,
            max_links,
            ..Default::default()
        }
    }

    /// Reject limits that cannot produce a finite tree.
    pub fn validate(&self) -> BuildResult<()> {
        if self.chunk_size == 0 {
            return Err(BuildError::Config("chunk_size must be positive".into()));
        }
        if self.max_links < 2 {
            return Err(BuildError::Config(format!(
                "max_links must be at least 2, got {}",
                self.max_links
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> BuildResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| BuildError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> BuildResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
