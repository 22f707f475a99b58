//! Error types for DAG construction.

use std::path::PathBuf;

use mdag_store::StoreError;

/// Errors that abort a build. No partial root is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The store failed an existence check or a write, or an object could
    /// not be encoded.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A hierarchy entry could not provide what its kind promises.
    #[error("malformed hierarchy entry {name}: {reason}")]
    Hierarchy { name: String, reason: String },

    /// A chunk tree of this height cannot hold the bytes it was given.
    #[error("height {height} cannot hold {remaining} bytes")]
    InsufficientHeight { height: u32, remaining: u64 },

    /// The build configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Filesystem error while loading a hierarchy or configuration.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for build results.
pub type BuildResult<T> = Result<T, BuildError>;
