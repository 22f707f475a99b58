//! Content-addressed object storage for mdag.
//!
//! Every node of a Merkle DAG -- file chunks, chunk index nodes, directory
//! listings -- is an immutable [`Object`] stored under the digest of its
//! canonical encoding.
//!
//! # Object Shapes
//!
//! - [`Object::Leaf`] -- raw source bytes, no links
//! - [`Object::Internal`] -- ordered [`Link`]s, each tagged with the
//!   [`ChildKind`] of its target
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `HashMap`-based store for tests and embedding
//! - [`DirKvStore`] -- one file per object, sharded by hash prefix
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writes go through [`ContentWriter`], which checks existence first and
//!    writes each distinct hash at most once.
//! 3. The store never interprets values -- it is a pure key-value store.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod dir;
pub mod error;
pub mod memory;
pub mod object;
pub mod traits;
pub mod writer;

// Re-export primary types at crate root for ergonomic imports.
pub use dir::DirKvStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use object::{ChildKind, Link, Object};
pub use traits::KvStore;
pub use writer::{ContentWriter, WriteStats};
