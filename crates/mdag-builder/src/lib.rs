//! Merkle DAG ingestion for mdag.
//!
//! Turns a file/directory hierarchy into content-addressed objects and
//! commits every one of them to a [`KvStore`](mdag_store::KvStore),
//! returning the id of the root object.
//!
//! Files larger than one chunk are split into leaves of at most
//! `chunk_size` bytes, grouped under index nodes of at most `max_links`
//! children. The number of index levels is the smallest height whose
//! capacity covers the file (see [`planner`]). Directories become a single
//! internal node linking each named child.
//!
//! ```no_run
//! use mdag_builder::{add_to_store, DirNode, FileNode, Node};
//! use mdag_crypto::Blake3Hasher;
//! use mdag_store::InMemoryKvStore;
//!
//! let store = InMemoryKvStore::new();
//! let root = Node::Dir(DirNode::new("docs", vec![
//!     Node::File(FileNode::new("readme.txt", b"hello".to_vec())),
//! ]));
//! let id = add_to_store(&store, &root, &mut Blake3Hasher::new()).unwrap();
//! println!("root {id}");
//! ```

pub mod config;
pub mod dir;
pub mod driver;
pub mod error;
pub mod file;
pub mod hierarchy;
pub mod planner;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{BuildConfig, CHUNK_SIZE, MAX_LISTLINE};
pub use dir::build_dir;
pub use driver::{add_to_store, BuildReport, Builder};
pub use error::{BuildError, BuildResult};
pub use file::{build_file, build_file_tree, Built};
pub use hierarchy::{DirNode, FileNode, Node};
pub use planner::{chunk_height, ChunkPlan};
