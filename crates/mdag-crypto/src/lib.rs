//! Content hashing for mdag.
//!
//! Object ids are digests of canonical object encodings. The digest is
//! pluggable through [`ObjectHasher`]; [`HashAlgorithm`] names the built-in
//! implementations and acts as their factory.
//!
//! Both hashers wrap established libraries.

pub mod hasher;

pub use hasher::{Blake3Hasher, HashAlgorithm, HasherError, ObjectHasher, Sha256Hasher};
