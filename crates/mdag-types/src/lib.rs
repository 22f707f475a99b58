//! Foundation types for mdag.
//!
//! Every object committed to a store is addressed by an [`ObjectId`], the
//! 256-bit digest of the object's canonical encoding. The digest algorithm
//! itself lives in `mdag-crypto`; this crate only carries the identifier.

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::ObjectId;
