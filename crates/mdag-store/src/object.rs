use mdag_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// What a link points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildKind {
    /// A leaf object holding raw bytes.
    Blob,
    /// An internal node of a file's chunk tree.
    List,
    /// A directory.
    Tree,
}

impl std::fmt::Display for ChildKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::List => write!(f, "list"),
            Self::Tree => write!(f, "tree"),
        }
    }
}

/// A reference from a parent object to an already committed child.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Id of the child's canonical encoding.
    pub hash: ObjectId,
    /// Source bytes represented by the child subtree.
    pub size: u64,
    /// Entry name; only directory entries carry one.
    pub name: Option<String>,
    /// Classification of the child.
    pub kind: ChildKind,
}

impl Link {
    /// An unnamed link inside a file's chunk tree.
    pub fn chunk(hash: ObjectId, size: u64, kind: ChildKind) -> Self {
        Self {
            hash,
            size,
            name: None,
            kind,
        }
    }

    /// A named directory entry.
    pub fn entry(name: impl Into<String>, hash: ObjectId, size: u64, kind: ChildKind) -> Self {
        Self {
            hash,
            size,
            name: Some(name.into()),
            kind,
        }
    }
}

/// A node of the Merkle DAG.
///
/// Leaves carry raw bytes and never links; internal nodes carry only links.
/// Each link holds its own [`ChildKind`], so there is exactly one marker per
/// link, in link order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Object {
    Leaf { data: Vec<u8> },
    Internal { links: Vec<Link> },
}

impl Object {
    pub fn leaf(data: impl Into<Vec<u8>>) -> Self {
        Self::Leaf { data: data.into() }
    }

    pub fn internal(links: Vec<Link>) -> Self {
        Self::Internal { links }
    }

    /// Links of an internal node; empty for a leaf.
    pub fn links(&self) -> &[Link] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Internal { links } => links,
        }
    }

    /// Raw bytes of a leaf; empty for an internal node.
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Leaf { data } => data,
            Self::Internal { .. } => &[],
        }
    }

    /// One marker per link, in link order.
    pub fn markers(&self) -> impl Iterator<Item = ChildKind> + '_ {
        self.links().iter().map(|link| link.kind)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Marker a parent uses when this object is part of a file: `Blob` when it
    /// has no links, `List` otherwise.
    pub fn file_kind(&self) -> ChildKind {
        if self.links().is_empty() {
            ChildKind::Blob
        } else {
            ChildKind::List
        }
    }

    /// Canonical encoding used both as hash input and as the stored value.
    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| StoreError::Encoding(e.to_string()))
    }

    /// Decode a stored value. `id` is only used for error context.
    pub fn decode(id: &ObjectId, bytes: &[u8]) -> StoreResult<Self> {
        bincode::deserialize(bytes).map_err(|e| StoreError::CorruptObject {
            id: *id,
            reason: e.to_string(),
        })
    }
}
