//! Helpers shared by the builder tests.

use mdag_store::{InMemoryKvStore, KvStore, Object};
use mdag_types::ObjectId;

use crate::config::BuildConfig;

/// Deterministic non-repeating-ish content of `len` bytes.
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Concatenate the leaves under `id` in link order.
pub fn reassemble(store: &InMemoryKvStore, id: &ObjectId) -> Vec<u8> {
    match store.get_object(id).unwrap() {
        Object::Leaf { data } => data,
        Object::Internal { links } => links
            .iter()
            .flat_map(|link| reassemble(store, &link.hash))
            .collect(),
    }
}

/// Assert the chunk tree under `id` respects the configured limits and that
/// every link's size matches the bytes beneath it. Returns that byte count.
pub fn check_shape(store: &InMemoryKvStore, id: &ObjectId, config: &BuildConfig) -> u64 {
    match store.get_object(id).unwrap() {
        Object::Leaf { data } => {
            assert!(data.len() <= config.chunk_size, "leaf of {} bytes", data.len());
            data.len() as u64
        }
        Object::Internal { links } => {
            assert!(links.len() <= config.max_links, "{} links", links.len());
            links
                .iter()
                .map(|link| {
                    let size = check_shape(store, &link.hash, config);
                    assert_eq!(link.size, size);
                    assert_eq!(link.kind, store.get_object(&link.hash).unwrap().file_kind());
                    size
                })
                .sum()
        }
    }
}
