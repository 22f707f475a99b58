use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use mdag_types::ObjectId;

use crate::error::StoreResult;
use crate::traits::KvStore;

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Values are held behind a `RwLock` for
/// safe concurrent access. Every `put` is counted, including ones that
/// overwrite an existing key, so callers can observe redundant writes.
pub struct InMemoryKvStore {
    values: RwLock<HashMap<ObjectId, Vec<u8>>>,
    puts: AtomicU64,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            puts: AtomicU64::new(0),
        }
    }

    /// Number of values currently stored.
    pub fn len(&self) -> usize {
        self.values.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored values.
    pub fn total_bytes(&self) -> u64 {
        self.values
            .read()
            .expect("lock poisoned")
            .values()
            .map(|v| v.len() as u64)
            .sum()
    }

    /// Number of `put` calls served so far.
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn has(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.values.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }

    fn put(&self, id: &ObjectId, value: &[u8]) -> StoreResult<()> {
        self.puts.fetch_add(1, Ordering::Relaxed);
        let mut map = self.values.write().expect("lock poisoned");
        map.insert(*id, value.to_vec());
        Ok(())
    }

    fn get(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        let map = self.values.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("object_count", &self.len())
            .field("put_count", &self.put_count())
            .finish()
    }
}
