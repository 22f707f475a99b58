use mdag_crypto::ObjectHasher;
use mdag_types::ObjectId;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreResult;
use crate::object::Object;
use crate::traits::KvStore;

/// Counters for one build's worth of commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    /// Objects written to the store.
    pub written: u64,
    /// Objects skipped because their id was already present.
    pub deduplicated: u64,
    /// Encoded bytes written.
    pub bytes_written: u64,
}

impl WriteStats {
    /// Objects committed, written or not.
    pub fn committed(&self) -> u64 {
        self.written + self.deduplicated
    }
}

/// Commits objects to a [`KvStore`] under the digest of their encoding.
///
/// A value is written only when the store does not already hold its id, so
/// content that recurs anywhere in a build is stored once.
pub struct ContentWriter<'a> {
    store: &'a dyn KvStore,
    hasher: &'a mut dyn ObjectHasher,
    stats: WriteStats,
}

impl<'a> ContentWriter<'a> {
    pub fn new(store: &'a dyn KvStore, hasher: &'a mut dyn ObjectHasher) -> Self {
        Self {
            store,
            hasher,
            stats: WriteStats::default(),
        }
    }

    /// Encode, hash and (if absent) store an object. Returns its id.
    pub fn commit(&mut self, object: &Object) -> StoreResult<ObjectId> {
        let bytes = object.encode()?;
        let id = self.hasher.digest(&bytes);

        if self.store.has(&id)? {
            self.stats.deduplicated += 1;
            debug!(id = %id.short_hex(), "object already present");
            return Ok(id);
        }

        self.store.put(&id, &bytes)?;
        self.stats.written += 1;
        self.stats.bytes_written += bytes.len() as u64;
        debug!(
            id = %id.short_hex(),
            bytes = bytes.len(),
            links = object.links().len(),
            "object written"
        );
        Ok(id)
    }

    pub fn stats(&self) -> WriteStats {
        self.stats
    }
}
