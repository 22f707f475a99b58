use mdag_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::Object;

/// Content-addressed key-value store.
///
/// All implementations must satisfy these invariants:
/// - Keys are opaque content hashes; values are never interpreted.
/// - A value written under a key never changes. Writing the same key twice
///   is harmless because the value is the same.
/// - `has` is safe to call before every `put` (existence-check-then-write).
/// - All I/O errors are propagated, never silently ignored.
pub trait KvStore: Send + Sync {
    /// Check whether a value exists under `id`.
    fn has(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Store `value` under `id`.
    fn put(&self, id: &ObjectId, value: &[u8]) -> StoreResult<()>;

    /// Read the value stored under `id`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    fn get(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>>;

    /// Read and decode the object stored under `id`.
    fn get_object(&self, id: &ObjectId) -> StoreResult<Object> {
        let bytes = self.get(id)?.ok_or(StoreError::NotFound(*id))?;
        Object::decode(id, &bytes)
    }
}
