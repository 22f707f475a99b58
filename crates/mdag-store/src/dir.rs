//! Directory-backed store: one file per object.
//!
//! Values live at `<root>/<first two hex chars>/<remaining hex chars>`.
//! Writes land in a temporary file inside the shard directory and are then
//! renamed into place, so a reader never observes a partially written value.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use mdag_types::ObjectId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

#[derive(Debug, Clone)]
pub struct DirKvStore {
    root: PathBuf,
}

impl DirKvStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened directory store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path where the value for `id` is (or would be) stored.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.to_path_components();
        self.root.join(dir).join(file)
    }
}

impl KvStore for DirKvStore {
    fn has(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).try_exists()?)
    }

    fn put(&self, id: &ObjectId, value: &[u8]) -> StoreResult<()> {
        let path = self.object_path(id);
        let shard = path.parent().ok_or_else(|| {
            StoreError::Backend(format!("no shard directory for {}", path.display()))
        })?;
        fs::create_dir_all(shard)?;

        let mut tmp = tempfile::NamedTempFile::new_in(shard)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn get(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.object_path(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
