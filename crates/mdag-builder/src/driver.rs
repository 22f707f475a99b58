//! Entry point: build a whole hierarchy into a store.

use mdag_crypto::{HashAlgorithm, ObjectHasher};
use mdag_store::{ContentWriter, KvStore, WriteStats};
use mdag_types::ObjectId;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::BuildConfig;
use crate::dir::build_dir;
use crate::error::BuildResult;
use crate::file::build_file_tree;
use crate::hierarchy::Node;

/// Build `root` into `store` with the default chunking limits and return
/// the id of the root object.
///
/// Either every object of the DAG is committed and the root id returned, or
/// the build fails.
pub fn add_to_store(
    store: &dyn KvStore,
    root: &Node,
    hasher: &mut dyn ObjectHasher,
) -> BuildResult<ObjectId> {
    Builder::new(store, hasher).build(root).map(|report| report.root)
}

/// Outcome of a successful build.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Id of the root object.
    pub root: ObjectId,
    /// Algorithm the ids were computed with.
    pub algorithm: HashAlgorithm,
    /// Chunk tree height, when the root is a file.
    pub height: Option<u32>,
    /// Declared size of the root.
    pub size: u64,
    pub stats: WriteStats,
}

/// A configured build against one store with one hasher.
///
/// The hasher is borrowed exclusively for the builder's lifetime, so two
/// builders can never interleave updates to the same digest state.
pub struct Builder<'a> {
    store: &'a dyn KvStore,
    hasher: &'a mut dyn ObjectHasher,
    config: BuildConfig,
}

impl<'a> Builder<'a> {
    pub fn new(store: &'a dyn KvStore, hasher: &'a mut dyn ObjectHasher) -> Self {
        let config = BuildConfig {
            algorithm: hasher.algorithm(),
            ..BuildConfig::default()
        };
        Self {
            store,
            hasher,
            config,
        }
    }

    /// Replace the chunking limits. Fails if the configuration is invalid.
    pub fn with_config(mut self, config: BuildConfig) -> BuildResult<Self> {
        config.validate()?;
        if config.algorithm != self.hasher.algorithm() {
            warn!(
                configured = %config.algorithm,
                hasher = %self.hasher.algorithm(),
                "configured algorithm differs from the hasher in use; ids follow the hasher"
            );
        }
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build `root` and every object beneath it.
    pub fn build(&mut self, root: &Node) -> BuildResult<BuildReport> {
        let algorithm = self.hasher.algorithm();
        let mut writer = ContentWriter::new(self.store, &mut *self.hasher);

        let (built, height) = match root {
            Node::File(file) => {
                let bytes = file.bytes()?;
                let (built, height) = build_file_tree(&mut writer, &self.config, &bytes)?;
                (built, Some(height))
            }
            Node::Dir(dir) => (build_dir(&mut writer, &self.config, dir)?, None),
        };

        let stats = writer.stats();
        info!(
            root = %built.id,
            name = root.name(),
            %algorithm,
            written = stats.written,
            deduplicated = stats.deduplicated,
            bytes = stats.bytes_written,
            "build complete"
        );

        Ok(BuildReport {
            root: built.id,
            algorithm,
            height,
            size: root.size(),
            stats,
        })
    }
}
