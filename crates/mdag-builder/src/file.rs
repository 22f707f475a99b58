//! Recursive chunk tree construction for a single file.
//!
//! A tree of height 1 is a list of up to `max_links` chunk leaves; a tree of
//! height `h > 1` is a list of up to `max_links` subtrees of height `h - 1`.
//! Each call reports how many source bytes it consumed so the caller can
//! advance to the next sibling's first byte without rescanning.

use mdag_store::{ChildKind, ContentWriter, Link, Object};
use mdag_types::ObjectId;
use tracing::debug;

use crate::config::BuildConfig;
use crate::error::{BuildError, BuildResult};
use crate::planner::chunk_height;

/// A committed object together with the source bytes it represents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Built {
    pub id: ObjectId,
    pub object: Object,
    pub consumed: u64,
}

/// Build the chunk tree of `height` covering `bytes[start..]`, or as much of
/// it as that height can hold.
///
/// At heights 0 and 1 a remainder that fits in one chunk becomes a single
/// leaf; height 0 fails otherwise. Above height 1 the result is always an
/// index node. Every object produced is committed through `writer` before
/// it is returned. Unusable limits fail with [`BuildError::Config`] before
/// anything is written.
pub fn build_file(
    writer: &mut ContentWriter<'_>,
    config: &BuildConfig,
    height: u32,
    bytes: &[u8],
    start: usize,
) -> BuildResult<Built> {
    config.validate()?;
    build_level(writer, config, height, bytes, start)
}

fn build_level(
    writer: &mut ContentWriter<'_>,
    config: &BuildConfig,
    height: u32,
    bytes: &[u8],
    start: usize,
) -> BuildResult<Built> {
    let remaining = &bytes[start.min(bytes.len())..];

    match height {
        0 | 1 if remaining.len() <= config.chunk_size => commit_leaf(writer, remaining),
        0 => Err(BuildError::InsufficientHeight {
            height,
            remaining: remaining.len() as u64,
        }),
        1 => {
            let mut links = Vec::new();
            let mut consumed = 0u64;
            for chunk in remaining.chunks(config.chunk_size).take(config.max_links) {
                let leaf = commit_leaf(writer, chunk)?;
                links.push(Link::chunk(leaf.id, leaf.consumed, ChildKind::Blob));
                consumed += leaf.consumed;
            }
            commit_list(writer, links, consumed)
        }
        _ => {
            let mut links = Vec::new();
            let mut consumed = 0u64;
            let mut offset = start;
            while links.len() < config.max_links && offset < bytes.len() {
                let child = build_level(writer, config, height - 1, bytes, offset)?;
                links.push(Link::chunk(child.id, child.consumed, child.object.file_kind()));
                offset += child.consumed as usize;
                consumed += child.consumed;
            }
            commit_list(writer, links, consumed)
        }
    }
}

/// Build the complete chunk tree of a file's content, at the planned height.
///
/// Returns the root of the tree and the height used.
pub fn build_file_tree(
    writer: &mut ContentWriter<'_>,
    config: &BuildConfig,
    bytes: &[u8],
) -> BuildResult<(Built, u32)> {
    let height = chunk_height(bytes.len() as u64, config)?;
    let built = build_level(writer, config, height, bytes, 0)?;
    if built.consumed != bytes.len() as u64 {
        return Err(BuildError::InsufficientHeight {
            height,
            remaining: bytes.len() as u64 - built.consumed,
        });
    }
    debug!(
        id = %built.id.short_hex(),
        size = bytes.len(),
        height,
        "file chunk tree built"
    );
    Ok((built, height))
}

fn commit_leaf(writer: &mut ContentWriter<'_>, data: &[u8]) -> BuildResult<Built> {
    let object = Object::leaf(data);
    let id = writer.commit(&object)?;
    Ok(Built {
        id,
        object,
        consumed: data.len() as u64,
    })
}

fn commit_list(
    writer: &mut ContentWriter<'_>,
    links: Vec<Link>,
    consumed: u64,
) -> BuildResult<Built> {
    let object = Object::internal(links);
    let id = writer.commit(&object)?;
    Ok(Built {
        id,
        object,
        consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CHUNK_SIZE, MAX_LISTLINE};
    use crate::testutil::{check_shape, patterned, reassemble};
    use mdag_crypto::{Blake3Hasher, ObjectHasher};
    use mdag_store::{InMemoryKvStore, KvStore};
    use proptest::prelude::*;

    fn build(store: &InMemoryKvStore, config: &BuildConfig, bytes: &[u8]) -> (Built, u32) {
        let mut hasher = Blake3Hasher::new();
        let mut writer = ContentWriter::new(store, &mut hasher);
        build_file_tree(&mut writer, config, bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // Single-chunk files
    // -----------------------------------------------------------------------

    #[test]
    fn empty_file_is_single_empty_leaf() {
        let store = InMemoryKvStore::new();
        let (built, height) = build(&store, &BuildConfig::default(), &[]);

        assert_eq!(height, 0);
        assert_eq!(built.object, Object::leaf(Vec::new()));
        assert_eq!(built.consumed, 0);
        let expected = Blake3Hasher::new().digest(&Object::leaf(Vec::new()).encode().unwrap());
        assert_eq!(built.id, expected);
        assert!(store.has(&expected).unwrap());
    }

    #[test]
    fn exactly_one_chunk_is_a_leaf() {
        let store = InMemoryKvStore::new();
        let bytes = patterned(CHUNK_SIZE);
        let (built, height) = build(&store, &BuildConfig::default(), &bytes);

        assert_eq!(height, 0);
        assert_eq!(built.object.data(), &bytes[..]);
        assert!(built.object.links().is_empty());
        assert_eq!(built.consumed, CHUNK_SIZE as u64);
    }

    // -----------------------------------------------------------------------
    // Index levels
    // -----------------------------------------------------------------------

    #[test]
    fn one_byte_past_a_chunk_makes_two_leaves() {
        let store = InMemoryKvStore::new();
        let bytes = patterned(CHUNK_SIZE + 1);
        let (built, height) = build(&store, &BuildConfig::default(), &bytes);

        assert_eq!(height, 1);
        let links = built.object.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].size, CHUNK_SIZE as u64);
        assert_eq!(links[1].size, 1);
        assert!(links.iter().all(|l| l.name.is_none()));
        let markers: Vec<_> = built.object.markers().collect();
        assert_eq!(markers, vec![ChildKind::Blob, ChildKind::Blob]);
        assert_eq!(built.consumed, bytes.len() as u64);
        assert_eq!(reassemble(&store, &built.id), bytes);
    }

    #[test]
    fn overflowing_fanout_adds_a_level() {
        // Same shape as MAX_LISTLINE * CHUNK_SIZE + 1 at the default limits.
        let config = BuildConfig::with_limits(8, 4);
        let store = InMemoryKvStore::new();
        let bytes = patterned(4 * 8 + 1);
        let (built, height) = build(&store, &config, &bytes);

        assert_eq!(height, 2);
        let links = built.object.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].kind, ChildKind::List);
        assert_eq!(links[0].size, 32);
        assert_eq!(links[1].kind, ChildKind::Blob);
        assert_eq!(links[1].size, 1);

        let first = store.get_object(&links[0].hash).unwrap();
        assert_eq!(first.links().len(), 4);
        assert!(first.markers().all(|k| k == ChildKind::Blob));
        let second = store.get_object(&links[1].hash).unwrap();
        assert_eq!(second.data(), &bytes[32..]);
        assert_eq!(reassemble(&store, &built.id), bytes);
    }

    #[test]
    fn default_limits_plan_two_levels_past_fanout() {
        let size = (MAX_LISTLINE * CHUNK_SIZE + 1) as u64;
        assert_eq!(chunk_height(size, &BuildConfig::default()).unwrap(), 2);
    }

    #[test]
    fn height_one_stops_at_fanout() {
        let config = BuildConfig::with_limits(2, 3);
        let store = InMemoryKvStore::new();
        let mut hasher = Blake3Hasher::new();
        let mut writer = ContentWriter::new(&store, &mut hasher);
        let bytes = patterned(11);

        let built = build_file(&mut writer, &config, 1, &bytes, 0).unwrap();
        assert_eq!(built.object.links().len(), 3);
        assert_eq!(built.consumed, 6);

        let rest = build_file(&mut writer, &config, 1, &bytes, 6).unwrap();
        assert_eq!(rest.consumed, 5);
    }

    #[test]
    fn height_zero_rejects_oversized_input() {
        let config = BuildConfig::with_limits(4, 4);
        let store = InMemoryKvStore::new();
        let mut hasher = Blake3Hasher::new();
        let mut writer = ContentWriter::new(&store, &mut hasher);

        let err = build_file(&mut writer, &config, 0, &patterned(5), 0).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InsufficientHeight { height: 0, remaining: 5 }
        ));
    }

    #[test]
    fn unusable_limits_fail_before_writing() {
        let store = InMemoryKvStore::new();
        let mut hasher = Blake3Hasher::new();
        let mut writer = ContentWriter::new(&store, &mut hasher);
        let bytes = patterned(10);

        for config in [BuildConfig::with_limits(4, 1), BuildConfig::with_limits(0, 4)] {
            let err = build_file_tree(&mut writer, &config, &bytes).unwrap_err();
            assert!(matches!(err, BuildError::Config(_)));
            let err = build_file(&mut writer, &config, 1, &bytes, 0).unwrap_err();
            assert!(matches!(err, BuildError::Config(_)));
        }
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Dedup
    // -----------------------------------------------------------------------

    #[test]
    fn repeated_chunks_are_stored_once() {
        let config = BuildConfig::with_limits(4, 16);
        let store = InMemoryKvStore::new();
        let (built, _) = build(&store, &config, b"abcdabcdabcdabcd");

        let links = built.object.links();
        assert_eq!(links.len(), 4);
        assert!(links.iter().all(|l| l.hash == links[0].hash));
        // one leaf plus the index node
        assert_eq!(store.len(), 2);
        assert_eq!(store.put_count(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn chunk_tree_reassembles(len in 0usize..300, chunk in 1usize..9, fanout in 2usize..5) {
            let config = BuildConfig::with_limits(chunk, fanout);
            let store = InMemoryKvStore::new();
            let bytes = patterned(len);
            let (built, height) = build(&store, &config, &bytes);

            prop_assert_eq!(built.consumed, len as u64);
            prop_assert_eq!(height, chunk_height(len as u64, &config).unwrap());
            check_shape(&store, &built.id, &config);
            prop_assert_eq!(reassemble(&store, &built.id), bytes);
        }
    }
}
