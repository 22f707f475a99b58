//! Chunk tree height planning.
//!
//! A tree of height `h` indexes at most `max_links^h` leaf chunks. A file
//! needs `ceil(size / chunk_size)` chunks, so its height is the smallest `h`
//! whose capacity covers that count. Height 0 is a single leaf.

use serde::Serialize;

use crate::config::BuildConfig;
use crate::error::BuildResult;

/// Number of leaf chunks a file of `size` bytes splits into. `chunk_size`
/// must be non-zero.
pub(crate) fn num_chunks(size: u64, chunk_size: usize) -> u64 {
    size.div_ceil(chunk_size as u64)
}

/// Leaf chunks a tree of `height` can index. Saturates at `u64::MAX`.
pub(crate) fn capacity(height: u32, max_links: usize) -> u64 {
    (max_links as u64).saturating_pow(height)
}

/// Smallest height whose capacity covers a file of `size` bytes.
///
/// Fails with [`BuildError::Config`](crate::BuildError::Config) when the
/// limits cannot bound a tree (`chunk_size == 0` or `max_links < 2`).
pub fn chunk_height(size: u64, config: &BuildConfig) -> BuildResult<u32> {
    config.validate()?;
    let chunks = num_chunks(size, config.chunk_size);
    let mut height = 0;
    while capacity(height, config.max_links) < chunks {
        height += 1;
    }
    Ok(height)
}

/// Chunking summary for one file size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChunkPlan {
    pub size: u64,
    pub num_chunks: u64,
    pub height: u32,
}

impl ChunkPlan {
    pub fn for_size(size: u64, config: &BuildConfig) -> BuildResult<Self> {
        let height = chunk_height(size, config)?;
        Ok(Self {
            size,
            num_chunks: num_chunks(size, config.chunk_size),
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CHUNK_SIZE, MAX_LISTLINE};
    use crate::error::BuildError;
    use proptest::prelude::*;

    const CHUNK: u64 = CHUNK_SIZE as u64;
    const FANOUT: u64 = MAX_LISTLINE as u64;

    fn height(size: u64) -> u32 {
        chunk_height(size, &BuildConfig::default()).unwrap()
    }

    #[test]
    fn single_chunk_files_have_height_zero() {
        assert_eq!(height(0), 0);
        assert_eq!(height(1), 0);
        assert_eq!(height(CHUNK), 0);
    }

    #[test]
    fn one_index_level_up_to_full_fanout() {
        assert_eq!(height(CHUNK + 1), 1);
        assert_eq!(height(FANOUT * CHUNK), 1);
    }

    #[test]
    fn second_level_starts_past_fanout() {
        assert_eq!(height(FANOUT * CHUNK + 1), 2);
        assert_eq!(height(FANOUT * FANOUT * CHUNK), 2);
        assert_eq!(height(FANOUT * FANOUT * CHUNK + 1), 3);
    }

    #[test]
    fn chunk_counts_round_up() {
        assert_eq!(num_chunks(0, CHUNK_SIZE), 0);
        assert_eq!(num_chunks(1, CHUNK_SIZE), 1);
        assert_eq!(num_chunks(CHUNK + 1, CHUNK_SIZE), 2);
    }

    #[test]
    fn capacity_saturates() {
        assert_eq!(capacity(0, 4096), 1);
        assert_eq!(capacity(2, 4096), 4096 * 4096);
        assert_eq!(capacity(100, 4096), u64::MAX);
    }

    #[test]
    fn huge_sizes_terminate() {
        assert_eq!(height(u64::MAX), 4);
    }

    #[test]
    fn small_limits() {
        let config = BuildConfig::with_limits(4, 3);
        let plan = ChunkPlan::for_size(37, &config).unwrap();
        assert_eq!(plan.num_chunks, 10);
        assert_eq!(plan.height, 3);
    }

    #[test]
    fn unbounded_limits_are_rejected() {
        // fan-out 1 never grows capacity; chunk size 0 divides by zero
        for config in [
            BuildConfig::with_limits(4, 1),
            BuildConfig::with_limits(4, 0),
            BuildConfig::with_limits(0, 4),
        ] {
            assert!(matches!(chunk_height(10, &config), Err(BuildError::Config(_))));
            assert!(matches!(ChunkPlan::for_size(10, &config), Err(BuildError::Config(_))));
        }
    }

    proptest! {
        #[test]
        fn height_is_monotonic(a in 0u64..1 << 40, b in 0u64..1 << 40) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(height(small) <= height(large));
        }

        #[test]
        fn height_is_minimal(size in 0u64..10_000, chunk in 1usize..64, fanout in 2usize..8) {
            let config = BuildConfig::with_limits(chunk, fanout);
            let h = chunk_height(size, &config).unwrap();
            let chunks = num_chunks(size, chunk);
            prop_assert!(capacity(h, fanout) >= chunks);
            if h > 0 {
                prop_assert!(capacity(h - 1, fanout) < chunks);
            }
        }
    }
}
