//! Seek and refill arithmetic for uniformly sharded datasets.
//!
//! A synthetic dataset is split into shards that all hold exactly
//! `edges_per_shard` records, so a logical edge index maps to
//! `(index / edges_per_shard, index % edges_per_shard)` without touching the
//! disk. The reader keeps one decoded window of consecutive edges; a window
//! never spans two shards and never reaches past the dataset's last edge.
//!
//! Everything here is pure: [`ShardGeometry::plan_seek`] decides what a seek
//! needs and [`ReadCursor`] records where the reader stands. The I/O happens in
//! [`crate::io::kron`] against a [`ShardStore`], which tests replace with an
//! in-memory store.

use crate::edge::read_full;
use crate::io::glob::kron_shard_path;
use crate::partition::EdgeSlice;
use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed sizing of a uniformly sharded dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShardGeometry {
    /// Edges in the whole dataset.
    pub total_edges: u64,
    /// Edges in every shard.
    pub edges_per_shard: u64,
    /// Maximum records decoded per window.
    pub capacity: usize,
}

/// Outcome of planning a seek.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekPlan {
    /// The index is at or past the end of the dataset.
    OutOfRange,
    /// The index is inside the cached window; only the cursor moves.
    Cached {
        /// New cursor within the window.
        cursor: usize,
    },
    /// The window has to be reloaded from disk.
    Refill {
        /// Shard holding the index.
        shard: usize,
        /// Record offset of the index inside that shard.
        offset: u64,
        /// Records to load starting at `offset`.
        records: usize,
    },
}

impl ShardGeometry {
    /// Physical position `(shard, offset_in_shard)` of logical edge `index`.
    #[must_use]
    pub const fn locate(&self, index: u64) -> (usize, u64) {
        (
            (index / self.edges_per_shard) as usize,
            index % self.edges_per_shard,
        )
    }

    /// Decide how to position `state` at logical edge `index`.
    #[must_use]
    pub fn plan_seek(&self, state: &ReadCursor, index: u64) -> SeekPlan {
        if index >= self.total_edges {
            return SeekPlan::OutOfRange;
        }
        if state.window_contains(index) {
            return SeekPlan::Cached {
                cursor: (index - state.window_begin) as usize,
            };
        }
        let (shard, offset) = self.locate(index);
        let left_in_shard = self.edges_per_shard - offset;
        let left_in_dataset = self.total_edges - index;
        let records = (self.capacity as u64)
            .min(left_in_shard)
            .min(left_in_dataset) as usize;
        SeekPlan::Refill {
            shard,
            offset,
            records,
        }
    }

    /// Number of shard files the dataset spans.
    #[must_use]
    pub const fn shard_count(&self) -> u64 {
        self.total_edges.div_ceil(self.edges_per_shard)
    }
}

/// Position of a partitioned reader: the cached window and the slice it serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadCursor {
    /// Shard the window was loaded from, if any.
    pub shard_index: Option<usize>,
    /// Logical index of the window's first edge.
    pub window_begin: u64,
    /// Edges in the window.
    pub window_len: usize,
    /// Next unread position within the window.
    pub cursor: usize,
    /// First logical index of the owned slice.
    pub slice_begin: u64,
    /// Edges in the owned slice.
    pub slice_length: u64,
    /// Edges delivered since the last rewind.
    pub consumed: u64,
}

impl ReadCursor {
    /// An empty window positioned at the start of `slice`.
    #[must_use]
    pub const fn new(slice: EdgeSlice) -> Self {
        Self {
            shard_index: None,
            window_begin: slice.begin,
            window_len: 0,
            cursor: 0,
            slice_begin: slice.begin,
            slice_length: slice.length,
            consumed: 0,
        }
    }

    /// Whether logical `index` is cached.
    #[must_use]
    pub const fn window_contains(&self, index: u64) -> bool {
        index >= self.window_begin && index < self.window_begin + self.window_len as u64
    }

    /// Logical index of the next edge to read.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.window_begin + self.cursor as u64
    }

    /// Whether the cursor has used up the window.
    #[must_use]
    pub const fn at_window_end(&self) -> bool {
        self.cursor >= self.window_len
    }

    /// Whether logical `index` lies inside the owned slice.
    #[must_use]
    pub const fn in_slice(&self, index: u64) -> bool {
        index >= self.slice_begin && index - self.slice_begin < self.slice_length
    }

    /// Record a freshly loaded window starting at `index`.
    pub fn refilled(&mut self, index: u64, shard: usize, len: usize) {
        self.shard_index = Some(shard);
        self.window_begin = index;
        self.window_len = len;
        self.cursor = 0;
    }

    /// Step past one delivered edge.
    pub fn advance(&mut self) {
        self.cursor += 1;
        self.consumed += 1;
    }
}

/// Random-access byte reads over the shards of one dataset.
pub trait ShardStore {
    /// Byte length of shard `index`.
    ///
    /// # Errors
    /// Any error opening or inspecting the shard.
    fn shard_len(&mut self, index: usize) -> io::Result<u64>;

    /// Fill `buf` from shard `index` starting at byte `offset`.
    ///
    /// Returns fewer bytes than `buf.len()` only at end of shard.
    ///
    /// # Errors
    /// Any error opening, seeking or reading the shard.
    fn read_at(&mut self, index: usize, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Path of shard `index`, for diagnostics.
    fn shard_path(&self, index: usize) -> PathBuf;
}

/// [`ShardStore`] over `block-NN.bin` files, keeping one shard open at a time.
pub struct FileShardStore {
    dir: PathBuf,
    open: Option<(usize, File)>,
}

impl FileShardStore {
    /// Store rooted at the dataset directory `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            open: None,
        }
    }

    fn file(&mut self, index: usize) -> io::Result<&mut File> {
        if self.open.as_ref().is_none_or(|(i, _)| *i != index) {
            // Drop the previous handle before opening the next one.
            self.open = None;
            let path = kron_shard_path(&self.dir, index);
            debug!(shard = %path.display(), index, "edgestream.kron.open_shard");
            self.open = Some((index, File::open(path)?));
        }
        match self.open.as_mut() {
            Some((_, file)) => Ok(file),
            None => Err(io::Error::other("shard handle missing after open")),
        }
    }
}

impl ShardStore for FileShardStore {
    fn shard_len(&mut self, index: usize) -> io::Result<u64> {
        Ok(self.file(index)?.metadata()?.len())
    }

    fn read_at(&mut self, index: usize, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let file = self.file(index)?;
        file.seek(SeekFrom::Start(offset))?;
        read_full(file, buf)
    }

    fn shard_path(&self, index: usize) -> PathBuf {
        kron_shard_path(&self.dir, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> ShardGeometry {
        ShardGeometry {
            total_edges: 32,
            edges_per_shard: 10,
            capacity: 4,
        }
    }

    #[test]
    fn locate_splits_index() {
        let g = geometry();
        assert_eq!(g.locate(0), (0, 0));
        assert_eq!(g.locate(9), (0, 9));
        assert_eq!(g.locate(10), (1, 0));
        assert_eq!(g.locate(31), (3, 1));
        assert_eq!(g.shard_count(), 4);
    }

    #[test]
    fn out_of_range_past_total() {
        let state = ReadCursor::new(EdgeSlice::whole(32));
        assert_eq!(geometry().plan_seek(&state, 32), SeekPlan::OutOfRange);
        assert_eq!(geometry().plan_seek(&state, u64::MAX), SeekPlan::OutOfRange);
    }

    #[test]
    fn refill_is_capped_by_capacity_shard_and_total() {
        let g = geometry();
        let state = ReadCursor::new(EdgeSlice::whole(32));
        assert_eq!(
            g.plan_seek(&state, 3),
            SeekPlan::Refill { shard: 0, offset: 3, records: 4 }
        );
        // two left in shard 0
        assert_eq!(
            g.plan_seek(&state, 8),
            SeekPlan::Refill { shard: 0, offset: 8, records: 2 }
        );
        // two left in the dataset
        assert_eq!(
            g.plan_seek(&state, 30),
            SeekPlan::Refill { shard: 3, offset: 0, records: 2 }
        );
    }

    #[test]
    fn cached_window_only_moves_cursor() {
        let g = geometry();
        let mut state = ReadCursor::new(EdgeSlice::whole(32));
        state.refilled(12, 1, 4);
        assert_eq!(g.plan_seek(&state, 12), SeekPlan::Cached { cursor: 0 });
        assert_eq!(g.plan_seek(&state, 15), SeekPlan::Cached { cursor: 3 });
        assert!(matches!(g.plan_seek(&state, 16), SeekPlan::Refill { shard: 1, offset: 6, .. }));
        assert!(matches!(g.plan_seek(&state, 11), SeekPlan::Refill { .. }));
    }

    #[test]
    fn windows_tile_the_dataset_without_gaps() {
        let g = geometry();
        let mut state = ReadCursor::new(EdgeSlice::whole(32));
        let mut index = 0;
        let mut windows = Vec::new();
        while let SeekPlan::Refill { shard, offset, records } = g.plan_seek(&state, index) {
            assert_eq!(shard as u64 * 10 + offset, index);
            state.refilled(index, shard, records);
            windows.push((index, records));
            index += records as u64;
        }
        assert_eq!(index, 32);
        assert_eq!(
            windows,
            vec![(0, 4), (4, 4), (8, 2), (10, 4), (14, 4), (18, 2), (20, 4), (24, 4), (28, 2), (30, 2)]
        );
    }

    #[test]
    fn cursor_bookkeeping() {
        let mut state = ReadCursor::new(EdgeSlice { begin: 8, length: 2 });
        assert!(state.at_window_end());
        assert_eq!(state.position(), 8);
        state.refilled(8, 0, 2);
        state.advance();
        assert_eq!(state.position(), 9);
        assert!(state.in_slice(state.position()));
        state.advance();
        assert!(state.at_window_end());
        assert_eq!(state.consumed, 2);
        assert!(!state.in_slice(state.position()));
        assert!(!state.in_slice(7));
    }
}
