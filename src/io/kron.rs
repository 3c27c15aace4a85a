//! Partitioned reader over synthetic (Kronecker) datasets.
//!
//! The dataset's size comes from its directory name (see
//! [`KronDescriptor`]), and every shard `block-NN.bin` holds the same number
//! of records as `block-00.bin`. That makes any logical edge index
//! addressable, so each instance can be bound to its own [`EdgeSlice`] and
//! many instances can load disjoint parts of one dataset in parallel.
//!
//! ```no_run
//! use edgestream::io::kron::PartitionedSyntheticEdgeSource;
//! use edgestream::source::EdgeSource;
//!
//! // Worker 2 of 4 over a 2^20-node, 16-edges-per-node dataset.
//! let mut src = PartitionedSyntheticEdgeSource::open_part("graphs/kron-20-16", 4, 2)?;
//! let stats = src.stats().unwrap();
//! assert_eq!(stats.edges, (1 << 20) * 16 / 4);
//! while let Some(edge) = src.next_edge()? {
//!     let _ = edge;
//! }
//! # Ok::<(), edgestream::LoadError>(())
//! ```

use crate::config::LoaderConfig;
use crate::edge::{BUFFER_SIZE, Edge, RECORD_SIZE, decode_records, window_bytes};
use crate::error::{LoadError, Result};
use crate::io::descriptor::KronDescriptor;
use crate::io::window::{FileShardStore, ReadCursor, SeekPlan, ShardGeometry, ShardStore};
use crate::partition::{EdgeSlice, plan_slice};
use crate::source::{EdgeSource, GraphStats};
use std::path::Path;
use tracing::debug;

/// Random-access edge source bound to one slice of a synthetic dataset.
pub struct PartitionedSyntheticEdgeSource<S: ShardStore = FileShardStore> {
    descriptor: KronDescriptor,
    geometry: ShardGeometry,
    state: ReadCursor,
    store: S,
    scratch: Vec<u8>,
    window: Vec<Edge>,
}

impl PartitionedSyntheticEdgeSource<FileShardStore> {
    /// Open the whole dataset at `dir`.
    ///
    /// # Errors
    /// See [`Self::with_store`].
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_part(dir, 0, 0)
    }

    /// Open part `part` (1-based) of a `num_parts`-way split; `num_parts == 0`
    /// opens the whole dataset.
    ///
    /// The partition request is validated before any file is touched.
    ///
    /// # Errors
    /// Config errors from [`plan_slice`], then the errors of [`Self::with_store`].
    pub fn open_part(dir: impl AsRef<Path>, num_parts: u64, part: u64) -> Result<Self> {
        Self::open_part_with_capacity(dir, num_parts, part, BUFFER_SIZE)
    }

    /// Open the slice requested by `config`, with its window capacity.
    ///
    /// # Errors
    /// Same as [`Self::open_part`].
    pub fn from_config(dir: impl AsRef<Path>, config: &LoaderConfig) -> Result<Self> {
        Self::open_part_with_capacity(
            dir,
            config.partial_load_num_parts,
            config.partial_load_part,
            config.buffer_records(),
        )
    }

    fn open_part_with_capacity(
        dir: impl AsRef<Path>,
        num_parts: u64,
        part: u64,
        capacity: usize,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        let descriptor = KronDescriptor::parse(dir)?;
        let slice = plan_slice(descriptor.total_edges, num_parts, part)?;
        Self::with_store(descriptor, slice, FileShardStore::new(dir), capacity)
    }
}

impl<S: ShardStore> PartitionedSyntheticEdgeSource<S> {
    /// Bind `slice` of the dataset described by `descriptor`, reading through
    /// `store` with windows of up to `capacity` records.
    ///
    /// `edges_per_shard` is taken from the byte size of shard 0.
    ///
    /// # Errors
    /// [`LoadError::SliceOutOfRange`] if the slice passes the dataset end,
    /// [`LoadError::BufferTooLarge`] if `capacity` exceeds
    /// [`MAX_BUFFER_RECORDS`](crate::edge::MAX_BUFFER_RECORDS),
    /// [`LoadError::Io`] if shard 0 cannot be inspected,
    /// [`LoadError::PartialRecord`] or [`LoadError::Layout`] if its size is
    /// not a positive multiple of the record size.
    pub fn with_store(
        descriptor: KronDescriptor,
        slice: EdgeSlice,
        mut store: S,
        capacity: usize,
    ) -> Result<Self> {
        let total_edges = descriptor.total_edges;
        if slice.begin.checked_add(slice.length).is_none_or(|end| end > total_edges) {
            return Err(LoadError::SliceOutOfRange {
                begin: slice.begin,
                length: slice.length,
                total: total_edges,
            });
        }
        window_bytes(capacity)?;

        let edges_per_shard = if total_edges == 0 {
            1
        } else {
            let bytes = store
                .shard_len(0)
                .map_err(|e| LoadError::io(store.shard_path(0), 0, e))?;
            if bytes % RECORD_SIZE as u64 != 0 {
                return Err(LoadError::partial_record(store.shard_path(0), bytes));
            }
            if bytes == 0 {
                return Err(LoadError::layout(store.shard_path(0), "first shard holds no records"));
            }
            bytes / RECORD_SIZE as u64
        };

        let capacity = capacity.max(1).min(usize::try_from(edges_per_shard).unwrap_or(usize::MAX));
        let geometry = ShardGeometry {
            total_edges,
            edges_per_shard,
            capacity,
        };
        debug!(
            dataset = %descriptor.path.display(),
            total_nodes = descriptor.total_nodes,
            total_edges,
            edges_per_shard,
            slice_begin = slice.begin,
            slice_length = slice.length,
            "edgestream.kron.open"
        );

        Ok(Self {
            descriptor,
            geometry,
            state: ReadCursor::new(slice),
            store,
            scratch: vec![0u8; capacity * RECORD_SIZE],
            window: Vec::with_capacity(capacity),
        })
    }

    /// Dataset this source reads.
    #[must_use]
    pub const fn descriptor(&self) -> &KronDescriptor {
        &self.descriptor
    }

    /// Sizing derived at open time.
    #[must_use]
    pub const fn geometry(&self) -> &ShardGeometry {
        &self.geometry
    }

    /// The slice this instance is bound to.
    #[must_use]
    pub const fn slice(&self) -> EdgeSlice {
        EdgeSlice {
            begin: self.state.slice_begin,
            length: self.state.slice_length,
        }
    }

    /// The shard store reads go through.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Current reader state.
    #[must_use]
    pub const fn cursor(&self) -> &ReadCursor {
        &self.state
    }

    /// Position the stream at logical edge `index` of the whole dataset.
    ///
    /// Returns `Ok(false)` and leaves the position unchanged when `index` lies
    /// outside this instance's slice. Seeking inside the cached window does no
    /// I/O. After a seek, [`EdgeSource::next_edge`] reads on until the slice end.
    ///
    /// # Errors
    /// [`LoadError::Io`] if the target shard cannot be opened or read,
    /// [`LoadError::Layout`] if it is shorter than the uniform shard size.
    pub fn seek(&mut self, index: u64) -> Result<bool> {
        if !self.state.in_slice(index) {
            return Ok(false);
        }
        match self.geometry.plan_seek(&self.state, index) {
            SeekPlan::OutOfRange => Ok(false),
            SeekPlan::Cached { cursor } => {
                self.state.cursor = cursor;
                Ok(true)
            }
            SeekPlan::Refill {
                shard,
                offset,
                records,
            } => {
                self.load_window(index, shard, offset, records)?;
                Ok(true)
            }
        }
    }

    fn load_window(&mut self, index: u64, shard: usize, offset: u64, records: usize) -> Result<()> {
        let want = records * RECORD_SIZE;
        let buf = &mut self.scratch[..want];
        let got = self
            .store
            .read_at(shard, offset * RECORD_SIZE as u64, buf)
            .map_err(|e| LoadError::io(self.store.shard_path(shard), self.state.consumed, e))?;
        if got < want {
            return Err(LoadError::layout(
                self.store.shard_path(shard),
                format!(
                    "shard holds fewer than the {} records of block-00 (short read at record {})",
                    self.geometry.edges_per_shard,
                    offset + (got / RECORD_SIZE) as u64
                ),
            ));
        }
        self.window.clear();
        decode_records(&self.scratch[..want], &mut self.window);
        self.state.refilled(index, shard, records);
        debug!(index, shard, offset, records, "edgestream.kron.refill");
        Ok(())
    }
}

impl<S: ShardStore> EdgeSource for PartitionedSyntheticEdgeSource<S> {
    fn next_edge(&mut self) -> Result<Option<Edge>> {
        let position = self.state.position();
        if !self.state.in_slice(position) {
            return Ok(None);
        }
        if self.state.at_window_end() && !self.seek(position)? {
            return Ok(None);
        }
        let edge = self.window[self.state.cursor];
        self.state.advance();
        Ok(Some(edge))
    }

    fn rewind(&mut self) -> Result<()> {
        self.state.consumed = 0;
        if self.state.slice_length == 0 {
            return Ok(());
        }
        self.seek(self.state.slice_begin)?;
        Ok(())
    }

    fn stats(&self) -> Option<GraphStats> {
        Some(GraphStats::new(
            self.descriptor.total_nodes,
            self.state.slice_length,
        ))
    }

    fn kind(&self) -> &'static str {
        "kron"
    }
}
