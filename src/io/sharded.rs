//! Forward-only reader over a directory of binary edge shards.
//!
//! The logical dataset is the concatenation of every regular file in the
//! directory, in name order. Records are decoded in windows of up to
//! `capacity` edges; when a shard runs dry the next one is opened and
//! reading continues, so shard boundaries are invisible to the caller.
//!
//! This strategy never scans ahead, so [`EdgeSource::stats`] is always
//! `None`, and it has no seek: sharded directories are consumed start to
//! finish by a single instance.

use crate::edge::{BUFFER_SIZE, Edge, RECORD_SIZE, decode_records, read_full, window_bytes};
use crate::error::{LoadError, Result};
use crate::io::glob::list_shard_files;
use crate::source::{EdgeSource, GraphStats};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Streams every shard of a directory as one edge sequence.
pub struct ShardedDirectoryEdgeSource {
    dir: PathBuf,
    shards: Vec<PathBuf>,
    /// Index into `shards` of the shard being read (or next to open).
    shard_index: usize,
    current: Option<File>,
    /// Bytes consumed from the current shard.
    shard_bytes: u64,
    scratch: Vec<u8>,
    buffer: Vec<Edge>,
    cursor: usize,
    delivered: u64,
}

impl ShardedDirectoryEdgeSource {
    /// Open `dir` with the default window of [`BUFFER_SIZE`] records.
    ///
    /// # Errors
    /// [`LoadError::Io`] if the directory cannot be listed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_capacity(dir, BUFFER_SIZE)
    }

    /// Open `dir` decoding up to `capacity` records per refill (minimum 1).
    ///
    /// # Errors
    /// [`LoadError::BufferTooLarge`] above
    /// [`MAX_BUFFER_RECORDS`](crate::edge::MAX_BUFFER_RECORDS) records,
    /// [`LoadError::Io`] if the directory cannot be listed.
    pub fn with_capacity(dir: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let scratch_len = window_bytes(capacity)?;
        let capacity = capacity.max(1);
        let shards = list_shard_files(&dir)?;
        if shards.is_empty() {
            warn!(dir = %dir.display(), "edgestream.sharded.empty_directory");
        }
        debug!(dir = %dir.display(), shards = shards.len(), capacity, "edgestream.sharded.open");
        Ok(Self {
            dir,
            shards,
            shard_index: 0,
            current: None,
            shard_bytes: 0,
            scratch: vec![0u8; scratch_len],
            buffer: Vec::with_capacity(capacity),
            cursor: 0,
            delivered: 0,
        })
    }

    /// The shard files in reading order.
    #[must_use]
    pub fn shards(&self) -> &[PathBuf] {
        &self.shards
    }

    /// Edges handed out since the last rewind.
    #[must_use]
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Decode the next non-empty window, crossing into later shards as needed.
    ///
    /// Returns `false` once every shard is exhausted.
    fn refill(&mut self) -> Result<bool> {
        loop {
            let Some(file) = self.current.as_mut() else {
                let Some(path) = self.shards.get(self.shard_index) else {
                    return Ok(false);
                };
                let file = File::open(path).map_err(|e| LoadError::io(path, self.delivered, e))?;
                debug!(
                    shard = %path.display(),
                    index = self.shard_index,
                    delivered = self.delivered,
                    "edgestream.sharded.next_shard"
                );
                self.current = Some(file);
                self.shard_bytes = 0;
                continue;
            };

            let path = &self.shards[self.shard_index];
            let n = read_full(file, &mut self.scratch)
                .map_err(|e| LoadError::io(path, self.delivered, e))?;
            if n == 0 {
                self.current = None;
                self.shard_index += 1;
                continue;
            }
            self.shard_bytes += n as u64;
            if n % RECORD_SIZE != 0 {
                return Err(LoadError::partial_record(path, self.shard_bytes));
            }

            self.buffer.clear();
            decode_records(&self.scratch[..n], &mut self.buffer);
            self.cursor = 0;
            return Ok(true);
        }
    }
}

impl EdgeSource for ShardedDirectoryEdgeSource {
    fn next_edge(&mut self) -> Result<Option<Edge>> {
        loop {
            if let Some(edge) = self.buffer.get(self.cursor) {
                self.cursor += 1;
                self.delivered += 1;
                return Ok(Some(*edge));
            }
            if !self.refill()? {
                return Ok(None);
            }
        }
    }

    fn rewind(&mut self) -> Result<()> {
        self.current = None;
        self.shards = list_shard_files(&self.dir)?;
        self.shard_index = 0;
        self.shard_bytes = 0;
        self.buffer.clear();
        self.cursor = 0;
        self.delivered = 0;
        Ok(())
    }

    fn stats(&self) -> Option<GraphStats> {
        None
    }

    fn kind(&self) -> &'static str {
        "sharded"
    }
}
