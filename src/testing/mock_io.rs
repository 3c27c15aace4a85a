//! Temporary on-disk inputs and an in-memory shard store.

use crate::edge::{Edge, encode_edge};
use crate::error::Result as LoadResult;
use crate::io::glob::kron_shard_path;
use crate::io::window::ShardStore;
use crate::io::writer::{write_edge_file, write_kron_dataset, write_shard_dir};
use crate::source::EdgeSource;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// A named edge file that lives as long as this guard.
pub struct TempFilePath(NamedTempFile);

impl TempFilePath {
    /// Create an empty file named `*.{extension}`; sources dispatch on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn with_extension(extension: &str) -> io::Result<Self> {
        tempfile::Builder::new()
            .prefix("edges-")
            .suffix(&format!(".{extension}"))
            .tempfile()
            .map(Self)
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.0.path()
    }
}

/// A scratch directory for shard sets and datasets, removed on drop.
pub struct TempDirPath(TempDir);

impl TempDirPath {
    /// Create an empty directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> io::Result<Self> {
        tempfile::Builder::new().prefix("shards-").tempdir().map(Self)
    }

    /// Location of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.0.path()
    }

    /// `name` joined onto the directory; nothing is created.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }
}

/// Write `edges` to a temporary `.bin` file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn mock_edge_file(edges: &[Edge]) -> anyhow::Result<TempFilePath> {
    let temp = TempFilePath::with_extension("bin")?;
    write_edge_file(temp.path(), edges)?;
    Ok(temp)
}

/// Write each entry of `shards` as one file of a temporary shard directory.
///
/// # Errors
///
/// Returns an error if the directory or a shard cannot be written.
pub fn mock_shard_dir(shards: &[Vec<Edge>]) -> anyhow::Result<TempDirPath> {
    let temp = TempDirPath::new()?;
    write_shard_dir(temp.path(), shards)?;
    Ok(temp)
}

/// Write a synthetic dataset `kron-<exponent>-<multiplier>` into a temporary
/// directory. Returns the guard and the dataset path.
///
/// # Errors
///
/// Returns an error if `edges` has the wrong length or a shard cannot be written.
pub fn mock_kron_dataset(
    exponent: u32,
    multiplier: u64,
    edges_per_shard: u64,
    edges: &[Edge],
) -> anyhow::Result<(TempDirPath, PathBuf)> {
    let temp = TempDirPath::new()?;
    let dir = write_kron_dataset(
        temp.path(),
        exponent,
        multiplier,
        edges_per_shard,
        edges.iter().copied(),
    )?;
    Ok((temp, dir))
}

/// Drive `source` to exhaustion and return what it produced.
///
/// # Errors
///
/// The first error the source reports.
pub fn collect_edges<S: EdgeSource + ?Sized>(source: &mut S) -> LoadResult<Vec<Edge>> {
    let mut out = Vec::new();
    while let Some(edge) = source.next_edge()? {
        out.push(edge);
    }
    Ok(out)
}

/// In-memory [`ShardStore`] that records how often it is read.
#[derive(Clone, Debug, Default)]
pub struct MemShardStore {
    shards: Vec<Vec<u8>>,
    reads: usize,
    switches: usize,
    last: Option<usize>,
}

impl MemShardStore {
    /// Encode `edges` into shards of `edges_per_shard` records.
    #[must_use]
    pub fn from_edges(edges: &[Edge], edges_per_shard: usize) -> Self {
        let shards = edges
            .chunks(edges_per_shard.max(1))
            .map(|chunk| chunk.iter().flat_map(|e| encode_edge(*e)).collect())
            .collect();
        Self::from_shards(shards)
    }

    /// Use raw shard bytes as given.
    #[must_use]
    pub fn from_shards(shards: Vec<Vec<u8>>) -> Self {
        Self {
            shards,
            ..Self::default()
        }
    }

    /// Number of [`ShardStore::read_at`] calls so far.
    #[must_use]
    pub const fn reads(&self) -> usize {
        self.reads
    }

    /// Number of times a read targeted a different shard than the previous one.
    #[must_use]
    pub const fn switches(&self) -> usize {
        self.switches
    }

    fn shard(&self, index: usize) -> io::Result<&[u8]> {
        self.shards.get(index).map(Vec::as_slice).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no shard {index}"))
        })
    }
}

impl ShardStore for MemShardStore {
    fn shard_len(&mut self, index: usize) -> io::Result<u64> {
        Ok(self.shard(index)?.len() as u64)
    }

    fn read_at(&mut self, index: usize, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let shard = self.shard(index)?;
        let start = usize::try_from(offset).map_err(io::Error::other)?.min(shard.len());
        let n = buf.len().min(shard.len() - start);
        buf[..n].copy_from_slice(&shard[start..start + n]);
        self.reads += 1;
        if self.last.is_some_and(|last| last != index) {
            self.switches += 1;
        }
        self.last = Some(index);
        Ok(n)
    }

    fn shard_path(&self, index: usize) -> PathBuf {
        kron_shard_path("memory", index)
    }
}
