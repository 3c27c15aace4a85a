//! Writing edge lists in the on-disk record format.
//!
//! The readers in this crate never write; these helpers exist to produce
//! inputs for them: single files, sharded directories and synthetic dataset
//! directories laid out as `kron-<n>-<m>/block-NN.bin`.

use crate::edge::{Edge, NodeId, RECORD_SIZE, encode_edge, write_edges};
use crate::io::glob::kron_shard_path;
use anyhow::{Context, Result, ensure};
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write `edges` to a single binary file. Parent directories are created.
///
/// # Returns
/// The number of edges written.
///
/// # Errors
/// Returns an error if the file or its directories cannot be created or written.
pub fn write_edge_file(path: impl AsRef<Path>, edges: &[Edge]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_edges(BufWriter::new(f), edges).with_context(|| format!("write {}", path.display()))
}

/// Write one file per entry of `shards` into `dir` (`part-0000.bin`, ...).
///
/// # Returns
/// The shard paths in order.
///
/// # Errors
/// Returns an error if any shard cannot be written.
pub fn write_shard_dir(dir: impl AsRef<Path>, shards: &[Vec<Edge>]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    create_dir_all(dir).with_context(|| format!("mkdir -p {}", dir.display()))?;
    shards
        .iter()
        .enumerate()
        .map(|(i, edges)| {
            let path = dir.join(format!("part-{i:04}.bin"));
            write_edge_file(&path, edges)?;
            Ok(path)
        })
        .collect()
}

/// Write a synthetic dataset `kron-<exponent>-<multiplier>` under `parent`.
///
/// `edges` must yield exactly `2^exponent * multiplier` edges; they are
/// split into shards of `edges_per_shard` records (the last one may be
/// shorter).
///
/// # Returns
/// The dataset directory.
///
/// # Errors
/// Returns an error if the edge count is wrong or any shard cannot be written.
pub fn write_kron_dataset<I>(
    parent: impl AsRef<Path>,
    exponent: u32,
    multiplier: u64,
    edges_per_shard: u64,
    edges: I,
) -> Result<PathBuf>
where
    I: IntoIterator<Item = Edge>,
{
    ensure!(edges_per_shard > 0, "edges_per_shard must be positive");
    let dir = parent.as_ref().join(format!("kron-{exponent}-{multiplier}"));
    create_dir_all(&dir).with_context(|| format!("mkdir -p {}", dir.display()))?;
    let expected = 1u64
        .checked_shl(exponent)
        .and_then(|nodes| nodes.checked_mul(multiplier))
        .with_context(|| format!("2^{exponent} * {multiplier} edges overflows u64"))?;

    let mut written = 0u64;
    let mut shard: Option<BufWriter<File>> = None;
    for edge in edges {
        if written % edges_per_shard == 0 {
            if let Some(mut w) = shard.take() {
                w.flush()?;
            }
            let index = usize::try_from(written / edges_per_shard)?;
            let path = kron_shard_path(&dir, index);
            let f = File::create(&path).with_context(|| format!("create {}", path.display()))?;
            shard = Some(BufWriter::with_capacity(RECORD_SIZE * 4096, f));
        }
        if let Some(w) = shard.as_mut() {
            w.write_all(&encode_edge(edge))?;
        }
        written += 1;
    }
    if let Some(mut w) = shard.take() {
        w.flush()?;
    }
    ensure!(
        written == expected,
        "{} expects {expected} edges, got {written}",
        dir.display()
    );
    Ok(dir)
}

/// Deterministic pseudo-random edges for a `2^exponent`-node, `multiplier`
/// edges-per-node dataset.
///
/// Edge `i` is a pure function of `(seed, i)`, so any slice can be
/// regenerated independently to check a partial load.
pub fn scrambled_edges(exponent: u32, multiplier: u64, seed: u64) -> impl Iterator<Item = Edge> {
    let nodes: NodeId = 1u64.checked_shl(exponent).unwrap_or(0);
    let total = nodes.saturating_mul(multiplier);
    (0..total).map(move |i| scrambled_edge(i, nodes, seed))
}

/// The `index`-th edge produced by [`scrambled_edges`].
#[must_use]
pub fn scrambled_edge(index: u64, nodes: u64, seed: u64) -> Edge {
    let mask = nodes.wrapping_sub(1);
    let a = splitmix64(seed ^ index.wrapping_mul(2));
    let b = splitmix64(seed ^ index.wrapping_mul(2).wrapping_add(1));
    Edge::new(a & mask, b & mask)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
