//! Choosing an edge source for an input path.
//!
//! | Input                                              | Source                              |
//! |----------------------------------------------------|-------------------------------------|
//! | regular file with extension `bin`                  | [`PlainFileEdgeSource`]             |
//! | directory named like `kron-<n>-<m>` with `block-00.bin` | [`PartitionedSyntheticEdgeSource`] |
//! | any other directory                                | [`ShardedDirectoryEdgeSource`]      |
//!
//! Only the synthetic strategy can seek, so a partial load requested for any
//! other input is refused as a configuration error.

use crate::config::LoaderConfig;
use crate::error::{LoadError, Result};
use crate::io::descriptor::KronDescriptor;
use crate::io::glob::has_kron_shards;
use crate::io::kron::PartitionedSyntheticEdgeSource;
use crate::io::plain::PlainFileEdgeSource;
use crate::io::sharded::ShardedDirectoryEdgeSource;
use crate::source::EdgeSource;
use std::path::Path;
use tracing::info;

/// Input layouts recognized by [`detect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// A single `.bin` file.
    PlainFile,
    /// A directory of `block-NN.bin` shards with a `(n, m)` name.
    Synthetic,
    /// Any other directory of shard files.
    ShardedDirectory,
}

/// Classify `path` without opening any file.
#[must_use]
pub fn detect(path: impl AsRef<Path>) -> Option<InputKind> {
    let path = path.as_ref();
    if path.is_file() {
        return path
            .extension()
            .is_some_and(|ext| ext == "bin")
            .then_some(InputKind::PlainFile);
    }
    if path.is_dir() {
        if has_kron_shards(path) && KronDescriptor::matches(path) {
            return Some(InputKind::Synthetic);
        }
        return Some(InputKind::ShardedDirectory);
    }
    None
}

/// Open the source that applies to `path`, honoring `config`'s partition
/// request and buffer size.
///
/// # Errors
/// [`LoadError::UnknownInput`] when no strategy applies,
/// [`LoadError::PartitionUnsupported`] when a partial load is requested for
/// a forward-only input, and any error from opening the chosen source.
pub fn open_source(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Box<dyn EdgeSource + Send>> {
    let path = path.as_ref();
    let kind = detect(path).ok_or_else(|| LoadError::UnknownInput {
        path: path.to_path_buf(),
    })?;
    if kind != InputKind::Synthetic && config.partition_request().is_some() {
        return Err(LoadError::PartitionUnsupported {
            path: path.to_path_buf(),
        });
    }
    info!(path = %path.display(), kind = ?kind, "edgestream.dispatch");
    Ok(match kind {
        InputKind::PlainFile => Box::new(PlainFileEdgeSource::open(path)?),
        InputKind::ShardedDirectory => Box::new(ShardedDirectoryEdgeSource::with_capacity(
            path,
            config.buffer_records(),
        )?),
        InputKind::Synthetic => Box::new(PartitionedSyntheticEdgeSource::from_config(path, config)?),
    })
}
