//! Shard discovery for directory-backed datasets.
//!
//! Directory listings come back in whatever order the filesystem prefers, and
//! shard order defines which bytes make up the logical dataset. Everything
//! here therefore returns paths sorted by name, never in enumeration order.
//!
//! # Examples
//!
//! ```no_run
//! use edgestream::io::glob::{list_shard_files, kron_shard_path};
//!
//! let shards = list_shard_files("graphs/twitter.shards")?;
//! let first = kron_shard_path("graphs/kron-20-16", 0); // graphs/kron-20-16/block-00.bin
//! # use anyhow::Error; Ok::<(), Error>(())
//! ```

use crate::error::{LoadError, Result};
use glob::{MatchOptions, Pattern, glob_with};
use std::io;
use std::path::{Path, PathBuf};

/// File name of shard `index` in a synthetic dataset directory.
#[must_use]
pub fn kron_shard_name(index: usize) -> String {
    format!("block-{index:02}.bin")
}

/// Path of shard `index` inside the synthetic dataset directory `dir`.
#[must_use]
pub fn kron_shard_path(dir: impl AsRef<Path>, index: usize) -> PathBuf {
    dir.as_ref().join(kron_shard_name(index))
}

/// Whether `dir` looks like a synthetic dataset (its first shard exists).
#[must_use]
pub fn has_kron_shards(dir: impl AsRef<Path>) -> bool {
    kron_shard_path(dir, 0).is_file()
}

/// All regular files directly inside `dir`, sorted lexicographically.
///
/// Hidden files (leading `.`) and subdirectories are skipped.
///
/// # Errors
/// [`LoadError::Io`] if `dir` is not a readable directory or a listing entry fails.
pub fn list_shard_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LoadError::io(
            dir,
            0,
            io::Error::new(io::ErrorKind::NotADirectory, "shard directory expected"),
        ));
    }
    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{escaped}/*");
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob_with(&pattern, options)
        .map_err(|e| LoadError::io(dir, 0, io::Error::new(io::ErrorKind::InvalidInput, e)))?;

    let mut shards = entries
        .map(|entry| entry.map_err(|e| LoadError::io(dir, 0, e.into_error())))
        .filter(|entry| match entry {
            Ok(path) => path.is_file(),
            Err(_) => true,
        })
        .collect::<Result<Vec<_>>>()?;
    shards.sort();
    Ok(shards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn shard_names_are_zero_padded() {
        assert_eq!(kron_shard_name(0), "block-00.bin");
        assert_eq!(kron_shard_name(7), "block-07.bin");
        assert_eq!(kron_shard_name(42), "block-42.bin");
        assert_eq!(kron_shard_name(123), "block-123.bin");
    }

    #[test]
    fn listing_is_sorted_and_files_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["c.bin", "a.bin", "b.bin", ".hidden"] {
            fs::write(dir.path().join(name), b"")?;
        }
        fs::create_dir(dir.path().join("nested"))?;

        let files = list_shard_files(dir.path())?;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.bin", "b.bin", "c.bin"]);
        Ok(())
    }

    #[test]
    fn listing_missing_dir_fails() {
        let err = list_shard_files("/definitely/not/here").unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Io);
    }
}
