//! Error type shared by every edge source.
//!
//! All variants are fatal for the load that produced them: the sources never
//! retry or skip. [`LoadError::category`] tells configuration mistakes apart
//! from bad input data and from operating-system failures.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias for the edge-source layer.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Broad classification of a [`LoadError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad partition request or unusable input selection; detected before any I/O.
    Config,
    /// Input bytes or names that do not follow the on-disk format.
    Format,
    /// Open, read or seek failure reported by the operating system.
    Io,
}

/// Fatal condition raised while configuring or streaming an edge source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The edge total is not a multiple of the requested part count.
    #[error("cannot split {total} edges into {parts} equal parts")]
    UnevenSplit {
        /// Total number of edges in the dataset.
        total: u64,
        /// Requested number of parts.
        parts: u64,
    },
    /// The 1-based part index is outside `1..=parts`.
    #[error("part index {part} out of bounds (expected 1..={parts})")]
    PartOutOfBounds {
        /// Requested part.
        part: u64,
        /// Number of parts.
        parts: u64,
    },
    /// A slice that reaches past the end of the dataset.
    #[error("slice [{begin}, {begin}+{length}) exceeds {total} edges")]
    SliceOutOfRange {
        /// First index of the slice.
        begin: u64,
        /// Slice length.
        length: u64,
        /// Dataset edge total.
        total: u64,
    },
    /// A decode window larger than [`MAX_BUFFER_RECORDS`](crate::edge::MAX_BUFFER_RECORDS).
    #[error("buffer of {records} records exceeds the limit of {max}")]
    BufferTooLarge {
        /// Requested window size in records.
        records: usize,
        /// Largest accepted window size.
        max: usize,
    },
    /// A partial load was requested for an input that only streams forward.
    #[error("partial loads are not supported for {}", path.display())]
    PartitionUnsupported {
        /// Input path.
        path: PathBuf,
    },
    /// No edge source accepts the given path.
    #[error("no edge source accepts {}", path.display())]
    UnknownInput {
        /// Input path.
        path: PathBuf,
    },
    /// The file ends in the middle of a 16-byte record.
    #[error("{}: trailing partial record ({len} bytes is not a multiple of 16)", path.display())]
    PartialRecord {
        /// File holding the truncated record.
        path: PathBuf,
        /// Byte count that failed the alignment check.
        len: u64,
    },
    /// A synthetic dataset directory whose name does not encode `(n, m)`.
    #[error(
        "{}: dataset name does not encode a node exponent and edge multiplier",
        path.display()
    )]
    DatasetName {
        /// Dataset directory.
        path: PathBuf,
    },
    /// Shard sizes or derived counts that contradict the dataset descriptor.
    #[error("{}: {reason}", path.display())]
    Layout {
        /// File or directory at fault.
        path: PathBuf,
        /// What was inconsistent.
        reason: String,
    },
    /// Operating-system failure while opening, reading or seeking.
    #[error("I/O error on {} after {delivered} edges: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Edges successfully delivered by this source before the failure.
        delivered: u64,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// Which part of the taxonomy this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnevenSplit { .. }
            | Self::PartOutOfBounds { .. }
            | Self::SliceOutOfRange { .. }
            | Self::BufferTooLarge { .. }
            | Self::PartitionUnsupported { .. }
            | Self::UnknownInput { .. } => ErrorCategory::Config,
            Self::PartialRecord { .. } | Self::DatasetName { .. } | Self::Layout { .. } => {
                ErrorCategory::Format
            }
            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, delivered: u64, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            delivered,
            source,
        }
    }

    pub(crate) fn layout(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Layout {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn partial_record(path: impl AsRef<Path>, len: u64) -> Self {
        Self::PartialRecord {
            path: path.as_ref().to_path_buf(),
            len,
        }
    }
}
