//! # Edgestream
//!
//! An **ingestion front-end** for graph builders: it turns persisted edge lists
//! into a sequential stream of directed edges that a storage engine consumes.
//!
//! ## Key Features
//!
//! - **One streaming contract** - every input is an [`EdgeSource`] with
//!   `next_edge` / `rewind` / `stats`
//! - **Flat files** - a single headerless `.bin` file of 16-byte records
//! - **Sharded directories** - many shard files read as one stream, crossing
//!   shard boundaries transparently
//! - **Synthetic datasets** - `kron-<n>-<m>` directories sized from their name,
//!   with random-access seek and slice binding for partial loads
//! - **Exact partitioning** - equal contiguous slices for parallel workers
//! - **Fail fast** - malformed data and I/O failures are typed errors, never
//!   silently skipped records
//!
//! ## Quick Start
//!
//! ```no_run
//! use edgestream::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = LoaderConfig::partial(4, 2);
//! let mut source = open_source("graphs/kron-20-16", &config)?;
//! let mut sink = CountingSink::default();
//! let report = Loader::new(config).load(&mut source, &mut sink)?;
//! assert_eq!(report.edges, (1 << 20) * 16 / 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Record Format
//!
//! Each edge is two little-endian `u64`s. The first stored field is the
//! **head**, the second the **tail** (see [`edge`]). Files have no header; a
//! length that is not a multiple of 16 is a [`LoadError::PartialRecord`].
//!
//! ## Errors
//!
//! Sources return [`LoadError`]; [`LoadError::category`] splits it into
//! configuration, format and I/O failures. None of them are recoverable for
//! the load in progress. The loading loop and helpers above the sources use
//! `anyhow` and add context.
//!
//! ## Feature Flags
//!
//! - `parallel-load` - Enable [`parallel::load_parts_par`] (rayon)
//!
//! ## Module Overview
//!
//! - [`edge`] - Edge type and record codec
//! - [`source`] - The [`EdgeSource`] trait
//! - [`io`] - Concrete sources, seek arithmetic, shard discovery and writers
//! - [`partition`] - Slice planning for partial loads
//! - [`dispatch`] - Choosing a source for a path
//! - [`loader`] - The loading loop and sinks
//! - [`config`] - Loader configuration
//! - [`testing`] - Helpers for tests

pub mod config;
pub mod dispatch;
pub mod edge;
pub mod error;
pub mod io;
pub mod loader;
pub mod partition;
pub mod source;
pub mod testing;

#[cfg_attr(docsrs, doc(cfg(feature = "parallel-load")))]
#[cfg(feature = "parallel-load")]
pub mod parallel;

// General re-exports
pub use config::LoaderConfig;
pub use dispatch::{InputKind, detect, open_source};
pub use edge::{BUFFER_SIZE, Edge, MAX_BUFFER_RECORDS, NodeId, RECORD_SIZE};
pub use error::{ErrorCategory, LoadError};
pub use io::descriptor::KronDescriptor;
pub use io::kron::PartitionedSyntheticEdgeSource;
pub use io::plain::PlainFileEdgeSource;
pub use io::sharded::ShardedDirectoryEdgeSource;
pub use loader::{CountingSink, EdgeSink, LoadReport, Loader, VecSink};
pub use partition::{EdgeSlice, plan_all, plan_slice};
pub use source::{EdgeSource, GraphStats};

// Gated re-exports
#[cfg(feature = "parallel-load")]
pub use parallel::{PartResult, load_parts_par};
