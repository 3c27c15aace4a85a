//! Test helpers for code that consumes edge sources.
//!
//! - **Mock I/O**: temporary files and directories holding edge records,
//!   plus [`MemShardStore`], an in-memory [`ShardStore`](crate::io::window::ShardStore)
//!   that counts its reads
//! - **Fixtures**: small deterministic edge lists and datasets
//!
//! # Quick Start
//!
//! ```
//! use edgestream::source::EdgeSource;
//! use edgestream::io::plain::PlainFileEdgeSource;
//! use edgestream::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let edges = chain_edges(5);
//! let file = mock_edge_file(&edges)?;
//! let mut src = PlainFileEdgeSource::open(file.path())?;
//! assert_eq!(collect_edges(&mut src)?, edges);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod mock_io;

pub use fixtures::*;
pub use mock_io::*;
