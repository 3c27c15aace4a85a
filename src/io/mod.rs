//! Edge-source strategies and the file plumbing beneath them.
//!
//! - [`plain`]: one flat `.bin` file, read sequentially
//! - [`sharded`]: a directory of shard files, read forward across shard boundaries
//! - [`kron`]: a synthetic dataset with random access and slice binding
//! - [`descriptor`], [`window`], [`glob`]: naming, seek arithmetic and shard discovery
//! - [`writer`]: producing inputs in the same record format

pub mod descriptor;
pub mod glob;
pub mod kron;
pub mod plain;
pub mod sharded;
pub mod window;
pub mod writer;
