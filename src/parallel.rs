//! Loading one synthetic dataset with many workers.
//!
//! Each part of an `n`-way split gets its own [`PartitionedSyntheticEdgeSource`]
//! (own file handles, own buffer) and its own sink. Slices are disjoint and
//! the files are only read, so workers share nothing and need no locking.
//! Results come back in part order regardless of completion order.
//!
//! # Feature
//! Requires the `parallel-load` feature.

use crate::config::LoaderConfig;
use crate::io::descriptor::KronDescriptor;
use crate::io::kron::PartitionedSyntheticEdgeSource;
use crate::loader::{EdgeSink, LoadReport, Loader};
use crate::partition::plan_all;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// Output of one worker.
#[derive(Debug)]
pub struct PartResult<K> {
    /// 1-based part index.
    pub part: u64,
    /// The worker's sink after loading.
    pub sink: K,
    /// The worker's report.
    pub report: LoadReport,
}

/// Load all `num_parts` parts of the dataset at `dir` concurrently.
///
/// `make_sink` is called once per part with the 1-based part index.
/// `threads` defaults to `num_cpus::get()`. The partition request is
/// validated against the dataset size before any worker starts.
///
/// # Errors
/// Returns the first failure: a bad dataset name or partition request, or
/// any worker's source/sink error. A failure in one part fails the whole load.
pub fn load_parts_par<K, F>(
    dir: impl AsRef<Path>,
    num_parts: u64,
    threads: Option<usize>,
    config: &LoaderConfig,
    make_sink: F,
) -> Result<Vec<PartResult<K>>>
where
    K: EdgeSink + Send,
    F: Fn(u64) -> K + Sync,
{
    let dir = dir.as_ref();
    let descriptor = KronDescriptor::parse(dir)?;
    let slices = plan_all(descriptor.total_edges, num_parts.max(1))?;
    let threads = threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("build loader thread pool")?;
    info!(
        dataset = %dir.display(),
        parts = slices.len(),
        threads,
        "edgestream.parallel.start"
    );

    let parts = slices.len() as u64;
    pool.install(|| {
        (1..=parts)
            .into_par_iter()
            .map(|part| -> Result<PartResult<K>> {
                let part_config = LoaderConfig {
                    partial_load_num_parts: parts,
                    partial_load_part: part,
                    ..config.clone()
                };
                let mut source = PartitionedSyntheticEdgeSource::from_config(dir, &part_config)
                    .with_context(|| format!("open part {part}/{parts} of {}", dir.display()))?;
                let mut sink = make_sink(part);
                let report = Loader::new(part_config)
                    .load(&mut source, &mut sink)
                    .with_context(|| format!("load part {part}/{parts} of {}", dir.display()))?;
                Ok(PartResult { part, sink, report })
            })
            .collect()
    })
}
