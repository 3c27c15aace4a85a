//! The loading loop that feeds an edge stream into a graph builder.
//!
//! A destination implements [`EdgeSink`]; whether it materializes a read-only
//! level or appends to a mutable graph makes no difference to the loop.
//! [`Loader::load`] asks the source for its size, runs a counting pass when
//! the source can only learn it by scanning, rewinds, reserves capacity in the
//! sink and then streams every edge.
//!
//! # Example
//!
//! ```no_run
//! use edgestream::io::plain::PlainFileEdgeSource;
//! use edgestream::loader::{Loader, VecSink};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut src = PlainFileEdgeSource::open("graph.bin")?;
//! let mut sink = VecSink::default();
//! let report = Loader::default().load(&mut src, &mut sink)?;
//! println!("{} edges, {:?} nodes", report.edges, report.nodes);
//! report.save_to_file("load-report.json")?;
//! # Ok(())
//! # }
//! ```

use crate::config::LoaderConfig;
use crate::edge::Edge;
use crate::source::{EdgeSource, GraphStats};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Destination of a load.
pub trait EdgeSink {
    /// Called once before streaming when the edge and node counts are known.
    ///
    /// # Errors
    /// Allocation or setup failures in the destination.
    fn reserve(&mut self, _stats: GraphStats) -> Result<()> {
        Ok(())
    }

    /// Accept one edge.
    ///
    /// # Errors
    /// Any destination failure; the load stops immediately.
    fn push(&mut self, edge: Edge) -> Result<()>;

    /// Called after the last edge of the streaming pass.
    ///
    /// # Errors
    /// Destination failures while sealing the result.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Collects edges in memory.
#[derive(Clone, Debug, Default)]
pub struct VecSink {
    /// Edges in arrival order.
    pub edges: Vec<Edge>,
    /// Counts passed to [`EdgeSink::reserve`], if it was called.
    pub reserved: Option<GraphStats>,
}

impl EdgeSink for VecSink {
    fn reserve(&mut self, stats: GraphStats) -> Result<()> {
        self.edges
            .reserve(usize::try_from(stats.edges).context("edge count exceeds address space")?);
        self.reserved = Some(stats);
        Ok(())
    }

    fn push(&mut self, edge: Edge) -> Result<()> {
        self.edges.push(edge);
        Ok(())
    }
}

/// Tracks counts only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountingSink {
    /// Edges received.
    pub edges: u64,
    /// Largest node id received.
    pub max_node: Option<u64>,
}

impl CountingSink {
    /// Counts observed so far (`1 + max id` nodes).
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats::new(self.max_node.map_or(0, |m| m + 1), self.edges)
    }
}

impl EdgeSink for CountingSink {
    fn push(&mut self, edge: Edge) -> Result<()> {
        self.edges += 1;
        self.max_node = Some(self.max_node.map_or(edge.max_node(), |m| m.max(edge.max_node())));
        Ok(())
    }
}

/// Summary of one completed load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Strategy that produced the edges.
    pub source: String,
    /// Node count known at the end of the load, if any.
    pub nodes: Option<u64>,
    /// Edges delivered to the sink.
    pub edges: u64,
    /// Passes over the input (2 when a counting pass ran).
    pub passes: u32,
    /// Wall-clock time of the whole load.
    pub elapsed_ms: u64,
}

impl LoadReport {
    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)
            .with_context(|| format!("serialize load report to {}", path.display()))?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }
}

/// Drives sources into sinks.
#[derive(Clone, Debug, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Loader using `config` (only `two_pass` is consulted here).
    #[must_use]
    pub const fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Stream every edge of `source` into `sink`.
    ///
    /// # Errors
    /// Any source error (config, format or I/O) or sink error. Both abort the
    /// load; the sink may hold a partial result and must be discarded.
    pub fn load<S, K>(&self, source: &mut S, sink: &mut K) -> Result<LoadReport>
    where
        S: EdgeSource + ?Sized,
        K: EdgeSink + ?Sized,
    {
        let started = Instant::now();
        let mut passes = 0;

        let known = match source.stats() {
            Some(stats) => Some(stats),
            None if self.config.two_pass => {
                let mut counter = CountingSink::default();
                drain(source, &mut counter)?;
                passes += 1;
                let stats = source.stats().unwrap_or_else(|| counter.stats());
                debug!(
                    source = source.kind(),
                    nodes = stats.nodes,
                    edges = stats.edges,
                    "edgestream.load.counting_pass"
                );
                source.rewind().context("rewind after counting pass")?;
                Some(stats)
            }
            None => None,
        };

        if let Some(stats) = known {
            sink.reserve(stats).context("reserve sink capacity")?;
        }
        let edges = drain(source, sink)?;
        passes += 1;
        sink.finish().context("finish sink")?;

        let nodes = source.stats().or(known).map(|s| s.nodes);
        let report = LoadReport {
            source: source.kind().to_string(),
            nodes,
            edges,
            passes,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            source = %report.source,
            edges = report.edges,
            nodes = ?report.nodes,
            passes = report.passes,
            elapsed_ms = report.elapsed_ms,
            "edgestream.load.completed"
        );
        Ok(report)
    }
}

fn drain<S, K>(source: &mut S, sink: &mut K) -> Result<u64>
where
    S: EdgeSource + ?Sized,
    K: EdgeSink + ?Sized,
{
    let mut n = 0u64;
    while let Some(edge) = source.next_edge()? {
        sink.push(edge)
            .with_context(|| format!("sink rejected edge #{n}"))?;
        n += 1;
    }
    Ok(n)
}
