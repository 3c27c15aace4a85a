//! The streaming contract every edge source implements.
//!
//! A loading loop drives a source purely through [`EdgeSource::next_edge`],
//! [`EdgeSource::rewind`] and [`EdgeSource::stats`]; it never needs to know
//! which strategy sits behind the trait object. Strategies live in
//! [`crate::io`].
//!
//! Sources are single-threaded: one caller at a time per instance. Parallel
//! loads construct one instance per worker.

use crate::edge::Edge;
use crate::error::{LoadError, Result};
use serde::{Deserialize, Serialize};

/// Node and edge counts reported by a source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes (`1 + max id` when observed, `2^n` when derived).
    pub nodes: u64,
    /// Number of edges this source delivers in one full pass.
    pub edges: u64,
}

impl GraphStats {
    /// Construct from raw counts.
    #[must_use]
    pub const fn new(nodes: u64, edges: u64) -> Self {
        Self { nodes, edges }
    }
}

/// Common interface of all edge-source strategies.
pub trait EdgeSource {
    /// Pull the next edge, or `Ok(None)` at the logical end of the stream.
    ///
    /// A malformed record is an error, never end-of-stream.
    ///
    /// # Errors
    /// Format and I/O failures; all of them are fatal for the current load.
    fn next_edge(&mut self) -> Result<Option<Edge>>;

    /// Reset to the first edge this instance owns and clear observed counters.
    ///
    /// # Errors
    /// I/O failures while repositioning.
    fn rewind(&mut self) -> Result<()>;

    /// Node and edge counts, or `None` when they are not known yet.
    fn stats(&self) -> Option<GraphStats>;

    /// Short strategy name for logs and reports.
    fn kind(&self) -> &'static str;

    /// Borrow the source as an iterator over its remaining edges.
    ///
    /// The iterator yields the first error it hits and then stops.
    fn edges(&mut self) -> Edges<'_, Self>
    where
        Self: Sized,
    {
        Edges {
            source: self,
            done: false,
        }
    }
}

impl<S: EdgeSource + ?Sized> EdgeSource for Box<S> {
    fn next_edge(&mut self) -> Result<Option<Edge>> {
        (**self).next_edge()
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }

    fn stats(&self) -> Option<GraphStats> {
        (**self).stats()
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

/// Iterator returned by [`EdgeSource::edges`].
pub struct Edges<'a, S: ?Sized> {
    source: &'a mut S,
    done: bool,
}

impl<S: EdgeSource + ?Sized> Iterator for Edges<'_, S> {
    type Item = std::result::Result<Edge, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.next_edge() {
            Ok(Some(edge)) => Some(Ok(edge)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
