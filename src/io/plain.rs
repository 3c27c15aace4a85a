//! Sequential reader over a single flat binary edge file.
//!
//! Counts are learned by observation: the source tracks the largest node id
//! and the number of edges it has handed out, and only reports them through
//! [`EdgeSource::stats`] once a pass has reached end of file. Rewinding starts
//! the observation over from zero.

use crate::edge::{Edge, RECORD_SIZE, decode_edge, read_full};
use crate::error::{LoadError, Result};
use crate::source::{EdgeSource, GraphStats};
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Streams the records of one `.bin` file in order.
pub struct PlainFileEdgeSource {
    path: PathBuf,
    reader: BufReader<File>,
    max_node: Option<u64>,
    edges: u64,
    exhausted: bool,
}

impl PlainFileEdgeSource {
    /// Open `path` for reading.
    ///
    /// # Errors
    /// [`LoadError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| LoadError::io(&path, 0, e))?;
        debug!(path = %path.display(), "edgestream.plain.open");
        Ok(Self {
            path,
            reader: BufReader::new(file),
            max_node: None,
            edges: 0,
            exhausted: false,
        })
    }

    /// The file being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counts observed so far in the current pass, complete or not.
    #[must_use]
    pub fn observed(&self) -> GraphStats {
        GraphStats::new(self.max_node.map_or(0, |m| m + 1), self.edges)
    }
}

impl EdgeSource for PlainFileEdgeSource {
    fn next_edge(&mut self) -> Result<Option<Edge>> {
        let mut record = [0u8; RECORD_SIZE];
        let n = read_full(&mut self.reader, &mut record)
            .map_err(|e| LoadError::io(&self.path, self.edges, e))?;
        if n == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        if n < RECORD_SIZE {
            let len = self.edges * RECORD_SIZE as u64 + n as u64;
            return Err(LoadError::partial_record(&self.path, len));
        }
        let edge = decode_edge(&record);
        self.max_node = Some(self.max_node.map_or(edge.max_node(), |m| m.max(edge.max_node())));
        self.edges += 1;
        Ok(Some(edge))
    }

    fn rewind(&mut self) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| LoadError::io(&self.path, self.edges, e))?;
        self.max_node = None;
        self.edges = 0;
        self.exhausted = false;
        Ok(())
    }

    fn stats(&self) -> Option<GraphStats> {
        self.exhausted.then(|| self.observed())
    }

    fn kind(&self) -> &'static str {
        "plain"
    }
}
