//! Directed edges and their fixed-width on-disk record.
//!
//! A record is two little-endian `u64` node identifiers, 16 bytes, no header
//! and no padding. The first stored field is the edge's **head** and the second
//! its **tail**, so a logical `(tail, head)` pair is stored reversed:
//!
//! ```
//! use edgestream::edge::{Edge, encode_edge, decode_edge};
//!
//! let bytes = encode_edge(Edge::new(9, 5)); // tail 9 -> head 5
//! assert_eq!(&bytes[..8], &5u64.to_le_bytes());
//! assert_eq!(&bytes[8..], &9u64.to_le_bytes());
//! assert_eq!(decode_edge(&bytes), Edge::new(9, 5));
//! ```
//!
//! Flipping this order flips the direction of every edge in the ingested
//! graph, so it is kept exactly as the existing datasets were written.

use crate::error::{LoadError, Result};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Node identifier as stored in edge records.
pub type NodeId = u64;

/// Size in bytes of one encoded edge record.
pub const RECORD_SIZE: usize = 16;

/// Default decode-window capacity, in records.
pub const BUFFER_SIZE: usize = 1 << 20;

/// Largest decode window a source accepts, in records (1 GiB of records).
pub const MAX_BUFFER_RECORDS: usize = 1 << 26;

/// A directed edge `tail -> head`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// Source node.
    pub tail: NodeId,
    /// Destination node.
    pub head: NodeId,
}

impl Edge {
    /// Create the edge `tail -> head`.
    #[must_use]
    pub const fn new(tail: NodeId, head: NodeId) -> Self {
        Self { tail, head }
    }

    /// Largest identifier touched by this edge.
    #[must_use]
    pub const fn max_node(&self) -> NodeId {
        if self.tail > self.head {
            self.tail
        } else {
            self.head
        }
    }
}

/// Encode one edge into its 16-byte record.
#[must_use]
pub fn encode_edge(edge: Edge) -> [u8; RECORD_SIZE] {
    let mut out = [0u8; RECORD_SIZE];
    out[..8].copy_from_slice(&edge.head.to_le_bytes());
    out[8..].copy_from_slice(&edge.tail.to_le_bytes());
    out
}

/// Decode one 16-byte record.
#[must_use]
pub fn decode_edge(record: &[u8; RECORD_SIZE]) -> Edge {
    let (first, second) = record.split_at(8);
    let mut head = [0u8; 8];
    let mut tail = [0u8; 8];
    head.copy_from_slice(first);
    tail.copy_from_slice(second);
    Edge {
        head: u64::from_le_bytes(head),
        tail: u64::from_le_bytes(tail),
    }
}

/// Decode a record-aligned byte run, appending to `out`.
///
/// `bytes.len()` must be a multiple of [`RECORD_SIZE`]; callers check alignment
/// first so they can report the offending file.
pub(crate) fn decode_records(bytes: &[u8], out: &mut Vec<Edge>) {
    debug_assert_eq!(bytes.len() % RECORD_SIZE, 0);
    out.reserve(bytes.len() / RECORD_SIZE);
    for chunk in bytes.chunks_exact(RECORD_SIZE) {
        let mut record = [0u8; RECORD_SIZE];
        record.copy_from_slice(chunk);
        out.push(decode_edge(&record));
    }
}

/// Byte size of a decode window holding `records` records (at least one).
///
/// Rejects windows above [`MAX_BUFFER_RECORDS`] before anything is allocated.
pub(crate) fn window_bytes(records: usize) -> Result<usize> {
    if records > MAX_BUFFER_RECORDS {
        return Err(LoadError::BufferTooLarge {
            records,
            max: MAX_BUFFER_RECORDS,
        });
    }
    Ok(records.max(1) * RECORD_SIZE)
}

/// Write edges as consecutive records.
///
/// # Errors
/// Returns any error reported by the writer.
pub fn write_edges<W: Write>(mut w: W, edges: &[Edge]) -> io::Result<usize> {
    for edge in edges {
        w.write_all(&encode_edge(*edge))?;
    }
    w.flush()?;
    Ok(edges.len())
}

/// Read into `buf` until it is full or the reader reports end of file.
///
/// Returns the number of bytes read; anything short of `buf.len()` means EOF.
pub(crate) fn read_full<R: io::Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
