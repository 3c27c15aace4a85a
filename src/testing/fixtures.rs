//! Small deterministic edge lists.

use crate::edge::Edge;
use crate::io::writer::scrambled_edges;

/// `n` edges forming the path `0 -> 1 -> ... -> n`.
///
/// ```
/// use edgestream::testing::chain_edges;
///
/// let edges = chain_edges(3);
/// assert_eq!(edges.last().map(|e| (e.tail, e.head)), Some((2, 3)));
/// ```
#[must_use]
pub fn chain_edges(n: u64) -> Vec<Edge> {
    (0..n).map(|i| Edge::new(i, i + 1)).collect()
}

/// Edges whose endpoints encode their own position: edge `i` is
/// `(i, i + offset)`. Handy for spotting dropped or repeated records.
#[must_use]
pub fn indexed_edges(count: u64, offset: u64) -> Vec<Edge> {
    (0..count).map(|i| Edge::new(i, i + offset)).collect()
}

/// The pseudo-random edges of a `kron-<exponent>-<multiplier>` dataset.
#[must_use]
pub fn kron_edges(exponent: u32, multiplier: u64, seed: u64) -> Vec<Edge> {
    scrambled_edges(exponent, multiplier, seed).collect()
}
