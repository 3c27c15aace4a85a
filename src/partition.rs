//! Splitting a dataset's edge ordering into equal contiguous slices.
//!
//! Parallel loads assign one [`EdgeSlice`] to each worker. The slices of a
//! valid request are disjoint, ordered, and cover `[0, total)` exactly; the
//! arithmetic here is the only thing keeping workers from dropping or
//! duplicating edges, so it refuses any request that does not divide evenly.

use crate::error::{LoadError, Result};
use serde::{Deserialize, Serialize};

/// A contiguous range `[begin, begin + length)` of logical edge indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeSlice {
    /// First logical edge index.
    pub begin: u64,
    /// Number of edges.
    pub length: u64,
}

impl EdgeSlice {
    /// The slice covering an entire dataset of `total` edges.
    #[must_use]
    pub const fn whole(total: u64) -> Self {
        Self {
            begin: 0,
            length: total,
        }
    }

    /// One past the last index.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.begin + self.length
    }

    /// Whether `index` falls inside the slice.
    #[must_use]
    pub const fn contains(&self, index: u64) -> bool {
        index >= self.begin && index < self.end()
    }
}

/// Compute the slice owned by `part_index` (1-based) out of `num_parts`.
///
/// `num_parts == 0` means no partitioning: the whole dataset is returned and
/// `part_index` is ignored.
///
/// # Errors
/// [`LoadError::UnevenSplit`] when `total_edges` is not a multiple of
/// `num_parts`, [`LoadError::PartOutOfBounds`] when `part_index` is outside
/// `1..=num_parts`.
pub fn plan_slice(total_edges: u64, num_parts: u64, part_index: u64) -> Result<EdgeSlice> {
    if num_parts == 0 {
        return Ok(EdgeSlice::whole(total_edges));
    }
    if total_edges % num_parts != 0 {
        return Err(LoadError::UnevenSplit {
            total: total_edges,
            parts: num_parts,
        });
    }
    if part_index < 1 || part_index > num_parts {
        return Err(LoadError::PartOutOfBounds {
            part: part_index,
            parts: num_parts,
        });
    }
    let length = total_edges / num_parts;
    Ok(EdgeSlice {
        begin: (part_index - 1) * length,
        length,
    })
}

/// Every slice of a `num_parts`-way split, in part order.
///
/// # Errors
/// Same conditions as [`plan_slice`].
pub fn plan_all(total_edges: u64, num_parts: u64) -> Result<Vec<EdgeSlice>> {
    if num_parts == 0 {
        return Ok(vec![EdgeSlice::whole(total_edges)]);
    }
    (1..=num_parts)
        .map(|part| plan_slice(total_edges, num_parts, part))
        .collect()
}
