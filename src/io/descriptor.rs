//! Dataset descriptors for synthetic (Kronecker) edge spaces.
//!
//! The dataset directory's name carries two integers: the node-count exponent
//! `n` and the edge multiplier `m` (e.g. `kron-20-16`, `kron_s20_e16`). The
//! dataset then holds exactly `2^n` nodes and `2^n * m` edges, known without
//! touching any shard file.

use crate::error::{LoadError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^0-9]*([0-9]+)[^0-9]+([0-9]+)[^0-9]*$").expect("descriptor pattern is valid")
});

/// Analytically sized dataset parsed from its directory name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KronDescriptor {
    /// Dataset directory.
    pub path: PathBuf,
    /// Node-count exponent `n`.
    pub exponent: u32,
    /// Edges per node `m`.
    pub multiplier: u64,
    /// `2^n`.
    pub total_nodes: u64,
    /// `2^n * m`.
    pub total_edges: u64,
}

impl KronDescriptor {
    /// Parse the descriptor from the last component of `path`.
    ///
    /// # Errors
    /// [`LoadError::DatasetName`] when the name does not hold exactly two
    /// integers, [`LoadError::Layout`] when either integer or the derived
    /// counts overflow `u64`.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bad_name = || LoadError::DatasetName {
            path: path.to_path_buf(),
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(bad_name)?;
        let caps = NAME.captures(name).ok_or_else(bad_name)?;
        let nodes_overflow =
            || LoadError::layout(path, format!("node exponent {} overflows u64", &caps[1]));
        let edges_overflow = || {
            LoadError::layout(path, format!("2^{} * {} edges overflows u64", &caps[1], &caps[2]))
        };

        // Both fields are all digits, so a failed parse can only mean overflow.
        let exponent = caps[1]
            .parse::<u64>()
            .ok()
            .and_then(|e| u32::try_from(e).ok())
            .filter(|e| *e < u64::BITS)
            .ok_or_else(nodes_overflow)?;
        let multiplier = caps[2].parse::<u64>().map_err(|_| edges_overflow())?;
        let total_nodes = 1u64 << exponent;
        let total_edges = total_nodes.checked_mul(multiplier).ok_or_else(edges_overflow)?;

        Ok(Self {
            path: path.to_path_buf(),
            exponent,
            multiplier,
            total_nodes,
            total_edges,
        })
    }

    /// Whether `path`'s name parses as a descriptor.
    #[must_use]
    pub fn matches(path: impl AsRef<Path>) -> bool {
        Self::parse(path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn exponent_three_multiplier_four() {
        let d = KronDescriptor::parse("/data/kron-3-4").unwrap();
        assert_eq!(d.exponent, 3);
        assert_eq!(d.multiplier, 4);
        assert_eq!(d.total_nodes, 8);
        assert_eq!(d.total_edges, 32);
    }

    #[test]
    fn accepts_prefixed_fields_and_trailing_slash() {
        let d = KronDescriptor::parse("datasets/kron_s20_e16/").unwrap();
        assert_eq!(d.total_nodes, 1 << 20);
        assert_eq!(d.total_edges, (1 << 20) * 16);
    }

    #[test]
    fn rejects_wrong_integer_count() {
        for name in ["kron", "kron-20", "kron-1-2-3", ""] {
            let err = KronDescriptor::parse(name).unwrap_err();
            assert!(matches!(err, LoadError::DatasetName { .. }), "{name}");
            assert_eq!(err.category(), ErrorCategory::Format);
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            KronDescriptor::parse("kron-64-1"),
            Err(LoadError::Layout { .. })
        ));
        assert!(matches!(
            KronDescriptor::parse("kron-63-4"),
            Err(LoadError::Layout { .. })
        ));
        assert_eq!(KronDescriptor::parse("kron-63-1").unwrap().total_edges, 1 << 63);
    }

    #[test]
    fn huge_fields_are_overflow_not_bad_names() {
        for name in [
            "kron-99999999999-1",
            "kron-4294967296-1",
            "kron-99999999999999999999999-1",
            "kron-3-99999999999999999999999",
        ] {
            let err = KronDescriptor::parse(name).unwrap_err();
            assert!(matches!(err, LoadError::Layout { .. }), "{name}: {err}");
        }
    }
}
