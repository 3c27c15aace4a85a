//! Loader configuration.
//!
//! Read once when a source is constructed and never mutated by the sources.
//!
//! ```
//! use edgestream::config::LoaderConfig;
//!
//! let cfg: LoaderConfig = serde_json::from_str(
//!     r#"{ "partial_load_num_parts": 4, "partial_load_part": 2 }"#,
//! )?;
//! assert_eq!(cfg.partition_request(), Some((4, 2)));
//! assert_eq!(cfg.buffer_records(), edgestream::edge::BUFFER_SIZE);
//! # Ok::<(), serde_json::Error>(())
//! ```

use crate::edge::BUFFER_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Settings consumed by the dispatcher, the sources and the loading loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Number of equal parts to split the dataset into; 0 disables partial loads.
    pub partial_load_num_parts: u64,
    /// 1-based part to load; only meaningful when `partial_load_num_parts > 0`.
    pub partial_load_part: u64,
    /// Records decoded per buffer refill; sources refuse more than
    /// [`MAX_BUFFER_RECORDS`](crate::edge::MAX_BUFFER_RECORDS).
    pub buffer_records: usize,
    /// Run a counting pass first when a source cannot report its size up front.
    pub two_pass: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            partial_load_num_parts: 0,
            partial_load_part: 0,
            buffer_records: BUFFER_SIZE,
            two_pass: true,
        }
    }
}

impl LoaderConfig {
    /// Configuration that loads part `part` of `num_parts`.
    #[must_use]
    pub fn partial(num_parts: u64, part: u64) -> Self {
        Self {
            partial_load_num_parts: num_parts,
            partial_load_part: part,
            ..Self::default()
        }
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not valid JSON for
    /// this structure.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let cfg = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse loader config {}", path.display()))?;
        Ok(cfg)
    }

    /// `(num_parts, part)` when a partial load is requested.
    #[must_use]
    pub const fn partition_request(&self) -> Option<(u64, u64)> {
        if self.partial_load_num_parts == 0 {
            None
        } else {
            Some((self.partial_load_num_parts, self.partial_load_part))
        }
    }

    /// Refill size in records, never below one.
    #[must_use]
    pub fn buffer_records(&self) -> usize {
        self.buffer_records.max(1)
    }
}
