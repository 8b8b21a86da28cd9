//! Viewer settings: top-N defaults and bounds, read retry budget, column names
//! and the solution de-duplication policy.
//!
//! Settings are read from a JSON file; every field is optional and falls back
//! to its default.

use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::model::{ColumnNames, DedupPolicy};
use crate::parser::RetryPolicy;

/// Accepted top-N values for the variable view.
pub const STATE_TOP_N: RangeInclusive<usize> = 1..=200;
/// Accepted top-N values for the error-component view.
pub const CHAR_TOP_N: RangeInclusive<usize> = 1..=9999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub state_top_n: usize,
    pub char_top_n: usize,
    pub retry: RetryPolicy,
    pub columns: ColumnNames,
    pub dedup: DedupPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            state_top_n: 10,
            char_top_n: 100,
            retry: RetryPolicy::default(),
            columns: ColumnNames::default(),
            dedup: DedupPolicy::default(),
        }
    }
}

impl ViewerConfig {
    /// Load settings from a JSON file. Top-N values are clamped into range.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        let cfg: ViewerConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON {}", path))?;
        Ok(cfg.clamped())
    }

    pub fn clamped(mut self) -> Self {
        self.state_top_n = clamp_state_top_n(self.state_top_n);
        self.char_top_n = clamp_char_top_n(self.char_top_n);
        self
    }
}

pub fn clamp_state_top_n(n: usize) -> usize {
    n.clamp(*STATE_TOP_N.start(), *STATE_TOP_N.end())
}

pub fn clamp_char_top_n(n: usize) -> usize {
    n.clamp(*CHAR_TOP_N.start(), *CHAR_TOP_N.end())
}
