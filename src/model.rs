use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::parser::helpers::make_unique;

// ────────────────────────────────────────────────────────────────────────────
// NumericTable
// ────────────────────────────────────────────────────────────────────────────

/// Columnar table of `f64` values parsed from a state log.
///
/// Column names are unique (case-insensitively) and keep header order. Every
/// column holds exactly `row_count` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericTable {
    columns: IndexMap<String, Vec<f64>>,
    row_count: usize,
}

impl NumericTable {
    /// Build a table from header names and row-major values.
    ///
    /// Names are disambiguated the same way the state-log parser does it. Rows
    /// whose length differs from the number of names are dropped.
    pub fn from_rows(names: &[String], rows: impl IntoIterator<Item = Vec<f64>>) -> Self {
        let names = make_unique(names);
        let mut columns: IndexMap<String, Vec<f64>> =
            names.into_iter().map(|n| (n, Vec::new())).collect();
        let width = columns.len();
        let mut row_count = 0;
        for row in rows {
            if row.len() != width {
                continue;
            }
            for (col, v) in columns.values_mut().zip(row) {
                col.push(v);
            }
            row_count += 1;
        }
        Self { columns, row_count }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Values of the column with exactly this name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_at(&self, index: usize) -> Option<(&str, &[f64])> {
        self.columns
            .get_index(index)
            .map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Position of the column with exactly this name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// First column whose name equals `name` ignoring ASCII case.
    pub fn find_ignore_case(&self, name: &str) -> Option<&str> {
        self.column_names().find(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// State log derived data
// ────────────────────────────────────────────────────────────────────────────

/// Preferred names for the fixed columns of a state log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub iteration: String,
    pub error: String,
    pub temperature: String,
    /// Literal header cell closing the state-log variable block and opening the
    /// char-log error columns.
    pub sentinel: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            iteration: "Neval".to_string(),
            error: "ERR0".to_string(),
            temperature: "T".to_string(),
            sentinel: "|".to_string(),
        }
    }
}

/// Resolved names of the iteration, error and temperature columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreColumns {
    pub iteration: String,
    pub error: String,
    /// Absent when the log carries no temperature column.
    pub temperature: Option<String>,
}

/// Volatility statistics of one variable column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableStat {
    pub name: String,
    pub first: f64,
    pub last: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// `100 * range / max(|first|, 1e-12)`
    pub delta_pct: f64,
    /// 1 = most volatile.
    pub rank: usize,
}

/// One line of a top/worst rank table. `delta` is a fraction, not a percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankTableRow {
    pub rank: usize,
    pub name: String,
    pub first: f64,
    pub last: f64,
    pub min: f64,
    pub max: f64,
    pub delta: f64,
}

impl From<&VariableStat> for RankTableRow {
    fn from(s: &VariableStat) -> Self {
        Self {
            rank: s.rank,
            name: s.name.clone(),
            first: s.first,
            last: s.last,
            min: s.min,
            max: s.max,
            delta: s.delta_pct / 100.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Char log data
// ────────────────────────────────────────────────────────────────────────────

/// A char-log column holding one error component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrColumn {
    /// Cell position in the header (and in every data row).
    pub index: usize,
    /// Header text after trimming whitespace and quotes.
    pub header: String,
    /// Component name derived from the header.
    pub key: String,
}

/// A distinct optimizer solution found in a char log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionEntry {
    pub number: u32,
    pub token: String,
    /// Line index (0 = header) of the row this solution was taken from.
    pub row_index: usize,
}

/// Which row wins when several rows carry the same solution number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    #[default]
    LastWins,
    FirstWins,
}

/// One error component of a selected solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRow {
    /// 1-based position in the top-N slice; 0 until [`crate::ranking::apply_top_n`] runs.
    pub rank: usize,
    pub name: String,
    pub value: f64,
    /// Fraction of the total over all components of the row.
    pub share: f64,
}
