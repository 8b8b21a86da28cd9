//! Char-log parsing: error-component columns and the solution catalog.
//!
//! Header layout: fixed metadata cells, a literal `|` cell, then one cell per
//! error component written either as `(<key>)` (optionally followed by `*...`)
//! or `ERR_<key>`. Data rows carry a `solution<letters>+<N>.txt` token somewhere
//! among their cells.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use camino::Utf8Path;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use super::helpers::{infer_char_delimiter, normalize_cell};
use super::source::{ContentSource, FsSource, RetryPolicy, read_lines_shared, split_lines};
use crate::error::{FormatError, Result};
use crate::model::{ComponentRow, DedupPolicy, ErrColumn, SolutionEntry};
use crate::ranking::rank_error_components;

/// Default header cell separating metadata columns from error columns.
pub const SENTINEL: &str = "|";

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([^)]+)\)(?:\*.*)?$").expect("valid key regex"));
static SOLUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^solution[a-z]*\+(\d+)\.txt$").expect("valid solution regex")
});

/// A parsed char log. Keeps its lines so solution rows can be re-read on demand.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CharLog {
    #[serde(skip)]
    lines: Vec<String>,
    delimiter: char,
    /// Index of the last sentinel header cell.
    sentinel_index: Option<usize>,
    err_columns: Vec<ErrColumn>,
    solutions: Vec<SolutionEntry>,
}

impl CharLog {
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn sentinel_index(&self) -> Option<usize> {
        self.sentinel_index
    }

    pub fn err_columns(&self) -> &[ErrColumn] {
        &self.err_columns
    }

    /// Distinct solutions, ascending by number.
    pub fn solutions(&self) -> &[SolutionEntry] {
        &self.solutions
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Catalog position of the solution numbered `number`.
    pub fn position_of(&self, number: u32) -> Option<usize> {
        self.solutions.iter().position(|s| s.number == number)
    }

    /// Initially selected catalog position: the highest-numbered solution.
    pub fn default_selection(&self) -> Option<usize> {
        self.solutions.len().checked_sub(1)
    }

    pub fn previous(&self, pos: usize) -> Option<usize> {
        pos.checked_sub(1).filter(|p| *p < self.solutions.len())
    }

    pub fn next(&self, pos: usize) -> Option<usize> {
        Some(pos + 1).filter(|p| *p < self.solutions.len())
    }

    /// Ranked error components of `solution`'s origin row.
    ///
    /// A row index pointing at the header, past the end, or at a blank line
    /// yields no rows.
    pub fn component_rows(&self, solution: &SolutionEntry) -> Vec<ComponentRow> {
        match self.line(solution.row_index) {
            Some(line) if solution.row_index > 0 && !line.trim().is_empty() => {
                rank_error_components(line, self.delimiter, &self.err_columns)
            }
            _ => Vec::new(),
        }
    }
}

/// Parse the char log at `path` from the filesystem with default settings.
pub fn parse_char_log(path: impl AsRef<Utf8Path>) -> Result<CharLog> {
    parse_char_log_with(
        &mut FsSource,
        path.as_ref(),
        RetryPolicy::default(),
        DedupPolicy::default(),
        SENTINEL,
    )
}

/// Parse a char log read through `source`, with error columns to the right of
/// the last `sentinel` header cell.
pub fn parse_char_log_with<S: ContentSource + ?Sized>(
    source: &mut S,
    path: &Utf8Path,
    retry: RetryPolicy,
    dedup: DedupPolicy,
    sentinel: &str,
) -> Result<CharLog> {
    let lines = read_lines_shared(source, path, retry)?;
    let log = char_log_from_lines(lines, dedup, sentinel)?;
    info!(
        path = %path,
        err_columns = log.err_columns.len(),
        solutions = log.solutions.len(),
        "loaded char log"
    );
    Ok(log)
}

/// Parse char-log text already held in memory, using the default `|` sentinel.
pub fn parse_char_log_from_text(text: &str, dedup: DedupPolicy) -> Result<CharLog> {
    parse_char_log_from_text_with(text, dedup, SENTINEL)
}

pub fn parse_char_log_from_text_with(
    text: &str,
    dedup: DedupPolicy,
    sentinel: &str,
) -> Result<CharLog> {
    Ok(char_log_from_lines(split_lines(text), dedup, sentinel)?)
}

fn char_log_from_lines(
    lines: Vec<String>,
    dedup: DedupPolicy,
    sentinel: &str,
) -> Result<CharLog, FormatError> {
    let Some(header) = lines.first() else {
        return Ok(CharLog {
            delimiter: '\t',
            ..CharLog::default()
        });
    };
    let delimiter = infer_char_delimiter(header);
    let headers: Vec<&str> = header.split(delimiter).map(normalize_cell).collect();

    let sentinel_index = headers
        .iter()
        .rposition(|h| *h == sentinel)
        .ok_or_else(|| FormatError::MissingSeparator {
            sentinel: sentinel.to_string(),
        })?;

    let err_columns: Vec<ErrColumn> = headers
        .iter()
        .enumerate()
        .skip(sentinel_index + 1)
        .filter_map(|(index, h)| {
            extract_err_key(h).map(|key| ErrColumn {
                index,
                header: h.to_string(),
                key,
            })
        })
        .collect();
    if err_columns.is_empty() {
        return Err(FormatError::NoErrColumns);
    }

    let mut by_number: BTreeMap<u32, SolutionEntry> = BTreeMap::new();
    for (row_index, line) in lines.iter().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(delimiter).collect();
        let Some(token) = find_solution_token(&cells) else {
            continue;
        };
        let Some(number) = solution_number(token) else {
            continue;
        };
        if dedup == DedupPolicy::FirstWins && by_number.contains_key(&number) {
            continue;
        }
        by_number.insert(
            number,
            SolutionEntry {
                number,
                token: token.to_string(),
                row_index,
            },
        );
    }
    if by_number.is_empty() {
        return Err(FormatError::NoSolutions);
    }
    let solutions: Vec<SolutionEntry> = by_number.into_values().collect();
    debug!(solutions = solutions.len(), "built solution catalog");

    Ok(CharLog {
        lines,
        delimiter,
        sentinel_index: Some(sentinel_index),
        err_columns,
        solutions,
    })
}

/// Component key of a normalized header cell, or `None` if it names no component.
///
/// `(RES1)` and `(RES1)*w` give `RES1`, `ERR_RES2` gives `RES2`, and the prefix is
/// also stripped inside parentheses: `(ERR_X)` gives `X`.
pub fn extract_err_key(header: &str) -> Option<String> {
    let caps = KEY_RE.captures(header);
    let tok = caps
        .as_ref()
        .and_then(|c| c.get(1))
        .map_or(header, |m| m.as_str())
        .trim();
    if tok.is_empty() {
        return None;
    }
    let key = match tok.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("ERR_") => &tok[4..],
        _ if caps.is_some() => tok,
        _ => return None,
    };
    (!key.is_empty()).then(|| key.to_string())
}

/// Rightmost cell that looks like a solution file reference, normalized.
pub fn find_solution_token<'a>(cells: &[&'a str]) -> Option<&'a str> {
    cells.iter().rev().map(|c| normalize_cell(*c)).find(|tk| {
        let lower = tk.to_lowercase();
        !tk.is_empty() && lower.contains("solution") && tk.contains('+') && lower.ends_with(".txt")
    })
}

/// Solution number encoded in a token's file name (`.../solutionX+7.txt` gives 7).
pub fn solution_number(token: &str) -> Option<u32> {
    let file_name = token.rsplit(['/', '\\']).next().unwrap_or(token);
    SOLUTION_RE
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
