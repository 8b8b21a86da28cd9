//! State-log parsing into a [`NumericTable`].

use camino::Utf8Path;
use tracing::{debug, info};

use super::helpers::{infer_state_delimiter, parse_lenient, strip_continuation};
use super::source::{ContentSource, FsSource, RetryPolicy, read_lines_shared};
use crate::error::{LogError, Result};
use crate::model::NumericTable;

/// Parse the state log at `path` from the filesystem with the default retry policy.
pub fn parse_numeric_table(path: impl AsRef<Utf8Path>) -> Result<NumericTable> {
    parse_numeric_table_with(&mut FsSource, path.as_ref(), RetryPolicy::default())
}

/// Parse a state log read through `source`.
pub fn parse_numeric_table_with<S: ContentSource + ?Sized>(
    source: &mut S,
    path: &Utf8Path,
    retry: RetryPolicy,
) -> Result<NumericTable> {
    let lines = read_lines_shared(source, path, retry)?;
    let table = table_from_lines(&lines).ok_or_else(|| LogError::EmptyInput {
        path: path.to_owned(),
    })?;
    info!(
        path = %path,
        columns = table.column_count(),
        rows = table.row_count(),
        "loaded state log"
    );
    Ok(table)
}

/// Parse state-log text already held in memory. `None` if the text is blank.
pub fn parse_numeric_table_from_text(text: &str) -> Option<NumericTable> {
    table_from_lines(&super::source::split_lines(text))
}

fn table_from_lines(lines: &[String]) -> Option<NumericTable> {
    let header_pos = lines.iter().position(|l| !l.trim().is_empty())?;
    let header = lines[header_pos].trim();
    let delim = infer_state_delimiter(header);

    let names: Vec<String> = header.split(delim).map(|h| h.trim().to_string()).collect();
    let width = names.len();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for raw_line in &lines[header_pos + 1..] {
        if raw_line.trim().is_empty() {
            continue;
        }
        let line = strip_continuation(raw_line);
        let mut tokens: Vec<&str> = line.split(delim).collect();
        if tokens.len() != width {
            tokens = line.split_whitespace().collect();
        }
        if tokens.len() != width {
            skipped += 1;
            continue;
        }
        rows.push(tokens.into_iter().map(parse_lenient).collect::<Vec<f64>>());
    }
    if skipped > 0 {
        debug!(skipped, width, "skipped state rows with mismatched field count");
    }

    Some(NumericTable::from_rows(&names, rows))
}
