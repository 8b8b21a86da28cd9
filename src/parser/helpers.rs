//! Small text helpers shared by the state-log and char-log parsers.

use std::collections::HashSet;

/// Placeholder for blank header cells.
pub const BLANK_HEADER: &str = "Col";

/// Pick the state-log delimiter from its header: tab, comma, semicolon, else space.
pub fn infer_state_delimiter(header: &str) -> char {
    ['\t', ',', ';']
        .into_iter()
        .find(|d| header.contains(*d))
        .unwrap_or(' ')
}

/// Pick the char-log delimiter from its header: tab, else comma, else tab.
pub fn infer_char_delimiter(header: &str) -> char {
    if !header.contains('\t') && header.contains(',') {
        ','
    } else {
        '\t'
    }
}

/// Make header names unique, ignoring case.
///
/// Blank names become [`BLANK_HEADER`]; repeats get `_2`, `_3`, … appended in
/// order of appearance.
pub fn make_unique(names: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for raw in names {
        let base = if raw.trim().is_empty() {
            BLANK_HEADER
        } else {
            raw.as_str()
        };
        let mut name = base.to_string();
        let mut k = 1;
        while used.contains(&name.to_lowercase()) {
            k += 1;
            name = format!("{base}_{k}");
        }
        used.insert(name.to_lowercase());
        out.push(name);
    }
    out
}

/// Trim whitespace, then any surrounding `"` or `'` characters.
pub fn normalize_cell(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '"' || c == '\'')
}

/// Parse a number the lenient way the logs need: invalid text reads as `0.0`.
pub fn parse_lenient(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

/// Trim a data line and drop trailing `\` continuation markers.
pub fn strip_continuation(line: &str) -> &str {
    line.trim().trim_end_matches('\\')
}
