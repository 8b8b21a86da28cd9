//! Ranking of a solution's error components.

use serde::Serialize;

use super::cmp_desc_nan_last;
use crate::model::{ComponentRow, ErrColumn};
use crate::parser::helpers::parse_lenient;

/// Number of side-by-side buckets the top-N slice is split into.
pub const BUCKETS: usize = 3;

/// Top-N slice of a ranked row with ranks and shares filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopNSlice {
    pub rows: Vec<ComponentRow>,
    /// Sum over all components of the row, not only the slice.
    pub total: f64,
    /// `rows` cut into [`BUCKETS`] contiguous parts of `ceil(len / 3)` rows.
    pub buckets: [Vec<ComponentRow>; BUCKETS],
}

/// Read every error column of `line` and sort the components by value, largest first.
///
/// Missing or unparsable cells count as `0.0`. Equal values keep column order.
pub fn rank_error_components(
    line: &str,
    delimiter: char,
    columns: &[ErrColumn],
) -> Vec<ComponentRow> {
    let cells: Vec<&str> = line.split(delimiter).collect();
    let mut rows: Vec<ComponentRow> = columns
        .iter()
        .map(|col| ComponentRow {
            rank: 0,
            name: col.key.clone(),
            value: cells.get(col.index).map_or(0.0, |c| parse_lenient(c)),
            share: 0.0,
        })
        .collect();
    rows.sort_by(|a, b| cmp_desc_nan_last(a.value, b.value));
    rows
}

/// Keep the first `top_n` rows (at least one), rank them and split them into buckets.
///
/// Shares are relative to the total of all `rows`; a total that is not positive
/// gives every row a share of 0.
pub fn apply_top_n(rows: &[ComponentRow], top_n: usize) -> TopNSlice {
    let total: f64 = rows.iter().map(|r| r.value).sum();
    let slice: Vec<ComponentRow> = rows
        .iter()
        .take(top_n.max(1))
        .enumerate()
        .map(|(i, r)| ComponentRow {
            rank: i + 1,
            name: r.name.clone(),
            value: r.value,
            share: if total > 0.0 { r.value / total } else { 0.0 },
        })
        .collect();

    let per = slice.len().div_ceil(BUCKETS);
    let mut buckets: [Vec<ComponentRow>; BUCKETS] = Default::default();
    if per > 0 {
        for (bucket, chunk) in buckets.iter_mut().zip(slice.chunks(per)) {
            *bucket = chunk.to_vec();
        }
    }

    TopNSlice {
        rows: slice,
        total,
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[f64]) -> Vec<ComponentRow> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ComponentRow {
                rank: 0,
                name: format!("C{i}"),
                value: *v,
                share: 0.0,
            })
            .collect()
    }

    #[test]
    fn buckets_are_ceil_sized() {
        let r = apply_top_n(&rows(&[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]), 100);
        let sizes: Vec<usize> = r.buckets.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);

        let r = apply_top_n(&rows(&[2.0, 1.0]), 100);
        let sizes: Vec<usize> = r.buckets.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 1, 0]);

        let r = apply_top_n(&[], 10);
        assert!(r.rows.is_empty() && r.buckets.iter().all(Vec::is_empty));
    }

    #[test]
    fn top_n_is_at_least_one() {
        let r = apply_top_n(&rows(&[3.0, 1.0]), 0);
        assert_eq!(r.rows.len(), 1);
        assert_eq!(r.rows[0].rank, 1);
        assert_eq!(r.rows[0].share, 0.75);
    }
}
