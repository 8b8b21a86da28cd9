//! Volatility ranking and baseline normalization of state-log variables.
//!
//! The variable block of a state log is every column strictly between the
//! iteration column and the `|` sentinel column. Without a sentinel the block runs
//! to the last column.

use indexmap::IndexMap;

use super::cmp_desc_nan_last;
use crate::model::{CoreColumns, NumericTable, VariableStat};

/// Floor for baselines and first values used as divisors.
pub const EPSILON: f64 = 1e-12;

/// Variable columns using the default `|` sentinel.
pub fn variable_columns(table: &NumericTable, refs: &CoreColumns) -> Vec<String> {
    variable_columns_with(table, refs, "|")
}

/// Names of the columns between the iteration column and `sentinel`, in table order.
pub fn variable_columns_with(
    table: &NumericTable,
    refs: &CoreColumns,
    sentinel: &str,
) -> Vec<String> {
    let Some(iter_idx) = table.index_of(&refs.iteration) else {
        return Vec::new();
    };
    let end = table.index_of(sentinel).unwrap_or(table.column_count());
    let start = iter_idx + 1;
    if start >= end {
        return Vec::new();
    }
    (start..end)
        .filter_map(|i| table.column_at(i).map(|(name, _)| name.to_string()))
        .collect()
}

/// Statistics of one column over its non-NaN values, or `None` if it has none.
fn column_stat(name: &str, values: &[f64]) -> Option<VariableStat> {
    let mut valid = values.iter().copied().filter(|v| !v.is_nan());
    let first = valid.next()?;
    let (mut last, mut min, mut max) = (first, first, first);
    for v in valid {
        last = v;
        min = min.min(v);
        max = max.max(v);
    }
    let range = max - min;
    Some(VariableStat {
        name: name.to_string(),
        first,
        last,
        min,
        max,
        range,
        delta_pct: 100.0 * range / first.abs().max(EPSILON),
        rank: 0,
    })
}

/// Rank `columns` by percent-delta, most volatile first.
///
/// Columns that are missing from the table or contain only NaN are left out.
/// Ties keep their order in `columns`.
pub fn rank_variables(table: &NumericTable, columns: &[String]) -> Vec<VariableStat> {
    let mut stats: Vec<VariableStat> = columns
        .iter()
        .filter_map(|name| column_stat(name, table.column(name)?))
        .collect();
    stats.sort_by(|a, b| cmp_desc_nan_last(a.delta_pct, b.delta_pct));
    for (i, s) in stats.iter_mut().enumerate() {
        s.rank = i + 1;
    }
    stats
}

/// Divide every value by the first non-NaN one. NaN stays NaN.
pub fn normalize(values: &[f64]) -> Option<Vec<f64>> {
    let base = *values.iter().find(|v| !v.is_nan())?;
    let base = if base.abs() < EPSILON { EPSILON } else { base };
    Some(values.iter().map(|v| v / base).collect())
}

/// Baseline-normalized series of the `top_n` most volatile variables, in rank order.
pub fn normalized_series(
    table: &NumericTable,
    columns: &[String],
    top_n: usize,
) -> IndexMap<String, Vec<f64>> {
    rank_variables(table, columns)
        .into_iter()
        .take(top_n)
        .filter_map(|s| {
            let values = normalize(table.column(&s.name)?)?;
            Some((s.name, values))
        })
        .collect()
}

/// Top `top_n` entries in rank order and bottom `top_n` worst-first.
///
/// When `top_n` covers the whole list both sides hold the same entries.
pub fn top_and_worst(
    ranked: &[VariableStat],
    top_n: usize,
) -> (Vec<VariableStat>, Vec<VariableStat>) {
    let n = top_n.min(ranked.len());
    let top = ranked[..n].to_vec();
    let worst = ranked[ranked.len() - n..].iter().rev().cloned().collect();
    (top, worst)
}

/// Index of the last non-NaN value, where a series' end label goes.
pub fn last_valid_index(values: &[f64]) -> Option<usize> {
    values.iter().rposition(|v| !v.is_nan())
}

/// Y-axis bounds that fit every finite value of `series` with 20% padding
/// (at least 0.02). `None` when the values span no range.
pub fn axis_range<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    let (min, max) = series
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if max > min {
        let pad = ((max - min) * 0.20).max(0.02);
        Some((min - pad, max + pad))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_ignores_nan() {
        let s = column_stat("x", &[f64::NAN, 2.0, 5.0, f64::NAN, 1.0]).unwrap();
        assert_eq!((s.first, s.last, s.min, s.max), (2.0, 1.0, 1.0, 5.0));
        assert_eq!(s.delta_pct, 200.0);
        assert!(column_stat("y", &[f64::NAN]).is_none());
    }

    #[test]
    fn zero_first_value_uses_epsilon() {
        let s = column_stat("z", &[0.0, 1e-12]).unwrap();
        assert!((s.delta_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn axis_range_pads() {
        let a = [1.0, 2.0, f64::NAN];
        let (lo, hi) = axis_range([&a[..]]).unwrap();
        assert!((lo - 0.8).abs() < 1e-12 && (hi - 2.2).abs() < 1e-12);
        let flat = [1.0, 1.0];
        assert_eq!(axis_range([&flat[..]]), None);
        let tiny = [1.0, 1.01];
        let (lo, _) = axis_range([&tiny[..]]).unwrap();
        assert!((lo - 0.98).abs() < 1e-12);
    }
}
