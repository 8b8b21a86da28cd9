//! Rankings derived from parsed logs.
//!
//! - [`columns`] – Core-column detection on state tables
//! - [`variables`] – Variable volatility ranking and normalization
//! - [`components`] – Error-component ranking and top-N bucketing

pub mod columns;
pub mod components;
pub mod variables;

pub use columns::{detect_core_columns, detect_core_columns_with};
pub use components::{TopNSlice, apply_top_n, rank_error_components};
pub use variables::{
    axis_range, last_valid_index, normalize, normalized_series, rank_variables, top_and_worst,
    variable_columns, variable_columns_with,
};

use std::cmp::Ordering;

/// Descending order for floats with NaN sorted after every number.
pub(crate) fn cmp_desc_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
