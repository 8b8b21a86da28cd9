//! Presentation-ready view models.
//!
//! A presentation layer calls [`StateView::compute`] or [`CharView::compute`]
//! whenever the loaded file, the selected solution or the top-N value changes and
//! renders the result. Both are pure functions of their inputs.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{CoreColumns, NumericTable, RankTableRow, SolutionEntry, VariableStat};
use crate::parser::CharLog;
use crate::ranking::{
    TopNSlice, apply_top_n, axis_range, last_valid_index, normalized_series, rank_variables,
    top_and_worst, variable_columns_with,
};

/// Series for the upper chart: error (as `-ERR0`) and temperature over iterations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainSeries {
    pub x: Vec<f64>,
    pub error: Vec<f64>,
    pub temperature: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateView {
    pub core: CoreColumns,
    pub main: MainSeries,
    /// All ranked variables, most volatile first.
    pub variables: Vec<VariableStat>,
    /// Normalized series of the top-N variables, keyed by name in rank order.
    pub series: IndexMap<String, Vec<f64>>,
    /// Point index carrying each series' end label.
    pub end_labels: IndexMap<String, usize>,
    /// Suggested y-axis bounds for the normalized series.
    pub y_range: Option<(f64, f64)>,
    pub top: Vec<RankTableRow>,
    pub worst: Vec<RankTableRow>,
}

impl StateView {
    pub fn compute(table: &NumericTable, core: &CoreColumns, top_n: usize) -> Self {
        Self::compute_with(table, core, top_n, "|")
    }

    pub fn compute_with(
        table: &NumericTable,
        core: &CoreColumns,
        top_n: usize,
        sentinel: &str,
    ) -> Self {
        let column = |name: &str| table.column(name).map(<[f64]>::to_vec).unwrap_or_default();
        let main = MainSeries {
            x: column(&core.iteration),
            error: column(&core.error).into_iter().map(|v| -v).collect(),
            temperature: core.temperature.as_deref().map(column),
        };

        let columns = variable_columns_with(table, core, sentinel);
        let variables = rank_variables(table, &columns);
        let series = normalized_series(table, &columns, top_n);
        let end_labels = series
            .iter()
            .filter_map(|(name, values)| Some((name.clone(), last_valid_index(values)?)))
            .collect();
        let y_range = axis_range(series.values().map(Vec::as_slice));

        let (top, worst) = top_and_worst(&variables, top_n);
        Self {
            core: core.clone(),
            main,
            series,
            end_labels,
            y_range,
            top: top.iter().map(RankTableRow::from).collect(),
            worst: worst.iter().map(RankTableRow::from).collect(),
            variables,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharView {
    pub solutions: Vec<SolutionEntry>,
    /// Catalog position of the displayed solution.
    pub selected: Option<usize>,
    pub components: TopNSlice,
}

impl CharView {
    /// Rank the components of the solution at catalog position `selection`
    /// (the last solution when `None`).
    pub fn compute(log: &CharLog, selection: Option<usize>, top_n: usize) -> Self {
        let selected = selection
            .or_else(|| log.default_selection())
            .filter(|i| *i < log.solutions().len());
        let rows = selected
            .map(|i| log.component_rows(&log.solutions()[i]))
            .unwrap_or_default();
        Self {
            solutions: log.solutions().to_vec(),
            selected,
            components: apply_top_n(&rows, top_n),
        }
    }
}
