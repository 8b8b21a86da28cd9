//! Resolution of the fixed state-log columns.

use crate::error::{LogError, Result};
use crate::model::{ColumnNames, CoreColumns, NumericTable};

/// Resolve the core columns using the default names (`Neval`, `ERR0`, `T`).
pub fn detect_core_columns(table: &NumericTable) -> Result<CoreColumns> {
    detect_core_columns_with(table, &ColumnNames::default())
}

/// Resolve the core columns of `table`.
///
/// Each name is looked up exactly, then ignoring case. Beyond that the error
/// column falls back to the first name containing the error marker and the
/// iteration column to the first column. Temperature has no fallback.
pub fn detect_core_columns_with(table: &NumericTable, names: &ColumnNames) -> Result<CoreColumns> {
    let iteration = resolve(table, &names.iteration)
        .or_else(|| table.column_names().next())
        .ok_or_else(|| LogError::MissingColumn {
            name: names.iteration.clone(),
        })?;

    let marker = names.error.to_uppercase();
    let error = resolve(table, &names.error)
        .or_else(|| {
            table
                .column_names()
                .find(|c| c.to_uppercase().contains(&marker))
        })
        .ok_or_else(|| LogError::MissingColumn {
            name: names.error.clone(),
        })?;

    let temperature = resolve(table, &names.temperature);

    Ok(CoreColumns {
        iteration: iteration.to_string(),
        error: error.to_string(),
        temperature: temperature.map(str::to_string),
    })
}

fn resolve<'a>(table: &'a NumericTable, name: &str) -> Option<&'a str> {
    table
        .column_names()
        .find(|c| *c == name)
        .or_else(|| table.find_ignore_case(name))
}
