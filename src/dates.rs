//! Year/month decomposition of a date column.
//!
//! Any non-null cell that does not carry a calendar date aborts the whole
//! decomposition with [`Error::UnparseableDate`]; partial columns are never
//! produced. Null cells decompose to null year and month.

use chrono::Datelike;
use log::debug;

use crate::{
    data::{Value, date_of},
    dataset::Table,
    error::{Error, Result},
};

pub fn decompose_date(
    mut table: Table,
    column: &str,
    year_column: &str,
    month_column: &str,
) -> Result<Table> {
    let mut years = Vec::with_capacity(table.len());
    let mut months = Vec::with_capacity(table.len());
    for (row_idx, cell) in table.column_values(column)?.enumerate() {
        let Some(value) = cell else {
            years.push(None);
            months.push(None);
            continue;
        };
        let date = date_of(value).ok_or_else(|| Error::UnparseableDate {
            column: column.to_string(),
            row: row_idx + 1,
            value: value.as_display(),
        })?;
        years.push(Some(Value::Integer(i64::from(date.year()))));
        months.push(Some(Value::Integer(i64::from(date.month()))));
    }
    table.set_column(year_column, years);
    table.set_column(month_column, months);
    debug!("Decomposed '{column}' into '{year_column}' and '{month_column}'");
    Ok(table)
}
