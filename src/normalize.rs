//! Column normalization through the closed category mappings.

use log::{debug, warn};

use crate::{
    dataset::Table,
    error::Result,
    mapping::CategoryMapping,
};

/// Outcome of mapping one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub mapped: usize,
    /// Non-null inputs that had no label in the mapping and became null.
    pub dropped: usize,
    pub nulls: usize,
}

/// Replaces `column` in place with its canonical codes.
pub fn normalize(table: Table, column: &str, mapping: &CategoryMapping) -> Result<Table> {
    map_column(table, column, column, mapping).map(|(table, _)| table)
}

/// Maps `source` through `mapping` and stores the codes in `target`, which
/// may be the same column or a new one.
pub fn map_column(
    mut table: Table,
    source: &str,
    target: &str,
    mapping: &CategoryMapping,
) -> Result<(Table, NormalizeReport)> {
    let mut report = NormalizeReport::default();
    let values = table
        .column_values(source)?
        .map(|cell| {
            let resolved = mapping.resolve(cell);
            match (cell, &resolved) {
                (None, _) => report.nulls += 1,
                (Some(_), None) => report.dropped += 1,
                (Some(_), Some(_)) => report.mapped += 1,
            }
            resolved
        })
        .collect::<Vec<_>>();
    table.set_column(target, values);

    debug!(
        "Mapped '{source}' -> '{target}' with '{}': {} mapped, {} null",
        mapping.name, report.mapped, report.nulls
    );
    if report.dropped > 0 {
        warn!(
            "{} value(s) in '{source}' have no '{}' label and were set to null",
            report.dropped, mapping.name
        );
    }
    Ok((table, report))
}
