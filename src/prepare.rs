//! One-shot preparation of a raw registry snapshot.
//!
//! Runs before any query, with exclusive ownership of the table: the
//! transaction type gains a numeric id column, the categorical columns are
//! replaced by their codes, and the transaction date is split into year and
//! month.

use log::info;

use crate::{
    config::DatasetConfig,
    dataset::Table,
    dates,
    error::Result,
    mapping::{self, CategoryMapping},
    normalize::{self, NormalizeReport},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareReport {
    pub rows: usize,
    pub columns: Vec<(String, NormalizeReport)>,
}

impl PrepareReport {
    pub fn dropped(&self) -> usize {
        self.columns.iter().map(|(_, report)| report.dropped).sum()
    }
}

pub fn prepare(table: Table, config: &DatasetConfig) -> Result<(Table, PrepareReport)> {
    let mut report = PrepareReport {
        rows: table.len(),
        columns: Vec::new(),
    };

    let steps: [(&str, &str, &CategoryMapping); 4] = [
        (
            config.transaction_type_column.as_str(),
            config.transaction_id_column.as_str(),
            &mapping::TRANSACTION_TYPE,
        ),
        (
            config.origin_column.as_str(),
            config.origin_column.as_str(),
            &mapping::ORIGIN,
        ),
        (
            config.person_type_column.as_str(),
            config.person_type_column.as_str(),
            &mapping::PERSON_TYPE,
        ),
        (
            config.gender_column.as_str(),
            config.gender_column.as_str(),
            &mapping::GENDER,
        ),
    ];

    let mut table = table;
    for (source, target, category) in steps {
        let (mapped, column_report) = normalize::map_column(table, source, target, category)?;
        report.columns.push((target.to_string(), column_report));
        table = mapped;
    }

    let table = dates::decompose_date(
        table,
        &config.date_column,
        &config.year_column,
        &config.month_column,
    )?;

    info!(
        "Prepared {} row(s); {} unmapped categorical value(s) set to null",
        report.rows,
        report.dropped()
    );
    Ok((table, report))
}
