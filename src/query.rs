//! Read-only aggregations over a prepared table.
//!
//! All queries borrow the table and share nothing mutable, so one
//! [`TheftQueries`] can serve any number of threads at once.
//!
//! Grouping keeps the order in which each key is first met while scanning
//! rows; sorts are stable, so equal counts keep that order. Null keys are not
//! grouped.
//!
//! Year-scoped queries reject years outside the configured range. An in-range
//! year without rows is an empty answer for [`TheftQueries::top_stolen_models`]
//! but [`Error::NotFound`] for the office and gender queries.

use std::collections::{HashMap, hash_map::Entry};

use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::{
    config::DatasetConfig,
    data::Value,
    dataset::{Row, Table},
    error::{Error, Result},
    mapping::{FEMALE_CODE, MALE_CODE, OTHER_CODE},
};

pub const DEFAULT_TOP_MODELS: usize = 3;
pub const LEAST_STOLEN_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCount {
    pub model: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub female: usize,
    pub male: usize,
    pub other: usize,
}

impl GenderCounts {
    pub fn total(&self) -> usize {
        self.female + self.male + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandModelCount {
    pub brand: String,
    pub model: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TheftQueries<'a> {
    table: &'a Table,
    config: &'a DatasetConfig,
}

impl<'a> TheftQueries<'a> {
    pub fn new(table: &'a Table, config: &'a DatasetConfig) -> Self {
        Self { table, config }
    }

    /// The `n` models with the most rows in `year`, most stolen first.
    pub fn top_stolen_models(&self, year: i32, n: usize) -> Result<Vec<ModelCount>> {
        let rows = self.rows_for_year(year)?;
        let model_idx = self.table.require_column(&self.config.model_column)?;
        let ranked = count_groups(rows.iter().map(|row| row[model_idx].as_ref()))
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(n)
            .map(|(model, count)| ModelCount { model, count })
            .collect::<Vec<_>>();
        debug!(
            "top_stolen_models({year}, {n}): {} of {} row(s) ranked",
            ranked.len(),
            rows.len()
        );
        Ok(ranked)
    }

    /// Registry office with the most rows in `year`.
    pub fn busiest_registry_office(&self, year: i32) -> Result<String> {
        let rows = self.rows_for_year(year)?;
        let office_idx = self
            .table
            .require_column(&self.config.registry_office_column)?;
        if rows.is_empty() {
            return Err(Error::NotFound { year });
        }
        let mut best: Option<(String, usize)> = None;
        for (office, count) in count_groups(rows.iter().map(|row| row[office_idx].as_ref())) {
            if best.as_ref().is_none_or(|(_, top)| count > *top) {
                best = Some((office, count));
            }
        }
        let (office, count) = best.ok_or(Error::NotFound { year })?;
        debug!("busiest_registry_office({year}): '{office}' with {count} row(s)");
        Ok(office)
    }

    /// Rows of `year` per owner gender code.
    pub fn theft_counts_by_gender(&self, year: i32) -> Result<GenderCounts> {
        let rows = self.rows_for_year(year)?;
        let gender_idx = self.table.require_column(&self.config.gender_column)?;
        if rows.is_empty() {
            return Err(Error::NotFound { year });
        }
        let mut counts = GenderCounts::default();
        for row in &rows {
            match row[gender_idx].as_ref().and_then(Value::as_str) {
                Some(FEMALE_CODE) => counts.female += 1,
                Some(MALE_CODE) => counts.male += 1,
                Some(OTHER_CODE) => counts.other += 1,
                _ => {}
            }
        }
        debug!("theft_counts_by_gender({year}): {counts:?}");
        Ok(counts)
    }

    /// The three models of `brand` with the fewest rows across all years.
    /// The brand must match exactly, including case.
    pub fn least_stolen_models(&self, brand: &str) -> Result<Vec<BrandModelCount>> {
        let brand_idx = self.table.require_column(&self.config.brand_column)?;
        let model_idx = self.table.require_column(&self.config.model_column)?;
        let models = self
            .table
            .rows()
            .iter()
            .filter(|row| {
                row[brand_idx]
                    .as_ref()
                    .is_some_and(|value| value.as_display() == brand)
            })
            .map(|row| row[model_idx].as_ref());
        let least = count_groups(models)
            .into_iter()
            .sorted_by(|a, b| a.1.cmp(&b.1))
            .take(LEAST_STOLEN_LIMIT)
            .map(|(model, count)| BrandModelCount {
                brand: brand.to_string(),
                model,
                count,
            })
            .collect::<Vec<_>>();
        debug!("least_stolen_models('{brand}'): {} group(s)", least.len());
        Ok(least)
    }

    fn check_year(&self, year: i32) -> Result<()> {
        if self.config.years().contains(&year) {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                year,
                min: self.config.min_year,
                max: self.config.max_year,
            })
        }
    }

    fn rows_for_year(&self, year: i32) -> Result<Vec<&'a Row>> {
        self.check_year(year)?;
        let year_idx = self.table.require_column(&self.config.year_column)?;
        let table: &'a Table = self.table;
        Ok(table
            .rows()
            .iter()
            .filter(|row| {
                row[year_idx].as_ref().and_then(Value::as_i64) == Some(i64::from(year))
            })
            .collect())
    }
}

/// Counts non-null keys, returning groups in first-encounter order.
fn count_groups<'v>(keys: impl Iterator<Item = Option<&'v Value>>) -> Vec<(String, usize)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, usize)> = Vec::new();
    for key in keys.flatten() {
        match positions.entry(key.as_display()) {
            Entry::Occupied(slot) => groups[*slot.get()].1 += 1,
            Entry::Vacant(slot) => {
                groups.push((slot.key().clone(), 1));
                slot.insert(groups.len() - 1);
            }
        }
    }
    groups
}
