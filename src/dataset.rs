//! The in-memory table every query runs against.
//!
//! A [`Table`] is a header plus rows of typed, nullable cells. It is built
//! once (loaded from a snapshot, then optionally prepared) and afterwards
//! only borrowed: queries take `&Table`, preparation steps consume a table
//! and hand back a new one.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use encoding_rs::Encoding;
use log::info;

use crate::{
    data::Value,
    error::Error,
    io_utils, metadata,
};

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Row) -> Result<()> {
        ensure!(
            row.len() == self.columns.len(),
            "Row {} has {} field(s) but the table has {} column(s)",
            self.rows.len() + 1,
            row.len(),
            self.columns.len()
        );
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, Error> {
        self.column_index(name)
            .ok_or_else(|| Error::missing_column(name))
    }

    /// Cells of one column in row order.
    pub fn column_values(&self, name: &str) -> Result<impl Iterator<Item = Option<&Value>>, Error> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_ref()))
    }

    /// Replaces `name` with `values`, appending the column when it does not
    /// exist yet. `values` must hold one cell per row.
    pub(crate) fn set_column(&mut self, name: &str, values: Vec<Option<Value>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }
}

/// Loads a delimited snapshot, typing each cell on its own.
pub fn load_table(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Table> {
    info!(
        "Loading {:?} with delimiter '{}' ({})",
        path,
        io_utils::printable_delimiter(delimiter),
        encoding.name()
    );
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;

    let mut table = Table::new(headers);
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        let typed = decoded
            .iter()
            .map(|cell| metadata::infer_value(cell))
            .collect::<Row>();
        table
            .push_row(typed)
            .with_context(|| format!("Parsing row {}", row_idx + 2))?;
    }
    info!(
        "Loaded {} row(s) across {} column(s)",
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

/// Writes a table as delimited text; nulls become empty cells.
pub fn write_table(table: &Table, path: Option<&Path>, delimiter: u8) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(path, delimiter)?;
    writer
        .write_record(table.columns())
        .context("Writing output headers")?;
    for (idx, row) in table.rows().iter().enumerate() {
        let cells = row
            .iter()
            .map(|cell| cell.as_ref().map(Value::as_display).unwrap_or_default());
        writer
            .write_record(cells)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}
