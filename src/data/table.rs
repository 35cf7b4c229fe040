//! Untyped tabular source reading
//!
//! Thin CSV layer: a header row plus string cells. Parsing into typed
//! records happens in the loader, which knows which columns matter.

use std::io::Read;
use std::path::Path;

use crate::{HoopsError, Result};

/// A raw tabular source: column names plus rows of string cells.
#[derive(Debug, Clone)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a table from a CSV file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let reader = csv::Reader::from_path(path).map_err(|e| HoopsError::Source {
            path: display.clone(),
            source: e,
        })?;
        Self::from_csv_reader(reader, &display)
    }

    /// Read a table from any reader producing CSV text.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self> {
        Self::from_csv_reader(csv::Reader::from_reader(reader), source_name)
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>, source_name: &str) -> Result<Self> {
        let columns = reader
            .headers()
            .map_err(|e| HoopsError::Source {
                path: source_name.to_string(),
                source: e,
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| HoopsError::Source {
                path: source_name.to_string(),
                source: e,
            })?;
            rows.push(record.iter().map(|c| c.trim().to_string()).collect());
        }

        Ok(RawTable { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| HoopsError::MissingColumn(name.to_string()))
    }

    /// Cell value at (row, column name).
    pub fn cell(&self, row: usize, column: &str) -> Result<&str> {
        let idx = self.column_index(column)?;
        Ok(self.rows[row].get(idx).map(String::as_str).unwrap_or(""))
    }

    /// Parse a cell as f64, reporting the offending column and value on failure.
    pub fn numeric_cell(&self, row: usize, column: &str) -> Result<f64> {
        let value = self.cell(row, column)?;
        value.parse::<f64>().map_err(|e| HoopsError::BadValue {
            column: column.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
    }
}
