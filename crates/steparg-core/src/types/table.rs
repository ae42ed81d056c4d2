//! Tabular step arguments

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A data table attached to a step: a header and rows of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableData")]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Unvalidated wire form; rows go through [`Table::add_row`]
#[derive(Deserialize)]
struct TableData {
    header: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl TryFrom<TableData> for Table {
    type Error = Error;

    fn try_from(data: TableData) -> Result<Self> {
        data.rows
            .into_iter()
            .try_fold(Table::new(data.header)?, |table, row| table.with_row(row))
    }
}

/// Borrowed view of a single table row
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    header: &'a [String],
    cells: &'a [String],
}

impl Table {
    /// Create an empty table with the given column names
    pub fn new<I, S>(header: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header: Vec<String> = header.into_iter().map(Into::into).collect();
        if header.is_empty() {
            return Err(Error::ArgumentInvalid {
                message: "a table needs at least one column".to_string(),
            });
        }
        Ok(Self {
            header,
            rows: Vec::new(),
        })
    }

    /// Append a row; missing trailing cells are filled with empty text
    pub fn add_row<I, S>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        if cells.len() > self.header.len() {
            return Err(Error::ArgumentInvalid {
                message: format!(
                    "the row has {} cells but the table only has {} columns",
                    cells.len(),
                    self.header.len()
                ),
            });
        }
        cells.resize(self.header.len(), String::new());
        self.rows.push(cells);
        Ok(())
    }

    /// Builder-style variant of [`Table::add_row`]
    pub fn with_row<I, S>(mut self, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_row(cells)?;
        Ok(self)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.header.iter().any(|h| h == column)
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(move |cells| TableRow {
            header: &self.header,
            cells,
        })
    }

    pub fn row(&self, index: usize) -> Option<TableRow<'_>> {
        self.rows.get(index).map(|cells| TableRow {
            header: &self.header,
            cells,
        })
    }

    /// Rows as an array of `{column: cell}` objects
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.rows()
                .map(|row| {
                    let map = row
                        .iter()
                        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                        .collect();
                    serde_json::Value::Object(map)
                })
                .collect(),
        )
    }
}

impl<'a> TableRow<'a> {
    /// Cell under the named column
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.header
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }

    /// `(column, cell)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.header
            .iter()
            .zip(self.cells.iter())
            .map(|(h, c)| (h.as_str(), c.as_str()))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| {} |", self.header.join(" | "))?;
        for row in &self.rows {
            writeln!(f, "| {} |", row.join(" | "))?;
        }
        Ok(())
    }
}
