//! In-memory dataset table types.
//!
//! A `Table` is what every check operates on. Loaders build one from a file;
//! tests and the demo build them directly with `Table::new` or
//! `Table::from_rows`. Once constructed a table is never mutated.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AttestError, AttestResult};

/// A single scalar cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// True for nulls, NaN floats, and empty text.
    ///
    /// Whitespace-only text also counts as missing: a blank CSV field padded
    /// with spaces carries no value, so it is treated like an empty one.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Bool(_) | CellValue::Int(_) => false,
        }
    }

    /// Borrow the text payload, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

/// The storage type of a column, as inferred from its cells or reported by
/// the loader.
///
/// `Text` is the "freeform" type the quality check counts against a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Temporal,
    Text,
    /// Every cell is missing; no type can be inferred.
    Null,
}

impl ColumnType {
    /// Infer a column type from its cells, ignoring missing values.
    ///
    /// Integers mixed with floats widen to `Float`; any other mixture, or any
    /// text cell, yields `Text`.
    pub fn infer(cells: &[CellValue]) -> Self {
        let mut inferred: Option<ColumnType> = None;
        for cell in cells.iter().filter(|c| !c.is_missing()) {
            let this = match cell {
                CellValue::Bool(_) => ColumnType::Boolean,
                CellValue::Int(_) => ColumnType::Integer,
                CellValue::Float(_) => ColumnType::Float,
                CellValue::Text(_) | CellValue::Null => return ColumnType::Text,
            };
            inferred = Some(match (inferred, this) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
                _ => return ColumnType::Text,
            });
        }
        inferred.unwrap_or(ColumnType::Null)
    }
}

/// One named, typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub cells: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring its type from the cells.
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let column_type = ColumnType::infer(&cells);
        Self { name: name.into(), column_type, cells }
    }

    /// Build a column whose type was decided elsewhere (e.g. by a loader's
    /// schema inference).
    pub fn with_type(name: impl Into<String>, column_type: ColumnType, cells: Vec<CellValue>) -> Self {
        Self { name: name.into(), column_type, cells }
    }
}

/// An ordered collection of equal-length columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from columns.
    ///
    /// Returns `AttestError::MalformedInput` if the columns differ in length.
    pub fn new(columns: Vec<Column>) -> AttestResult<Self> {
        let row_count = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != row_count) {
            return Err(AttestError::MalformedInput {
                reason: format!(
                    "column '{}' has {} cells but the table has {} rows",
                    bad.name,
                    bad.cells.len(),
                    row_count
                ),
            });
        }
        Ok(Self { columns, row_count })
    }

    /// Build a table from a header and row-major cell data.
    ///
    /// Returns `AttestError::MalformedInput` if any row's width differs from
    /// the header.
    pub fn from_rows<S: AsRef<str>>(header: &[S], rows: Vec<Vec<CellValue>>) -> AttestResult<Self> {
        let mut columns: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); header.len()];
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != header.len() {
                return Err(AttestError::MalformedInput {
                    reason: format!(
                        "row {} has {} cells but the header has {} columns",
                        idx,
                        row.len(),
                        header.len()
                    ),
                });
            }
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(cell);
            }
        }
        let columns = header
            .iter()
            .zip(columns)
            .map(|(name, cells)| Column::new(name.as_ref(), cells))
            .collect();
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate every cell with its (column index, row index).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellValue)> {
        self.columns
            .iter()
            .enumerate()
            .flat_map(|(c, col)| col.cells.iter().enumerate().map(move |(r, cell)| (c, r, cell)))
    }
}

/// The three input encodings the loader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Csv,
    Json,
    Parquet,
}

impl DatasetFormat {
    /// Pick the format from the path's extension (case-insensitive).
    ///
    /// Returns `AttestError::UnsupportedFormat` for any other extension,
    /// including none at all.
    pub fn from_path(path: &Path) -> AttestResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "csv" => Ok(DatasetFormat::Csv),
            "json" => Ok(DatasetFormat::Json),
            "parquet" => Ok(DatasetFormat::Parquet),
            _ => Err(AttestError::UnsupportedFormat { extension: ext }),
        }
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetFormat::Csv => "csv",
            DatasetFormat::Json => "json",
            DatasetFormat::Parquet => "parquet",
        };
        f.write_str(name)
    }
}

/// A table together with facts about the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub format: DatasetFormat,
    /// Size of the source file in bytes.
    pub byte_size: u64,
}
