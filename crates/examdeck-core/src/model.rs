use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single untyped spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    #[default]
    Missing,
    Number(Decimal),
    Text(String),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Numeric reading of the cell. Text cells are parsed leniently
    /// ("2", " 1.5 ", "1e1"); anything else yields `None`.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(d) => Some(*d),
            CellValue::Text(s) => parse_number(s),
            CellValue::Missing => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Matches how exported sheets stringify empty cells.
            CellValue::Missing => write!(f, "nan"),
            CellValue::Number(d) => write!(f, "{}", d.normalize()),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Parse a numeric string, accepting plain and scientific notation.
pub fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Rows of cells exactly as read from the source, 0-indexed, no header.
pub type RawGrid = Vec<Vec<CellValue>>;

/// Reference to a table column by position and header text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub index: usize,
    pub header: String,
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)
    }
}

/// A table with resolved column headers.
///
/// Every row holds exactly `headers.len()` cells, so all columns have the
/// same length. Built once by the loader and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding or truncating each row to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Missing);
                row
            })
            .collect();
        Table { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn column_ref(&self, index: usize) -> Option<ColumnRef> {
        self.headers.get(index).map(|h| ColumnRef {
            index,
            header: h.clone(),
        })
    }

    pub fn column_refs(&self) -> Vec<ColumnRef> {
        (0..self.headers.len())
            .filter_map(|i| self.column_ref(i))
            .collect()
    }

    /// Cells of one column in row order. Empty if the index is out of range.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |r| r.get(index))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}
