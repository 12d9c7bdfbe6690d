pub mod columns;
pub mod header;

use crate::model::{RawGrid, Table};
use header::{find_header_row, header_names, is_score_label_row};

/// Marker tokens found in exported score sheet headers.
pub mod markers {
    /// Student name column ("姓名").
    pub const NAME: &str = "姓名";
    /// Alternative identity tokens, checked after [`NAME`].
    pub const STUDENT: &str = "学生";
    pub const NAME_ASCII: &str = "name";
    /// Full score annotation, e.g. "主-1 (满分: 2)".
    pub const FULL_SCORE: &str = "满分";
    /// Question ("题"), as in "第1题".
    pub const QUESTION: &str = "题";
    /// Subjective question prefix ("主-").
    pub const SUBJECTIVE: &str = "主-";
    pub const SUBJECTIVE_CHAR: char = '主';
    /// Objective (multiple choice) question prefix ("客-").
    pub const OBJECTIVE: &str = "客-";
    pub const OBJECTIVE_CHAR: char = '客';
    /// "Score" label of a duplicated sub-header row ("得分").
    pub const SCORE_LABEL: &str = "得分";
}

/// How the header row of a table was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource {
    /// Row `n` of the raw grid contains the name marker.
    Detected(usize),
    /// No marker in the leading rows; the first row is the header.
    FirstRow,
}

/// Result of [`load_table`].
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub header: HeaderSource,
    /// True if a "得分" sub-header row directly below the header was dropped.
    pub dropped_score_label_row: bool,
}

/// Turn a raw grid into a table with a resolved header row.
///
/// Rows above the header are discarded, a score-label row directly below a
/// detected header is removed, and rows where every cell is missing are
/// dropped.
pub fn load_table(grid: &RawGrid) -> LoadedTable {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let (header, header_idx) = match find_header_row(grid) {
        Some(h) => {
            tracing::info!(row = h, "found header row");
            (HeaderSource::Detected(h), h)
        }
        None => {
            tracing::info!("no name marker in leading rows, using first row as header");
            (HeaderSource::FirstRow, 0)
        }
    };

    let headers = match grid.get(header_idx) {
        Some(row) => header_names(row, width),
        None => Vec::new(),
    };

    let mut data: Vec<_> = grid.iter().skip(header_idx + 1).cloned().collect();

    let mut dropped_score_label_row = false;
    if matches!(header, HeaderSource::Detected(_))
        && data.first().is_some_and(|row| is_score_label_row(row))
    {
        tracing::info!("dropping '得分' label row below header");
        data.remove(0);
        dropped_score_label_row = true;
    }

    let before = data.len();
    data.retain(|row| !row.iter().all(|c| c.is_missing()));
    if data.len() != before {
        tracing::debug!(dropped = before - data.len(), "dropped empty rows");
    }

    let table = Table::new(headers, data);
    tracing::info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded score table"
    );

    LoadedTable {
        table,
        header,
        dropped_score_label_row,
    }
}
