use std::path::Path;

use calamine::{Data, Reader};
use rust_decimal::Decimal;

use crate::error::ExamDeckError;
use crate::model::{CellValue, RawGrid};

/// Cell texts that exporters use for "no value".
const NA_TOKENS: &[&str] = &["NaN", "nan", "NA", "N/A", "#N/A", "NULL", "null"];

/// Read the first worksheet of a score sheet into a raw grid.
///
/// Supports xlsx/xlsm/xls/ods (via calamine) and csv. Cell positions are
/// absolute: leading empty rows and columns of the sheet are kept as
/// missing cells so row and column indices match what the user sees.
pub fn read_grid(path: &Path) -> Result<RawGrid, ExamDeckError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let grid = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        "csv" => read_csv(path)?,
        other => {
            return Err(ExamDeckError::UnsupportedFormat(format!(
                "'{}' (expected .xlsx, .xls, .ods or .csv)",
                if other.is_empty() { "no extension" } else { other }
            )))
        }
    };

    tracing::debug!(
        path = %path.display(),
        rows = grid.len(),
        cols = grid.iter().map(Vec::len).max().unwrap_or(0),
        "read raw grid"
    );
    Ok(grid)
}

fn read_workbook(path: &Path) -> Result<RawGrid, ExamDeckError> {
    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|e| ExamDeckError::load(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExamDeckError::load(path, "workbook has no worksheets"))?
        .map_err(|e| ExamDeckError::load(path, e))?;

    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: RawGrid = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![CellValue::Missing; col_offset];
        cells.extend(row.iter().map(cell_from_data));
        grid.push(cells);
    }
    Ok(grid)
}

fn read_csv(path: &Path) -> Result<RawGrid, ExamDeckError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ExamDeckError::load(path, e))?;

    let mut grid = RawGrid::new();
    for record in reader.records() {
        let record = record.map_err(|e| ExamDeckError::load(path, e))?;
        grid.push(
            record
                .iter()
                .map(|field| cell_from_text(field.trim_start_matches('\u{feff}')))
                .collect(),
        );
    }
    Ok(grid)
}

/// Convert a calamine cell into an untyped cell value.
pub fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        Data::String(s) => cell_from_text(s),
        Data::Float(f) => f64_to_decimal(*f)
            .map(CellValue::Number)
            .unwrap_or(CellValue::Missing),
        Data::Int(i) => CellValue::Number(Decimal::from(*i)),
        Data::Bool(b) => CellValue::Text(if *b { "True" } else { "False" }.into()),
        Data::Error(_) => CellValue::Missing,
        _ => CellValue::Text(format!("{cell}")),
    }
}

/// Convert a text cell, mapping blank and NA markers to `Missing`.
pub fn cell_from_text(s: &str) -> CellValue {
    if s.trim().is_empty() || NA_TOKENS.contains(&s.trim()) {
        CellValue::Missing
    } else {
        CellValue::Text(s.to_string())
    }
}

/// Convert f64 to Decimal, preserving the printed precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 0.35_f64 becoming 0.34999...). Non-finite values yield `None`.
fn f64_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    let s = format!("{f}");
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.35), Some(dec!(0.35)));
        assert_eq!(f64_to_decimal(2.0), Some(dec!(2)));
        assert_eq!(f64_to_decimal(f64::NAN), None);
    }

    #[test]
    fn calamine_cells() {
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Missing);
        assert_eq!(cell_from_data(&Data::Float(1.5)), CellValue::Number(dec!(1.5)));
        assert_eq!(cell_from_data(&Data::Int(3)), CellValue::Number(dec!(3)));
        assert_eq!(
            cell_from_data(&Data::String("A".into())),
            CellValue::Text("A".into())
        );
        assert_eq!(cell_from_data(&Data::String("  ".into())), CellValue::Missing);
    }

    #[test]
    fn na_markers_are_missing() {
        assert_eq!(cell_from_text("NaN"), CellValue::Missing);
        assert_eq!(cell_from_text("#N/A"), CellValue::Missing);
        // A dash means "unanswered" and is kept for the scorer to see.
        assert_eq!(cell_from_text("-"), CellValue::Text("-".into()));
    }

    #[test]
    fn reads_csv_grid() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "\u{feff}考试,,").unwrap();
        writeln!(file, "学号,姓名,主-1 (满分:2)").unwrap();
        writeln!(file, "1,Alice,2").unwrap();
        writeln!(file, "2,Bob").unwrap();
        file.flush().unwrap();

        let grid = read_grid(file.path()).unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][0], CellValue::Text("考试".into()));
        assert_eq!(grid[0][1], CellValue::Missing);
        assert_eq!(grid[1][1], CellValue::Text("姓名".into()));
        assert_eq!(grid[3].len(), 2);
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = read_grid(Path::new("scores.txt")).unwrap_err();
        assert!(matches!(err, ExamDeckError::UnsupportedFormat(_)));
    }

    #[test]
    fn unreadable_workbook_is_load_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"definitely not a zip archive").unwrap();
        file.flush().unwrap();

        let err = read_grid(file.path()).unwrap_err();
        assert!(matches!(err, ExamDeckError::Load { .. }));
    }
}
