use crate::layout::markers::{NAME, SCORE_LABEL};
use crate::model::CellValue;

/// Number of leading raw rows searched for the header row.
pub const HEADER_SCAN_ROWS: usize = 5;

/// Find the header row: the first of the leading rows with a cell whose
/// text contains the name marker.
pub fn find_header_row(rows: &[Vec<CellValue>]) -> Option<usize> {
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| row.iter().any(|cell| cell.to_string().contains(NAME)))
}

/// Build column names from a header row.
///
/// Empty header cells become `Unnamed: <index>` and repeated names get a
/// `.1`, `.2`, ... suffix so every column name is unique.
pub fn header_names(row: &[CellValue], width: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(width);
    for i in 0..width {
        let base = match row.get(i) {
            None | Some(CellValue::Missing) => format!("Unnamed: {i}"),
            Some(cell) => cell.to_string(),
        };
        let mut name = base.clone();
        let mut dup = 0;
        while names.contains(&name) {
            dup += 1;
            name = format!("{base}.{dup}");
        }
        names.push(name);
    }
    names
}

/// True if a data row is a duplicated "score" sub-header some exporters
/// emit directly below the real header.
pub fn is_score_label_row(row: &[CellValue]) -> bool {
    let joined = row
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    joined.contains(SCORE_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<CellValue> {
        cells
            .iter()
            .map(|s| {
                if s.is_empty() {
                    CellValue::Missing
                } else {
                    CellValue::Text(s.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_find_header_row_first_match_wins() {
        let rows = vec![
            text_row(&["期中考试", "", ""]),
            text_row(&["学号", "学生姓名", "主-1"]),
            text_row(&["", "姓名", ""]),
        ];
        assert_eq!(find_header_row(&rows), Some(1));
    }

    #[test]
    fn test_find_header_row_outside_window() {
        let mut rows: Vec<Vec<CellValue>> = (0..5).map(|_| text_row(&["x"])).collect();
        rows.push(text_row(&["姓名"]));
        assert_eq!(find_header_row(&rows), None);
    }

    #[test]
    fn test_header_names_unnamed_and_duplicates() {
        let row = text_row(&["姓名", "", "主-1", "主-1"]);
        assert_eq!(
            header_names(&row, 5),
            vec!["姓名", "Unnamed: 1", "主-1", "主-1.1", "Unnamed: 4"]
        );
    }

    #[test]
    fn test_is_score_label_row() {
        assert!(is_score_label_row(&text_row(&["", "", "得分", "得分"])));
        assert!(!is_score_label_row(&text_row(&["001", "Alice", "2"])));
    }
}
