pub mod error;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod regions;
pub mod report;
pub mod scoring;
pub mod session;
pub mod validate;

use std::path::{Path, PathBuf};

use serde::Serialize;

use error::ExamDeckError;
use layout::columns::{classify, Classification};
use layout::markers;
use layout::{load_table, HeaderSource};
use model::{RawGrid, Table};
use scoring::outcome::AnalysisResult;
use validate::DataQualityWarning;

pub use session::{Session, SessionOptions};

/// A loaded score sheet: the cleaned table, its column roles and the
/// advisory findings about it.
#[derive(Debug, Clone)]
pub struct Scoresheet {
    pub source: PathBuf,
    pub table: Table,
    pub header: HeaderSource,
    pub dropped_score_label_row: bool,
    pub classification: Classification,
    pub warnings: Vec<DataQualityWarning>,
}

/// Load summary shown to the operator after a score sheet is opened.
#[derive(Debug, Clone, Serialize)]
pub struct ScoresheetSummary {
    pub source: PathBuf,
    pub header_row: Option<usize>,
    pub student_count: usize,
    /// Headers with the full-score or question marker.
    pub question_count: usize,
    pub classification: Classification,
    pub warnings: Vec<DataQualityWarning>,
}

impl Scoresheet {
    pub fn student_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn question_count(&self) -> usize {
        self.table
            .headers()
            .iter()
            .filter(|h| h.contains(markers::FULL_SCORE) || h.contains(markers::QUESTION))
            .count()
    }

    /// Score the sheet. `None` only for a table without columns.
    pub fn analyze(&self) -> Option<AnalysisResult> {
        scoring::analyze(&self.table, &self.classification)
    }

    pub fn summary(&self) -> ScoresheetSummary {
        ScoresheetSummary {
            source: self.source.clone(),
            header_row: match self.header {
                HeaderSource::Detected(row) => Some(row),
                HeaderSource::FirstRow => None,
            },
            student_count: self.student_count(),
            question_count: self.question_count(),
            classification: self.classification.clone(),
            warnings: self.warnings.clone(),
        }
    }
}

/// Main API entry point: read, clean and classify a score sheet file.
pub fn load_scoresheet(path: &Path) -> Result<Scoresheet, ExamDeckError> {
    let grid = extraction::spreadsheet::read_grid(path)?;
    Ok(scoresheet_from_grid(path, &grid))
}

/// Build a score sheet from an already read grid.
pub fn scoresheet_from_grid(source: &Path, grid: &RawGrid) -> Scoresheet {
    let loaded = load_table(grid);
    let classification = classify(&loaded.table);
    let warnings = validate::validate(&loaded.table, &classification);

    Scoresheet {
        source: source.to_path_buf(),
        table: loaded.table,
        header: loaded.header,
        dropped_score_label_row: loaded.dropped_score_label_row,
        classification,
        warnings,
    }
}
