//! Advisory data-quality checks run after a score sheet is loaded.
//!
//! Nothing here blocks processing; the findings are shown to the operator
//! so they can judge whether the statistics will be meaningful.

use serde::{Deserialize, Serialize};

use crate::layout::columns::{Classification, IdentitySource};
use crate::layout::markers;
use crate::model::{CellValue, Table};

/// Number of score columns whose values are sampled.
const SAMPLED_COLUMNS: usize = 3;
/// Number of non-missing values sampled per column.
const SAMPLED_VALUES: usize = 10;
/// Number of subjective columns checked for numeric content.
const SUBJECTIVE_CHECKED: usize = 5;
/// Header text is truncated to this many characters in messages.
const HEADER_PREVIEW_CHARS: usize = 20;

const CHOICE_TOKENS: &[&str] = &["A", "B", "C", "D", "E", "F"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// One advisory finding about the score sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    pub severity: WarningSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
}

impl DataQualityWarning {
    fn new(severity: WarningSeverity, column: Option<&str>, message: impl Into<String>) -> Self {
        DataQualityWarning {
            severity,
            column: column.map(|c| c.chars().take(HEADER_PREVIEW_CHARS).collect()),
            message: message.into(),
        }
    }
}

/// How the sampled values of a column look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// At least one sampled value is numeric.
    Numeric { numeric: usize, sampled: usize },
    /// Only choice letters; needs an answer key.
    Choice,
    /// Every value is missing.
    Empty,
    /// Values that are neither numeric nor choice letters.
    Anomalous,
    /// Nothing conclusive (e.g. only unanswered markers).
    Inconclusive,
}

/// Classify the first non-missing values of a column.
pub fn sample_column(table: &Table, index: usize) -> SampleKind {
    let values: Vec<&CellValue> = table
        .column(index)
        .filter(|c| !c.is_missing())
        .take(SAMPLED_VALUES)
        .collect();

    if values.is_empty() {
        return SampleKind::Empty;
    }

    let mut numeric = 0;
    let mut choice = 0;
    let mut invalid = 0;
    for value in &values {
        if value.as_number().is_some() {
            numeric += 1;
        }
        let text = value.to_string();
        let text = text.trim();
        if CHOICE_TOKENS.contains(&text) {
            choice += 1;
        } else if !["-", "", "nan"].contains(&text) && !looks_numeric(text) {
            invalid += 1;
        }
    }

    if numeric > 0 {
        SampleKind::Numeric {
            numeric,
            sampled: values.len(),
        }
    } else if choice > 0 {
        SampleKind::Choice
    } else if invalid > 0 {
        SampleKind::Anomalous
    } else {
        SampleKind::Inconclusive
    }
}

fn looks_numeric(text: &str) -> bool {
    let digits: Vec<char> = text.chars().filter(|c| *c != '.' && *c != '-').collect();
    !digits.is_empty() && digits.iter().all(|c| c.is_ascii_digit())
}

/// Run all advisory checks.
pub fn validate(table: &Table, classification: &Classification) -> Vec<DataQualityWarning> {
    use WarningSeverity::{Error, Info, Warning};

    let mut warnings = Vec::new();

    if table.row_count() == 0 {
        warnings.push(DataQualityWarning::new(Error, None, "score sheet has no data rows"));
        return warnings;
    }

    match (&classification.identity, classification.identity_source) {
        (Some(col), Some(IdentitySource::Marker)) => warnings.push(DataQualityWarning::new(
            Info,
            Some(&col.header),
            "name column found",
        )),
        (Some(col), _) => warnings.push(DataQualityWarning::new(
            Warning,
            Some(&col.header),
            "no name column found, using positional fallback",
        )),
        (None, _) => warnings.push(DataQualityWarning::new(Warning, None, "no name column found")),
    }

    let score_columns = &classification.score_columns;
    let objective = score_columns
        .iter()
        .filter(|c| c.header.contains(markers::OBJECTIVE))
        .count();
    let subjective: Vec<_> = score_columns
        .iter()
        .filter(|c| !c.header.contains(markers::OBJECTIVE) && c.header.contains(markers::SUBJECTIVE))
        .collect();

    warnings.push(DataQualityWarning::new(
        if score_columns.is_empty() { Warning } else { Info },
        None,
        format!(
            "{} score column(s): {} objective, {} subjective",
            score_columns.len(),
            objective,
            subjective.len()
        ),
    ));

    for col in score_columns.iter().take(SAMPLED_COLUMNS) {
        let finding = match sample_column(table, col.index) {
            SampleKind::Numeric { numeric, sampled } => Some((
                Info,
                format!("numeric values ({numeric}/{sampled} sampled)"),
            )),
            SampleKind::Choice => Some((Warning, "choice answers, needs an answer key".into())),
            SampleKind::Empty => Some((Warning, "all values missing".into())),
            SampleKind::Anomalous => Some((Error, "unexpected values".into())),
            SampleKind::Inconclusive => None,
        };
        if let Some((severity, message)) = finding {
            warnings.push(DataQualityWarning::new(severity, Some(&col.header), message));
        }
    }

    if !subjective.is_empty() {
        let checked: Vec<_> = subjective.iter().take(SUBJECTIVE_CHECKED).collect();
        let numeric = checked
            .iter()
            .filter(|c| {
                table
                    .column(c.index)
                    .find(|v| !v.is_missing())
                    .is_some_and(|v| v.as_number().is_some())
            })
            .count();
        if numeric > 0 {
            warnings.push(DataQualityWarning::new(
                Info,
                None,
                format!("subjective columns hold numeric scores ({numeric}/{})", checked.len()),
            ));
        } else {
            warnings.push(DataQualityWarning::new(
                Error,
                None,
                "subjective columns are not numeric",
            ));
        }
    }

    if objective > 0 {
        warnings.push(DataQualityWarning::new(
            Warning,
            None,
            format!(
                "{objective} objective column(s) hold choice answers (A/B/C/D) and need an answer key; only subjective columns are analyzed"
            ),
        ));
    }

    for w in &warnings {
        if w.severity != Info {
            tracing::warn!(column = w.column.as_deref().unwrap_or("-"), "{}", w.message);
        }
    }

    warnings
}
