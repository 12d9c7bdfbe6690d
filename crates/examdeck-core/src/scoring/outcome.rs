use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ColumnRef;

/// Correctness tally for one question column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScoreRecord {
    /// 1-based position within the scored column list.
    pub question_number: u32,
    /// Column the tally was computed from.
    pub column: ColumnRef,
    pub correct_count: usize,
    pub wrong_count: usize,
    /// Percentage of gradable responses that were correct, 0 when none.
    pub correct_rate: f64,
    /// Students who scored zero, in row order.
    pub wrong_student_names: Vec<String>,
}

impl QuestionScoreRecord {
    pub fn new(question_number: u32, column: ColumnRef) -> Self {
        QuestionScoreRecord {
            question_number,
            column,
            correct_count: 0,
            wrong_count: 0,
            correct_rate: 0.0,
            wrong_student_names: Vec::new(),
        }
    }

    /// Number of gradable (numeric) responses.
    pub fn graded(&self) -> usize {
        self.correct_count + self.wrong_count
    }
}

/// Which columns were scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoredColumns {
    /// Only the subjective columns.
    Subjective,
    /// No subjective columns were found, so every question column was tried.
    AllQuestions,
}

/// Full analysis result for one score sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub identity: ColumnRef,
    pub scored_columns: ScoredColumns,
    pub student_count: usize,
    pub questions: BTreeMap<u32, QuestionScoreRecord>,
}
