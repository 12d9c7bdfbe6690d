pub mod outcome;

use std::collections::BTreeMap;

use crate::layout::columns::Classification;
use crate::model::{CellValue, ColumnRef, Table};
use outcome::{AnalysisResult, QuestionScoreRecord, ScoredColumns};

/// Identity values that are residual header rows, not students.
const HEADER_ECHO_TOKENS: &[&str] = &["姓名", "学生", "name", "Name"];

/// Cell texts meaning the student did not answer.
const UNANSWERED_TOKENS: &[&str] = &["-", "", "nan", "NaN"];

/// Subjective columns when there are any, otherwise all question columns.
pub fn select_score_columns(classification: &Classification) -> (Vec<ColumnRef>, ScoredColumns) {
    if classification.subjective.is_empty() {
        tracing::warn!(
            columns = classification.questions.len(),
            "no subjective columns, scoring all question columns (choice answers will be skipped)"
        );
        (classification.questions.clone(), ScoredColumns::AllQuestions)
    } else {
        (classification.subjective.clone(), ScoredColumns::Subjective)
    }
}

/// Score each column; question numbers are 1-based positions in `columns`.
pub fn score_questions(
    table: &Table,
    identity: &ColumnRef,
    columns: &[ColumnRef],
) -> BTreeMap<u32, QuestionScoreRecord> {
    columns
        .iter()
        .zip(1u32..)
        .map(|(col, qnum)| (qnum, score_column(table, identity, col, qnum)))
        .collect()
}

/// Tally one question column.
///
/// Rows without a student name, residual header rows and unanswered cells
/// are skipped. A numeric zero is wrong, any other number is correct, and
/// non-numeric answers (choice letters) are not counted at all because
/// they cannot be graded without an answer key.
pub fn score_column(
    table: &Table,
    identity: &ColumnRef,
    column: &ColumnRef,
    question_number: u32,
) -> QuestionScoreRecord {
    let mut record = QuestionScoreRecord::new(question_number, column.clone());
    let mut ungradable = 0usize;

    for row in table.rows() {
        let Some(name) = student_name(row.get(identity.index)) else {
            continue;
        };

        let cell = row.get(column.index).unwrap_or(&CellValue::Missing);
        let text = cell.to_string();
        if UNANSWERED_TOKENS.contains(&text.trim()) {
            continue;
        }

        match cell.as_number() {
            Some(score) if score.is_zero() => {
                record.wrong_count += 1;
                record.wrong_student_names.push(name);
            }
            Some(_) => record.correct_count += 1,
            None => ungradable += 1,
        }
    }

    record.correct_rate = correct_rate(record.correct_count, record.wrong_count);

    tracing::debug!(
        question = question_number,
        column = %column,
        correct = record.correct_count,
        wrong = record.wrong_count,
        ungradable,
        rate = record.correct_rate,
        "scored question"
    );
    record
}

/// `100 * correct / (correct + wrong)`, or 0 with no gradable responses.
pub fn correct_rate(correct: usize, wrong: usize) -> f64 {
    let total = correct + wrong;
    if total == 0 {
        0.0
    } else {
        100.0 * correct as f64 / total as f64
    }
}

fn student_name(cell: Option<&CellValue>) -> Option<String> {
    let cell = cell?;
    if cell.is_missing() {
        return None;
    }
    let name = cell.to_string().trim().to_string();
    if name.is_empty() || HEADER_ECHO_TOKENS.contains(&name.as_str()) {
        return None;
    }
    Some(name)
}

/// Classify-then-score for a loaded table.
///
/// Returns `None` only when the table has no columns at all.
pub fn analyze(table: &Table, classification: &Classification) -> Option<AnalysisResult> {
    let identity = classification.identity.clone()?;
    let (columns, scored_columns) = select_score_columns(classification);
    let questions = score_questions(table, &identity, &columns);

    tracing::info!(
        questions = questions.len(),
        students = table.row_count(),
        "analysis complete"
    );

    Some(AnalysisResult {
        identity,
        scored_columns,
        student_count: table.row_count(),
        questions,
    })
}
