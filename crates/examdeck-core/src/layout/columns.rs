use serde::{Deserialize, Serialize};

use crate::layout::markers;
use crate::model::{ColumnRef, Table};

/// Role assigned to a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Identity,
    ObjectiveScore,
    SubjectiveScore,
    Ignored,
}

/// How the identity column was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Header contains a name marker.
    Marker,
    /// Positional fallback (third, else second, else first column).
    Fallback,
}

/// Column roles for a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub identity: Option<ColumnRef>,
    pub identity_source: Option<IdentitySource>,
    pub objective: Vec<ColumnRef>,
    pub subjective: Vec<ColumnRef>,
    /// All question columns in table order (objective and subjective).
    pub questions: Vec<ColumnRef>,
    /// Columns whose header carries the full-score marker.
    pub score_columns: Vec<ColumnRef>,
    /// One role per table column, in table order.
    pub roles: Vec<ColumnRole>,
}

/// Classify table columns from their headers alone.
///
/// Rule order: the identity column is picked first (first header with a
/// name marker, else the positional fallback); every other column is a
/// question column if its header has the full-score or question marker or
/// is purely numeric, and then subjective or objective by prefix,
/// defaulting to subjective.
pub fn classify(table: &Table) -> Classification {
    let refs = table.column_refs();

    let marker_identity = refs.iter().position(|c| is_identity_header(&c.header));
    let (identity_idx, identity_source) = match marker_identity {
        Some(i) => (Some(i), Some(IdentitySource::Marker)),
        None => match fallback_identity(refs.len()) {
            Some(i) => (Some(i), Some(IdentitySource::Fallback)),
            None => (None, None),
        },
    };

    let mut roles = Vec::with_capacity(refs.len());
    let mut objective = Vec::new();
    let mut subjective = Vec::new();
    let mut questions = Vec::new();

    for col in &refs {
        let role = if Some(col.index) == identity_idx {
            ColumnRole::Identity
        } else {
            question_role(&col.header)
        };
        match role {
            ColumnRole::ObjectiveScore => objective.push(col.clone()),
            ColumnRole::SubjectiveScore => subjective.push(col.clone()),
            _ => {}
        }
        if matches!(role, ColumnRole::ObjectiveScore | ColumnRole::SubjectiveScore) {
            questions.push(col.clone());
        }
        roles.push(role);
    }

    let score_columns = refs
        .iter()
        .filter(|c| c.header.contains(markers::FULL_SCORE))
        .cloned()
        .collect();

    let identity = identity_idx.and_then(|i| refs.get(i).cloned());
    tracing::info!(
        identity = identity.as_ref().map(|c| c.header.as_str()).unwrap_or("-"),
        source = ?identity_source,
        subjective = subjective.len(),
        objective = objective.len(),
        "classified columns"
    );

    Classification {
        identity,
        identity_source,
        objective,
        subjective,
        questions,
        score_columns,
        roles,
    }
}

/// Headers that mark the student name column.
pub fn is_identity_header(header: &str) -> bool {
    header.contains(markers::NAME)
        || header.to_lowercase().contains(markers::NAME_ASCII)
        || header.contains(markers::STUDENT)
}

/// Third column if there are at least three, else the second, else the first.
fn fallback_identity(column_count: usize) -> Option<usize> {
    match column_count {
        0 => None,
        1 => Some(0),
        2 => Some(1),
        _ => Some(2),
    }
}

fn question_role(header: &str) -> ColumnRole {
    let is_question = header.contains(markers::FULL_SCORE)
        || header.contains(markers::QUESTION)
        || is_numeric_header(header);
    if !is_question {
        return ColumnRole::Ignored;
    }

    let leading = |c: char| header.chars().take(2).any(|h| h == c);
    if header.contains(markers::SUBJECTIVE) || leading(markers::SUBJECTIVE_CHAR) {
        ColumnRole::SubjectiveScore
    } else if header.contains(markers::OBJECTIVE) || leading(markers::OBJECTIVE_CHAR) {
        ColumnRole::ObjectiveScore
    } else {
        ColumnRole::SubjectiveScore
    }
}

/// "3", "1.2", "2-1": digits once dots and dashes are removed.
fn is_numeric_header(header: &str) -> bool {
    let digits: Vec<char> = header.chars().filter(|c| *c != '.' && *c != '-').collect();
    !digits.is_empty() && digits.iter().all(|c| c.is_ascii_digit())
}
