use examdeck_core::error::ExamDeckError;
use std::path::Path;

use crate::output;

pub fn run(sheet: &Path, output_format: &str) -> Result<(), ExamDeckError> {
    let scoresheet = examdeck_core::load_scoresheet(sheet)?;
    let summary = scoresheet.summary();

    match output_format {
        "json" => output::json::print(&summary)?,
        _ => output::table::print_summary(&summary),
    }

    Ok(())
}
