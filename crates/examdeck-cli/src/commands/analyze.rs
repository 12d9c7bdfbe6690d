use examdeck_core::error::ExamDeckError;
use std::path::{Path, PathBuf};

use crate::output;

pub fn run(
    sheet: &Path,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), ExamDeckError> {
    let scoresheet = examdeck_core::load_scoresheet(sheet)?;
    let Some(result) = scoresheet.analyze() else {
        eprintln!("Score sheet has no columns, nothing to analyze.");
        return Ok(());
    };

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            std::fs::write(&path, output::json::to_string(&result)?)?;
            eprintln!(
                "Analyzed {} question(s) for {} student(s), written to {}",
                result.questions.len(),
                result.student_count,
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&result)?,
            _ => {
                output::table::print_warnings(&scoresheet.warnings);
                output::table::print_analysis(&result);
            }
        },
    }

    Ok(())
}
