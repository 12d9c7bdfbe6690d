use examdeck_core::layout::columns::IdentitySource;
use examdeck_core::regions::Region;
use examdeck_core::scoring::outcome::{AnalysisResult, ScoredColumns};
use examdeck_core::validate::{DataQualityWarning, WarningSeverity};
use examdeck_core::ScoresheetSummary;

pub fn print_summary(summary: &ScoresheetSummary) {
    println!("=== {} ===\n", summary.source.display());

    match summary.header_row {
        Some(row) => println!("  Header row: {} (name marker found)", row + 1),
        None => println!("  Header row: 1 (no name marker, first row used)"),
    }
    println!("  Students:   {}", summary.student_count);
    println!("  Questions:  {}", summary.question_count);
    println!();

    let c = &summary.classification;
    match (&c.identity, c.identity_source) {
        (Some(id), Some(IdentitySource::Fallback)) => {
            println!("  Name column:  {} (positional fallback)", id)
        }
        (Some(id), _) => println!("  Name column:  {}", id),
        (None, _) => println!("  Name column:  (none)"),
    }
    println!("  Objective:    {}", join_headers(&c.objective));
    println!("  Subjective:   {}", join_headers(&c.subjective));
    println!();

    print_warnings(&summary.warnings);
}

pub fn print_warnings(warnings: &[DataQualityWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("  Data checks:");
    for w in warnings {
        let column = match &w.column {
            Some(col) => format!("[{col}] "),
            None => String::new(),
        };
        println!("    {:<7} {}{}", severity_label(w.severity), column, w.message);
    }
    println!();
}

pub fn print_analysis(result: &AnalysisResult) {
    let scope = match result.scored_columns {
        ScoredColumns::Subjective => "subjective columns",
        ScoredColumns::AllQuestions => "all question columns (no subjective columns found)",
    };
    println!(
        "=== Analysis: {} student(s), scored {} ===\n",
        result.student_count, scope
    );
    println!("  Name column: {}\n", result.identity);

    if result.questions.is_empty() {
        println!("  No question columns found.");
        return;
    }

    let max_header = result
        .questions
        .values()
        .map(|q| q.column.header.chars().count())
        .max()
        .unwrap_or(10);

    for q in result.questions.values() {
        println!(
            "  Q{:<3} {:<width$}  {:>5.1}%  correct {:>3}  wrong {:>3}",
            q.question_number,
            q.column.header,
            q.correct_rate,
            q.correct_count,
            q.wrong_count,
            width = max_header
        );
        if !q.wrong_student_names.is_empty() {
            println!("        wrong: {}", q.wrong_student_names.join("、"));
        }
    }
    println!();
}

pub fn print_regions(regions: &[Region], next_question: u32) {
    if regions.is_empty() {
        println!("No regions.");
        return;
    }
    for r in regions {
        println!(
            "  Q{:<3} x={:<5} y={:<5} {}x{}",
            r.question_number, r.rect.x, r.rect.y, r.rect.width, r.rect.height
        );
    }
    println!("\n  Next question number: {next_question}");
}

fn join_headers(cols: &[examdeck_core::model::ColumnRef]) -> String {
    if cols.is_empty() {
        return "(none)".to_string();
    }
    cols.iter()
        .map(|c| c.header.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn severity_label(severity: WarningSeverity) -> &'static str {
    match severity {
        WarningSeverity::Info => "info",
        WarningSeverity::Warning => "warning",
        WarningSeverity::Error => "error",
    }
}
