use examdeck_core::error::ExamDeckError;
use examdeck_core::extraction::pdftoppm::PdftoppmRasterizer;
use examdeck_core::regions::persist;
use examdeck_core::report::html::HtmlDeckAssembler;
use examdeck_core::report::DEFAULT_REPORT_NAME;
use examdeck_core::{Session, SessionOptions};
use std::path::PathBuf;

use crate::output;

pub struct GenerateArgs {
    pub sheet: PathBuf,
    pub page_source: PathBuf,
    pub regions: Option<PathBuf>,
    /// 1-based page number
    pub page: usize,
    pub out: Option<PathBuf>,
    pub options: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> Result<(), ExamDeckError> {
    let options = match &args.options {
        Some(path) => SessionOptions::load(path)?,
        None => SessionOptions::default(),
    };
    tracing::debug!(?options, "session options");
    let mut session = Session::new(options);

    let sheet = session.load_scoresheet(&args.sheet)?;
    eprintln!(
        "Loaded {}: {} student(s), {} question column(s)",
        args.sheet.display(),
        sheet.student_count(),
        sheet.question_count()
    );
    output::table::print_warnings(&sheet.warnings);

    let rasterizer = PdftoppmRasterizer::new();
    let page = session.load_page(&args.page_source, args.page - 1, &rasterizer)?;
    let (width, height) = page.display_size();
    eprintln!(
        "Page {}x{} shown at {}x{} (scale {:.3})",
        page.image.width(),
        page.image.height(),
        width,
        height,
        page.scale_factor
    );

    let regions_path = args
        .regions
        .unwrap_or_else(|| persist::default_config_path(&args.page_source));
    session.load_regions(&regions_path)?;

    let out = args.out.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_NAME));
    let summary = session.generate_report(&HtmlDeckAssembler::new(), &out)?;

    eprintln!(
        "Wrote {} question slide(s) to {}",
        summary.question_slides,
        summary.path.display()
    );
    if !summary.questions_without_stats.is_empty() {
        let list: Vec<String> = summary
            .questions_without_stats
            .iter()
            .map(|q| format!("Q{q}"))
            .collect();
        eprintln!("  no statistics for: {}", list.join(", "));
    }

    Ok(())
}
