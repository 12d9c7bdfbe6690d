//! Integration tests for the load → score → crop → report pipeline.
//!
//! Uses a MockRasterizer that returns in-memory pages without invoking
//! pdftoppm, so these tests run without poppler-utils.

use std::cell::Cell;
use std::io::Write;
use std::path::Path;

use examdeck_core::error::ExamDeckError;
use examdeck_core::extraction::{PageRasterizer, RasterPage};
use examdeck_core::layout::HeaderSource;
use examdeck_core::model::CellValue;
use examdeck_core::regions::Rect;
use examdeck_core::report::html::HtmlDeckAssembler;
use examdeck_core::scoring::outcome::ScoredColumns;
use examdeck_core::{load_scoresheet, scoresheet_from_grid, Session, SessionOptions};
use image::{DynamicImage, Rgb, RgbImage};
use rust_decimal_macros::dec;

struct MockRasterizer {
    pages: usize,
    width: u32,
    height: u32,
    renders: Cell<usize>,
}

impl MockRasterizer {
    fn new(pages: usize, width: u32, height: u32) -> Self {
        MockRasterizer {
            pages,
            width,
            height,
            renders: Cell::new(0),
        }
    }
}

impl PageRasterizer for MockRasterizer {
    fn page_count(&self, _pdf_bytes: &[u8]) -> Result<usize, ExamDeckError> {
        Ok(self.pages)
    }

    fn render_page(
        &self,
        _pdf_bytes: &[u8],
        page: usize,
        _scale: f64,
    ) -> Result<RasterPage, ExamDeckError> {
        self.renders.set(self.renders.get() + 1);
        // Mark each page with a different pixel so crops can be told apart.
        let mut img = RgbImage::new(self.width, self.height);
        img.put_pixel(250, 250, Rgb([page as u8 * 40 + 10, 0, 0]));
        Ok(RasterPage {
            image: DynamicImage::ImageRgb8(img),
        })
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn t(s: &str) -> CellValue {
    CellValue::Text(s.into())
}

fn write_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

const SCORES_CSV: &str = "\
2024 期中考试成绩,,,,
学号,姓名,客-1 (满分: 2),主-1 (满分: 2),主-2 (满分: 5)
,,得分,得分,得分
001,Alice,A,2,5
002,Bob,B,0,0
003,Carol,A,-,3
,,,,
004,Dan,C,1,0
";

// ---------------------------------------------------------------------------
// Scenario: header detection, score-label removal and subjective scoring
// ---------------------------------------------------------------------------
#[test]
fn csv_scoresheet_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "scores.csv", SCORES_CSV.as_bytes());

    let sheet = load_scoresheet(&path).unwrap();
    assert_eq!(sheet.header, HeaderSource::Detected(1));
    assert!(sheet.dropped_score_label_row);
    // 6 raw data rows, minus the label row and the blank row
    assert_eq!(sheet.student_count(), 4);
    assert_eq!(sheet.question_count(), 3);

    let result = sheet.analyze().unwrap();
    assert_eq!(result.identity.header, "姓名");
    assert_eq!(result.scored_columns, ScoredColumns::Subjective);
    assert_eq!(result.questions.len(), 2);

    let q1 = &result.questions[&1];
    assert_eq!(q1.column.header, "主-1 (满分: 2)");
    assert_eq!((q1.correct_count, q1.wrong_count), (2, 1));
    assert_eq!(q1.wrong_student_names, vec!["Bob"]);

    let q2 = &result.questions[&2];
    assert_eq!((q2.correct_count, q2.wrong_count), (2, 2));
    assert_eq!(q2.correct_rate, 50.0);
    assert_eq!(q2.wrong_student_names, vec!["Bob", "Dan"]);
}

#[test]
fn zero_is_wrong_and_dash_is_unanswered() {
    let grid = vec![
        vec![t("姓名"), t("主-1 (满分:2)")],
        vec![t("Alice"), CellValue::Number(dec!(2))],
        vec![t("Bob"), CellValue::Number(dec!(0))],
        vec![t("Carol"), t("-")],
    ];
    let sheet = scoresheet_from_grid(Path::new("grid"), &grid);
    let result = sheet.analyze().unwrap();
    let q1 = &result.questions[&1];
    assert_eq!(q1.correct_count, 1);
    assert_eq!(q1.wrong_count, 1);
    assert_eq!(q1.correct_rate, 50.0);
    assert_eq!(q1.wrong_student_names, vec!["Bob"]);
}

#[test]
fn objective_only_sheet_yields_empty_stats() {
    let grid = vec![
        vec![t("姓名"), t("客-1 (满分:1)"), t("客-2 (满分:1)")],
        vec![t("Alice"), t("A"), t("B")],
        vec![t("Bob"), t("C"), t("D")],
    ];
    let sheet = scoresheet_from_grid(Path::new("grid"), &grid);
    let result = sheet.analyze().unwrap();
    assert_eq!(result.scored_columns, ScoredColumns::AllQuestions);
    assert!(result.questions.values().all(|q| q.graded() == 0));
    assert!(result.questions.values().all(|q| q.correct_rate == 0.0));
}

// ---------------------------------------------------------------------------
// Session: page loading, region handling and report generation
// ---------------------------------------------------------------------------
#[test]
fn generate_report_from_pdf_page() {
    let dir = tempfile::tempdir().unwrap();
    let sheet_path = write_file(dir.path(), "scores.csv", SCORES_CSV.as_bytes());
    let pdf_path = write_file(dir.path(), "exam.pdf", b"%PDF-1.4 mock");
    let out = dir.path().join("report.html");

    // 3072x1512 fits the default 1536x756 display box at scale 0.5
    let rasterizer = MockRasterizer::new(2, 3072, 1512);
    let mut session = Session::new(SessionOptions::default());
    session.load_scoresheet(&sheet_path).unwrap();
    let page = session.load_page_source(&pdf_path, &rasterizer).unwrap();
    assert_eq!(page.scale_factor, 0.5);
    assert_eq!(page.page_count, Some(2));
    assert_eq!(page.display_size(), (1536, 756));

    let regions = session.regions_mut();
    assert!(regions.append(Rect::new(100, 100, 50, 50)));
    assert!(!regions.append(Rect::new(0, 0, 10, 10)));
    assert!(regions.append(Rect::new(300, 100, 60, 40)));
    assert!(regions.append(Rect::new(300, 300, 60, 40)));

    let summary = session
        .generate_report(&HtmlDeckAssembler::new(), &out)
        .unwrap();
    assert_eq!(summary.question_slides, 3);
    assert_eq!(summary.backend, "html");
    // only two subjective columns were scored
    assert_eq!(summary.questions_without_stats, vec![3]);

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("共 3 道题目 | 学生人数: 4"));
    assert!(html.contains("Bob、Dan"));
    assert!(html.contains("（暂无统计数据）"));
    assert_eq!(html.matches("data:image/png;base64,").count(), 3);
}

#[test]
fn preconditions_are_reported_together() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::default();
    let err = session
        .generate_report(&HtmlDeckAssembler::new(), &dir.path().join("r.html"))
        .unwrap_err();
    match err {
        ExamDeckError::Preconditions(missing) => assert_eq!(missing.len(), 3),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("r.html").exists());
}

#[test]
fn switching_page_resets_regions() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = write_file(dir.path(), "exam.pdf", b"%PDF-1.4 mock");
    let rasterizer = MockRasterizer::new(3, 800, 600);

    let mut session = Session::default();
    session.load_page(&pdf_path, 0, &rasterizer).unwrap();
    session.regions_mut().append(Rect::new(10, 10, 100, 100));
    session.regions_mut().append(Rect::new(10, 200, 100, 100));
    assert_eq!(session.regions().len(), 2);

    let page = session.load_page(&pdf_path, 2, &rasterizer).unwrap();
    assert_eq!(page.page, Some(2));
    assert_eq!(page.scale_factor, 1.0);
    assert!(session.regions().is_empty());
    assert_eq!(session.regions().next_question_number(), 1);
    assert_eq!(rasterizer.renders.get(), 2);
}

#[test]
fn page_out_of_range_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = write_file(dir.path(), "exam.pdf", b"%PDF-1.4 mock");
    let rasterizer = MockRasterizer::new(1, 800, 600);

    let mut session = Session::default();
    session.load_page(&pdf_path, 0, &rasterizer).unwrap();
    session.regions_mut().append(Rect::new(10, 10, 100, 100));

    let err = session.load_page(&pdf_path, 5, &rasterizer).unwrap_err();
    assert!(matches!(
        err,
        ExamDeckError::PageOutOfRange { page: 5, pages: 1 }
    ));
    assert_eq!(session.regions().len(), 1);
    assert_eq!(session.page().and_then(|p| p.page), Some(0));
}

#[test]
fn regions_survive_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = write_file(dir.path(), "midterm.pdf", b"%PDF-1.4 mock");
    let rasterizer = MockRasterizer::new(1, 800, 600);

    let mut session = Session::default();
    session.load_page_source(&pdf_path, &rasterizer).unwrap();
    session.regions_mut().append(Rect::new(10, 10, 100, 100));
    session.regions_mut().append(Rect::new(10, 200, 100, 100));
    let saved = session.save_regions(None).unwrap();
    assert_eq!(saved, dir.path().join("midterm_config.json"));

    session.regions_mut().clear();
    session.load_regions(&saved).unwrap();
    assert_eq!(session.regions().len(), 2);
    assert_eq!(session.regions().next_question_number(), 3);

    let broken = write_file(dir.path(), "broken.json", b"[{\"x\": 1}]");
    assert!(matches!(
        session.load_regions(&broken),
        Err(ExamDeckError::Config { .. })
    ));
    assert_eq!(session.regions().len(), 2);
}

#[test]
fn failed_scoresheet_load_keeps_previous() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(dir.path(), "scores.csv", SCORES_CSV.as_bytes());
    let bad = write_file(dir.path(), "scores.xlsx", b"not a workbook");

    let mut session = Session::default();
    session.load_scoresheet(&good).unwrap();
    let err = session.load_scoresheet(&bad).unwrap_err();
    assert!(matches!(err, ExamDeckError::Load { .. }));
    assert_eq!(
        session.scoresheet().map(|s| s.source.clone()),
        Some(good)
    );
}
