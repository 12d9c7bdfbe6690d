use std::fmt::Write as _;
use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat};
use quick_xml::escape::escape;

use crate::error::ExamDeckError;
use crate::report::layout::{self, Frame, RateBand, IMAGE_FRAME, SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::report::{Deck, QuestionSlide, ReportAssembler};

const STYLE: &str = r#"
body { margin: 0; background: #444; font-family: "Microsoft YaHei", "PingFang SC", sans-serif; }
.slide { position: relative; overflow: hidden; margin: 0.3in auto; background: #fafafa; page-break-after: always; }
.slide > * { position: absolute; box-sizing: border-box; margin: 0; }
.title-slide { background: #2980b9; }
.title { color: #fff; font-size: 54pt; font-weight: bold; text-align: center; }
.subtitle { color: #ecf0f1; font-size: 20pt; text-align: center; }
.header-bar { background: #3498db; }
.qnum { color: #fff; font-size: 28pt; font-weight: bold; }
.card { background: #fff; border: 1pt solid #bdc3c7; }
.stats { color: #fff; font-size: 18pt; font-weight: bold; }
.wrong-title { color: #34495e; font-size: 18pt; font-weight: bold; }
.wrong-list { color: #e74c3c; font-size: 16pt; line-height: 1.2; }
.all-correct { color: #2ecc71; font-size: 20pt; font-weight: bold; text-align: center; }
.no-stats { color: #95a5a6; font-size: 18pt; font-weight: bold; text-align: center; }
.footer { color: #7f8c8d; font-size: 11pt; text-align: right; }
"#;

/// Writes the deck as one self-contained HTML file, one 16:9 slide per
/// section, with the question images embedded as PNG data URIs.
pub struct HtmlDeckAssembler;

impl HtmlDeckAssembler {
    pub fn new() -> Self {
        HtmlDeckAssembler
    }

    /// Render the whole deck to an HTML string.
    pub fn render(&self, deck: &Deck) -> Result<String, ExamDeckError> {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", layout::title_text());
        let _ = writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>");

        render_title_slide(&mut html, deck);
        for slide in &deck.slides {
            render_question_slide(&mut html, slide, deck.question_count())?;
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

impl Default for HtmlDeckAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportAssembler for HtmlDeckAssembler {
    fn assemble(&self, deck: &Deck, out: &Path) -> Result<(), ExamDeckError> {
        let html = self.render(deck)?;
        std::fs::write(out, html)?;
        tracing::info!(
            path = %out.display(),
            slides = deck.question_count() + 1,
            "report written"
        );
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "html"
    }
}

fn open_slide(html: &mut String, class: &str) {
    let _ = writeln!(
        html,
        "<section class=\"slide {class}\" style=\"width:{SLIDE_WIDTH}in;height:{SLIDE_HEIGHT}in\">"
    );
}

fn boxed(html: &mut String, class: &str, frame: Frame, text: &str) {
    let _ = writeln!(
        html,
        "<div class=\"{class}\" style=\"{}\">{}</div>",
        position(&frame),
        escape(text)
    );
}

fn filled(html: &mut String, class: &str, frame: Frame, color: Option<&str>) {
    let background = color
        .map(|c| format!("background:{c};"))
        .unwrap_or_default();
    let _ = writeln!(
        html,
        "<div class=\"{class}\" style=\"{}{background}\"></div>",
        position(&frame)
    );
}

fn position(f: &Frame) -> String {
    format!(
        "left:{:.3}in;top:{:.3}in;width:{:.3}in;height:{:.3}in;",
        f.left, f.top, f.width, f.height
    )
}

fn frame(left: f64, top: f64, width: f64, height: f64) -> Frame {
    Frame {
        left,
        top,
        width,
        height,
    }
}

fn render_title_slide(html: &mut String, deck: &Deck) {
    open_slide(html, "title-slide");
    boxed(html, "title", frame(2.0, 2.5, 9.333, 1.5), layout::title_text());
    boxed(
        html,
        "subtitle",
        frame(2.0, 4.2, 9.333, 0.8),
        &layout::subtitle_text(deck.question_count(), deck.student_count),
    );
    html.push_str("</section>\n");
}

fn render_question_slide(
    html: &mut String,
    slide: &QuestionSlide,
    total: usize,
) -> Result<(), ExamDeckError> {
    open_slide(html, "question");
    filled(html, "header-bar", frame(0.0, 0.0, SLIDE_WIDTH, 0.6), None);
    boxed(
        html,
        "qnum",
        frame(0.3, 0.05, 2.0, 0.5),
        &layout::question_title(slide.question_number),
    );

    filled(html, "card", frame(0.4, 0.8, 12.5, 4.0), None);
    match layout::fit_picture(slide.image.width(), slide.image.height(), &IMAGE_FRAME) {
        Some(placement) => {
            let _ = writeln!(
                html,
                "<img alt=\"{}\" src=\"data:image/png;base64,{}\" style=\"{}\">",
                escape(layout::question_title(slide.question_number).as_str()),
                png_base64(&slide.image)?,
                position(&placement)
            );
        }
        None => {
            tracing::warn!(question = slide.question_number, "empty crop, no picture placed");
        }
    }

    match &slide.stats {
        Some(stats) => {
            filled(html, "card", frame(0.4, 5.0, 12.5, 2.2), None);
            let band = RateBand::from_rate(stats.correct_rate);
            filled(html, "stats-bar", frame(0.4, 5.0, 12.5, 0.5), Some(band.color()));
            boxed(html, "stats", frame(0.6, 5.05, 12.1, 0.4), &layout::stats_text(stats));
            boxed(html, "wrong-title", frame(0.6, 5.6, 12.1, 0.4), layout::WRONG_LIST_TITLE);
            match layout::wrong_students_text(stats) {
                Some(names) => boxed(html, "wrong-list", frame(0.6, 6.1, 12.1, 1.0), &names),
                None => boxed(
                    html,
                    "all-correct",
                    frame(0.6, 6.1, 12.1, 1.0),
                    layout::ALL_CORRECT_TEXT,
                ),
            }
        }
        None => {
            filled(html, "card", frame(0.4, 5.0, 12.5, 1.2), None);
            boxed(html, "no-stats", frame(0.6, 5.3, 12.1, 0.8), layout::NO_STATS_TEXT);
        }
    }

    boxed(
        html,
        "footer",
        frame(12.5, 7.2, 0.7, 0.25),
        &layout::footer_text(slide.question_number, total),
    );
    html.push_str("</section>\n");
    Ok(())
}

fn png_base64(image: &DynamicImage) -> Result<String, ExamDeckError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(general_purpose::STANDARD.encode(&buf))
}
