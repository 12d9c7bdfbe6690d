pub mod html;
pub mod layout;

use std::collections::BTreeMap;
use std::path::Path;

use image::DynamicImage;

use crate::error::ExamDeckError;
use crate::scoring::outcome::QuestionScoreRecord;

/// Default file name of the generated deck.
pub const DEFAULT_REPORT_NAME: &str = "试卷分析报告.html";

/// One question slide: the cropped image and its statistics, if any.
#[derive(Debug, Clone)]
pub struct QuestionSlide {
    pub question_number: u32,
    pub image: DynamicImage,
    /// `None` renders as "no statistics available" rather than failing.
    pub stats: Option<QuestionScoreRecord>,
}

/// Everything a report backend needs.
#[derive(Debug, Clone)]
pub struct Deck {
    pub student_count: usize,
    /// Slides in ascending question-number order.
    pub slides: Vec<QuestionSlide>,
}

impl Deck {
    /// Pair cropped images with statistics by question number.
    pub fn new(
        crops: Vec<(u32, DynamicImage)>,
        stats: &BTreeMap<u32, QuestionScoreRecord>,
        student_count: usize,
    ) -> Deck {
        let mut slides: Vec<QuestionSlide> = crops
            .into_iter()
            .map(|(question_number, image)| {
                let stats = stats.get(&question_number).cloned();
                if stats.is_none() {
                    tracing::warn!(question = question_number, "no statistics for question");
                }
                QuestionSlide {
                    question_number,
                    image,
                    stats,
                }
            })
            .collect();
        slides.sort_by_key(|s| s.question_number);
        Deck {
            student_count,
            slides,
        }
    }

    pub fn question_count(&self) -> usize {
        self.slides.len()
    }
}

/// Trait for report output backends.
pub trait ReportAssembler {
    /// Write the deck as one artifact at `out`.
    fn assemble(&self, deck: &Deck, out: &Path) -> Result<(), ExamDeckError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Gather every missing input for report generation into one error.
pub fn check_preconditions<'a, T, P>(
    table: Option<&'a T>,
    image: Option<&'a P>,
    region_count: usize,
) -> Result<(&'a T, &'a P), ExamDeckError> {
    let mut missing = Vec::new();
    if table.is_none() {
        missing.push("score sheet (load a spreadsheet first)".to_string());
    }
    if image.is_none() {
        missing.push("exam image or PDF page".to_string());
    }
    if region_count == 0 {
        missing.push("question regions (draw at least one rectangle)".to_string());
    }
    match (table, image) {
        (Some(table), Some(image)) if missing.is_empty() => Ok((table, image)),
        _ => Err(ExamDeckError::Preconditions(missing)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnRef;
    use image::RgbImage;

    #[test]
    fn test_preconditions_aggregate() {
        let (table, image) = (1u8, 2u8);
        assert!(check_preconditions(Some(&table), Some(&image), 1).is_ok());
        match check_preconditions::<u8, u8>(None, None, 0) {
            Err(ExamDeckError::Preconditions(missing)) => assert_eq!(missing.len(), 3),
            other => panic!("unexpected: {other:?}"),
        }
        match check_preconditions(Some(&table), Some(&image), 0) {
            Err(ExamDeckError::Preconditions(missing)) => assert_eq!(missing.len(), 1),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_deck_pairs_stats_by_question() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let mut stats = BTreeMap::new();
        stats.insert(
            1,
            QuestionScoreRecord::new(
                1,
                ColumnRef {
                    index: 1,
                    header: "主-1".into(),
                },
            ),
        );
        let deck = Deck::new(vec![(2, img.clone()), (1, img)], &stats, 30);
        assert_eq!(deck.question_count(), 2);
        assert_eq!(deck.slides[0].question_number, 1);
        assert!(deck.slides[0].stats.is_some());
        assert!(deck.slides[1].stats.is_none());
    }
}
