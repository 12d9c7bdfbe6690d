//! Slide geometry for the 16:9 deck, in inches.

use serde::Serialize;

use crate::scoring::outcome::QuestionScoreRecord;

pub const SLIDE_WIDTH: f64 = 13.333;
pub const SLIDE_HEIGHT: f64 = 7.5;

/// Area the question image is fitted into (inside the white image card).
pub const IMAGE_FRAME: Frame = Frame {
    left: 0.5,
    top: 0.9,
    width: 12.3,
    height: 3.8,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Largest placement of a `img_width` x `img_height` picture inside
/// `frame` with the aspect ratio kept, centered. `None` for empty images.
pub fn fit_picture(img_width: u32, img_height: u32, frame: &Frame) -> Option<Frame> {
    if img_width == 0 || img_height == 0 {
        return None;
    }
    let img_aspect = img_width as f64 / img_height as f64;
    let frame_aspect = frame.width / frame.height;

    let (width, height) = if img_aspect > frame_aspect {
        (frame.width, frame.width / img_aspect)
    } else {
        (frame.height * img_aspect, frame.height)
    };

    Some(Frame {
        left: frame.left + (frame.width - width) / 2.0,
        top: frame.top + (frame.height - height) / 2.0,
        width,
        height,
    })
}

/// Color band of the statistics bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RateBand {
    /// 80% and above.
    Good,
    /// 60% to below 80%.
    Fair,
    Poor,
}

impl RateBand {
    pub fn from_rate(rate: f64) -> RateBand {
        if rate >= 80.0 {
            RateBand::Good
        } else if rate >= 60.0 {
            RateBand::Fair
        } else {
            RateBand::Poor
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RateBand::Good => "#2ecc71",
            RateBand::Fair => "#f1c40f",
            RateBand::Poor => "#e74c3c",
        }
    }
}

pub fn title_text() -> &'static str {
    "试卷分析报告"
}

pub fn subtitle_text(question_count: usize, student_count: usize) -> String {
    format!("共 {question_count} 道题目 | 学生人数: {student_count}")
}

pub fn question_title(question_number: u32) -> String {
    format!("第 {question_number} 题")
}

pub fn stats_text(record: &QuestionScoreRecord) -> String {
    format!(
        "正确率: {:.1}%  |  答对: {}人  |  答错: {}人",
        record.correct_rate, record.correct_count, record.wrong_count
    )
}

pub const WRONG_LIST_TITLE: &str = "答错学生名单：";
pub const ALL_CORRECT_TEXT: &str = "全部答对！";
pub const NO_STATS_TEXT: &str = "（暂无统计数据）";

/// Wrong-student names joined for display, or `None` when everyone was right.
pub fn wrong_students_text(record: &QuestionScoreRecord) -> Option<String> {
    if record.wrong_student_names.is_empty() {
        None
    } else {
        Some(record.wrong_student_names.join("、"))
    }
}

pub fn footer_text(question_number: u32, total: usize) -> String {
    format!("{question_number}/{total}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnRef;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fit_wide_image() {
        // 4:1 is wider than the frame, so width is the limit
        let p = fit_picture(400, 100, &IMAGE_FRAME).unwrap();
        assert!(approx(p.width, 12.3));
        assert!(approx(p.height, 12.3 / 4.0));
        assert!(approx(p.left, 0.5));
        assert!(approx(p.top, 0.9 + (3.8 - 12.3 / 4.0) / 2.0));
    }

    #[test]
    fn test_fit_tall_image() {
        let p = fit_picture(100, 200, &IMAGE_FRAME).unwrap();
        assert!(approx(p.height, 3.8));
        assert!(approx(p.width, 1.9));
        assert!(approx(p.left, 0.5 + (12.3 - 1.9) / 2.0));
        assert!(approx(p.width / p.height, 0.5));
    }

    #[test]
    fn test_fit_empty_image() {
        assert!(fit_picture(0, 10, &IMAGE_FRAME).is_none());
    }

    #[test]
    fn test_rate_band() {
        assert_eq!(RateBand::from_rate(80.0), RateBand::Good);
        assert_eq!(RateBand::from_rate(79.9), RateBand::Fair);
        assert_eq!(RateBand::from_rate(60.0), RateBand::Fair);
        assert_eq!(RateBand::from_rate(0.0), RateBand::Poor);
    }

    #[test]
    fn test_stats_text() {
        let record = QuestionScoreRecord {
            question_number: 1,
            column: ColumnRef {
                index: 1,
                header: "主-1".into(),
            },
            correct_count: 2,
            wrong_count: 1,
            correct_rate: 200.0 / 3.0,
            wrong_student_names: vec!["Bob".into(), "Carol".into()],
        };
        assert_eq!(stats_text(&record), "正确率: 66.7%  |  答对: 2人  |  答错: 1人");
        assert_eq!(wrong_students_text(&record).as_deref(), Some("Bob、Carol"));
    }
}
