use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExamDeckError {
    #[error("failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("{tool} not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PopplerNotFound { tool: &'static str },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    PopplerFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("page {page} out of range (document has {pages} page(s))")]
    PageOutOfRange { page: usize, pages: usize },

    #[error("failed to load region config from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("invalid region config: {0}")]
    ConfigInvalid(String),

    #[error("cannot generate report, missing:\n{}", .0.iter().map(|m| format!("  - {m}")).collect::<Vec<_>>().join("\n"))]
    Preconditions(Vec<String>),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExamDeckError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ExamDeckError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
