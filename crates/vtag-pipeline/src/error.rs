//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Invalid output format: {0}")]
    InvalidFormat(String),

    #[error("Formatting failed: {0}")]
    FormatFailed(String),

    #[error("Gemini error: {0}")]
    Gemini(#[from] vtag_gemini::GeminiError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn format_failed(msg: impl Into<String>) -> Self {
        Self::FormatFailed(msg.into())
    }
}
