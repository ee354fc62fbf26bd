//! Gemini client error types.

use thiserror::Error;

pub type GeminiResult<T> = Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File state query failed: {0}")]
    StateQueryFailed(String),

    #[error("Video processing failed with state: {0}")]
    ProcessingFailed(String),

    #[error("Timed out after waiting {0:.1} seconds for file processing")]
    ProcessingTimeout(f64),

    #[error("Generation failed: {0}")]
    GenerateFailed(String),

    #[error("Empty response received")]
    EmptyResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeminiError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn state_query_failed(msg: impl Into<String>) -> Self {
        Self::StateQueryFailed(msg.into())
    }

    pub fn generate_failed(msg: impl Into<String>) -> Self {
        Self::GenerateFailed(msg.into())
    }

    /// True for the soft failure that the invoker retries with backoff.
    pub fn is_empty_response(&self) -> bool {
        matches!(self, Self::EmptyResponse)
    }
}
