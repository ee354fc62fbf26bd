//! Gemini API client for video annotation.
//!
//! Covers the three remote operations of the pipeline:
//! - Files API upload of a local video
//! - File state queries and readiness polling
//! - Multimodal `generateContent` invocation with the annotation prompt
//!
//! All network steps share one retry policy with exponential backoff and
//! jitter (see [`retry`]).

pub mod client;
pub mod error;
pub mod retry;

pub use client::{
    FileState, GeminiClient, GeminiConfig, GeminiFile, DEFAULT_MODEL, MAX_PROCESSING_WAIT,
    PROCESSING_CHECK_INTERVAL,
};
pub use error::{GeminiError, GeminiResult};
