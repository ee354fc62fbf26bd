//! Sequential video tagging pipeline.
//!
//! Resolves a file or directory target into a list of videos, consults the
//! prior results CSV to skip already-processed entries, drives each
//! remaining file through validate → upload → poll → generate, and renders
//! the aggregated results as JSON, CSV, or plain text.

pub mod analyze;
pub mod batch;
pub mod discover;
pub mod error;
pub mod format;
pub mod resume;
pub mod validate;

pub use batch::{run_batch, BatchOptions};
pub use error::{PipelineError, PipelineResult};
pub use format::{format_results, OutputFormat};
