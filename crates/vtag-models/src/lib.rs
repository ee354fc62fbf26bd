//! Shared data models for the vtag pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Per-video analysis results (success or failure)
//! - Typed parsing and repair of the two-field annotation template

pub mod annotation;
pub mod result;

// Re-export common types
pub use annotation::Annotation;
pub use result::AnalysisResult;
