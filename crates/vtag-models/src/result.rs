//! Per-video analysis results.

use serde::{Deserialize, Serialize};

/// Outcome of analyzing a single video file.
///
/// Serialized untagged so the JSON output keeps the flat
/// `{"filename": .., "response": ..}` / `{"filename": .., "error": ..}`
/// shape expected by downstream consumers of the results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    /// The model produced a (possibly repaired) annotation text.
    Success { filename: String, response: String },
    /// A pipeline stage failed for this file; the batch continues.
    Failure { filename: String, error: String },
}

impl AnalysisResult {
    pub fn success(filename: impl Into<String>, response: impl Into<String>) -> Self {
        Self::Success {
            filename: filename.into(),
            response: response.into(),
        }
    }

    pub fn failure(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failure {
            filename: filename.into(),
            error: error.into(),
        }
    }

    /// File name this result belongs to.
    pub fn filename(&self) -> &str {
        match self {
            Self::Success { filename, .. } | Self::Failure { filename, .. } => filename,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serializes_flat() {
        let result = AnalysisResult::success("clip.mp4", "- Description: A lake.");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["filename"], "clip.mp4");
        assert_eq!(json["response"], "- Description: A lake.");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_serializes_flat() {
        let result = AnalysisResult::failure("clip.mp4", "upload failed");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["filename"], "clip.mp4");
        assert_eq!(json["error"], "upload failed");
        assert!(json.get("response").is_none());
    }

    #[test]
    fn test_roundtrip() {
        let results = vec![
            AnalysisResult::success("a.mp4", "text"),
            AnalysisResult::failure("b.mp4", "timeout"),
        ];
        let json = serde_json::to_string(&results).unwrap();
        let back: Vec<AnalysisResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }
}
