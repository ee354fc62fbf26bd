//! Per-file analysis: validate, upload, poll, generate.

use std::path::Path;

use tracing::{info, warn};
use vtag_gemini::retry::{retry_async, RetryConfig};
use vtag_gemini::{
    GeminiClient, GeminiFile, GeminiResult, MAX_PROCESSING_WAIT, PROCESSING_CHECK_INTERVAL,
};
use vtag_models::{annotation, AnalysisResult};

use crate::validate::{is_valid_video, MIN_VIDEO_SIZE_BYTES};

/// Drive one video through the full pipeline.
///
/// Short-circuits to a stage-specific error result at the first failing
/// stage; errors are data, never panics, so one bad file cannot abort a
/// batch.
pub async fn analyze_video(client: &GeminiClient, path: &Path) -> AnalysisResult {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    if !is_valid_video(path, MIN_VIDEO_SIZE_BYTES) {
        warn!("Invalid or unsupported video file: {}", path.display());
        return AnalysisResult::failure(filename, "Invalid or unsupported video file");
    }

    let size_mb = std::fs::metadata(path)
        .map(|m| m.len() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0);
    info!("Processing video: {} ({size_mb:.2} MB)", path.display());

    let file = match client.upload_with_retry(path).await {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to upload {}: {e}", path.display());
            return AnalysisResult::failure(filename, "Failed to upload video to File API");
        }
    };

    let active = match client
        .wait_for_active(&file, MAX_PROCESSING_WAIT, PROCESSING_CHECK_INTERVAL)
        .await
    {
        Ok(file) => file,
        Err(e) => {
            warn!("Processing did not complete for {}: {e}", path.display());
            return AnalysisResult::failure(filename, "Video processing failed or timed out");
        }
    };

    match generate_with_retry(client, &active).await {
        Ok(text) => {
            let repaired = annotation::canonicalize(&text);
            if repaired != text {
                info!("Successfully reformatted response for {filename}");
            }
            info!("Successfully generated description and tags for {filename}");
            AnalysisResult::success(filename, repaired)
        }
        Err(e) if e.is_empty_response() => {
            AnalysisResult::failure(filename, "Empty response received after multiple attempts")
        }
        Err(e) => AnalysisResult::failure(filename, e.to_string()),
    }
}

/// Invoke generation under the shared retry policy.
///
/// Empty replies and transport errors both count as retryable attempts;
/// the last error surfaces once retries are exhausted.
async fn generate_with_retry(
    client: &GeminiClient,
    file: &GeminiFile,
) -> GeminiResult<String> {
    let config = RetryConfig::new("generate_annotation");
    retry_async(&config, || client.generate_annotation(file)).await
}
