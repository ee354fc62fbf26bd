//! Batch orchestration across a file or directory target.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use tracing::info;
use vtag_gemini::GeminiClient;
use vtag_models::AnalysisResult;

use crate::analyze::analyze_video;
use crate::discover::discover_videos;
use crate::error::{PipelineError, PipelineResult};
use crate::resume::{PriorResults, DEFAULT_RESULTS_FILE};

/// Options controlling a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Base inter-item wait in seconds; a random 1-3s pacing offset is
    /// added between videos to avoid rate limiting.
    pub wait_base_secs: u64,
    /// Reprocess videos that already have results in the results file.
    pub force_retry: bool,
    /// Restrict a directory batch to files with this exact name.
    pub specific: Option<String>,
    /// Location of the prior results CSV consulted for resume.
    pub results_path: PathBuf,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            wait_base_secs: 5,
            force_retry: false,
            specific: None,
            results_path: PathBuf::from(DEFAULT_RESULTS_FILE),
        }
    }
}

/// Process a single video file or a directory of videos.
///
/// Files are processed strictly sequentially in enumeration order; fresh
/// results come first, followed by results reconstituted from the prior
/// CSV. A target that is neither an existing file nor a directory is the
/// batch-level fatal outcome, reported in place of results.
pub async fn run_batch(
    client: &GeminiClient,
    target: &Path,
    options: &BatchOptions,
) -> PipelineResult<Vec<AnalysisResult>> {
    if target.is_file() {
        // Single file: validation is deferred to the analysis step.
        return Ok(vec![analyze_video(client, target).await]);
    }
    if !target.is_dir() {
        return Err(PipelineError::PathNotFound(target.display().to_string()));
    }

    let mut videos = discover_videos(target, options.specific.as_deref());
    info!("Found {} video files to process.", videos.len());

    let prior = if options.force_retry {
        PriorResults::default()
    } else {
        PriorResults::load(&options.results_path)
    };
    if !prior.is_empty() {
        videos.retain(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|name| !prior.contains(name))
                .unwrap_or(true)
        });
        info!(
            "After filtering, {} videos remain to be processed.",
            videos.len()
        );
    }

    let mut results = Vec::with_capacity(videos.len() + prior.len());
    let total = videos.len();
    for (i, path) in videos.iter().enumerate() {
        results.push(analyze_video(client, path).await);

        if i < total - 1 {
            let delay = Duration::from_secs_f64(
                options.wait_base_secs as f64 + rand::rng().random_range(1.0..3.0),
            );
            info!(
                "Waiting {:.2} seconds before processing the next video...",
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
        }
    }

    results.extend(prior.into_results());
    Ok(results)
}
