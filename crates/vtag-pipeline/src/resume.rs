//! Prior-results index for resuming a directory batch.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};
use vtag_models::{annotation, AnalysisResult};

/// Default location of the tabular results file.
pub const DEFAULT_RESULTS_FILE: &str = "results.csv";

/// Read-once index of previously processed videos.
///
/// Built from the existing results CSV before a directory batch starts and
/// never written mid-run. Only rows whose description and tags columns are
/// both non-empty count as processed; error rows are reprocessed.
#[derive(Debug, Default)]
pub struct PriorResults {
    processed: HashSet<String>,
    results: Vec<AnalysisResult>,
}

impl PriorResults {
    /// Load the index from an existing results CSV.
    ///
    /// A missing or malformed file yields an empty index; resume state is
    /// best-effort and never aborts the batch.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        info!(
            "Found previous results at {}. Checking for already processed videos...",
            path.display()
        );
        match Self::read_csv(path) {
            Ok(index) => index,
            Err(e) => {
                warn!("Error reading previous results: {e}");
                Self::default()
            }
        }
    }

    fn read_csv(path: &Path) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let mut index = Self::default();

        for record in reader.records() {
            let record = record?;
            let filename = record.get(0).unwrap_or("").trim();
            let description = record.get(1).unwrap_or("").trim();
            let tags = record.get(2).unwrap_or("").trim();

            if filename.is_empty() || description.is_empty() || tags.is_empty() {
                continue;
            }

            info!("Skipping already processed video: {filename}");
            index.processed.insert(filename.to_string());
            index.results.push(AnalysisResult::success(
                filename,
                annotation::reconstitute(description, tags),
            ));
        }

        Ok(index)
    }

    /// Whether a file name already has a fully-populated prior result.
    pub fn contains(&self, filename: &str) -> bool {
        self.processed.contains(filename)
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    /// Reconstituted results, in the order they were read from the file.
    pub fn into_results(self) -> Vec<AnalysisResult> {
        self.results
    }
}
