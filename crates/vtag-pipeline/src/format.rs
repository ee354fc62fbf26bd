//! Rendering of the aggregated result list.

use std::fmt;
use std::str::FromStr;

use vtag_models::{AnalysisResult, Annotation};

use crate::error::{PipelineError, PipelineResult};

/// Output serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Txt,
}

impl OutputFormat {
    /// File extension appended to an extensionless output path.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Txt),
            other => Err(PipelineError::InvalidFormat(other.to_string())),
        }
    }
}

/// Render results in the chosen format.
pub fn format_results(
    results: &[AnalysisResult],
    format: OutputFormat,
) -> PipelineResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Csv => format_csv(results),
        OutputFormat::Txt => Ok(format_txt(results)),
    }
}

/// Header + one row per result; standard quoting covers embedded commas.
///
/// Error rows carry `ERROR: {message}` in the description column. Success
/// rows go through [`Annotation::parse`]; when neither field can be
/// recovered both columns stay empty rather than failing the render.
fn format_csv(results: &[AnalysisResult]) -> PipelineResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Filename", "Description", "Tags"])?;

    for result in results {
        match result {
            AnalysisResult::Failure { filename, error } => {
                writer.write_record([filename.as_str(), &format!("ERROR: {error}"), ""])?;
            }
            AnalysisResult::Success { filename, response } => {
                let annotation = Annotation::parse(response);
                writer.write_record([
                    filename.as_str(),
                    annotation.description(),
                    annotation.tags(),
                ])?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::format_failed(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PipelineError::format_failed(e.to_string()))
}

/// Human-readable blocks separated by an 80-dash line.
fn format_txt(results: &[AnalysisResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&format!("File: {}\n", result.filename()));
        match result {
            AnalysisResult::Failure { error, .. } => {
                out.push_str(&format!("Error: {error}\n"));
            }
            AnalysisResult::Success { response, .. } => {
                out.push_str(response);
                out.push('\n');
            }
        }
        out.push_str(&"-".repeat(80));
        out.push('\n');
    }
    out
}
