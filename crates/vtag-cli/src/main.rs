//! Batch video tagging CLI.
//!
//! Generates a short description and a set of tags for local video files
//! via the Gemini API and writes the aggregated results as JSON, CSV, or
//! plain text, to stdout or a file.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vtag_gemini::GeminiClient;
use vtag_pipeline::{format_results, run_batch, BatchOptions, OutputFormat};

#[derive(Parser)]
#[command(
    name = "vtag",
    version,
    about = "Generate tags and descriptions for video files using the Gemini API"
)]
struct Cli {
    /// Path to the video file or directory of video files
    #[arg(short, long)]
    video: PathBuf,

    /// Path to output file (if not specified, prints to console)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Initial wait time in seconds between video processing
    #[arg(short, long, default_value_t = 5)]
    wait: u64,

    /// Force retry processing of videos that failed previously
    #[arg(short, long)]
    retry: bool,

    /// Process only a specific video file within a directory
    #[arg(short, long)]
    specific: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
    Txt,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Csv => OutputFormat::Csv,
            Format::Txt => OutputFormat::Txt,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(env_filter)
        .init();

    let cli = Cli::parse();

    // Missing credentials are fatal before any processing begins.
    let client = match GeminiClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!("{e}");
            error!("Please create a .env file with your GEMINI_API_KEY.");
            std::process::exit(1);
        }
    };

    let options = BatchOptions {
        wait_base_secs: cli.wait,
        force_retry: cli.retry,
        specific: cli.specific.clone(),
        ..Default::default()
    };

    let results = run_batch(&client, &cli.video, &options).await?;
    if results.is_empty() {
        info!("No results to display.");
        return Ok(());
    }

    let format = OutputFormat::from(cli.format);
    let rendered = format_results(&results, format)?;

    match cli.output {
        Some(path) => {
            let path = resolve_output_path(path, format);
            std::fs::write(&path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Results saved to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Append the format's extension when the output path has none.
fn resolve_output_path(path: PathBuf, format: OutputFormat) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(format.extension())
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_path_appends_extension() {
        let path = resolve_output_path(PathBuf::from("results"), OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("results.csv"));
    }

    #[test]
    fn test_resolve_output_path_keeps_existing_extension() {
        let path = resolve_output_path(PathBuf::from("results.json"), OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("results.json"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["vtag", "-v", "clips/"]);
        assert_eq!(cli.video, PathBuf::from("clips/"));
        assert_eq!(cli.wait, 5);
        assert!(!cli.retry);
        assert!(cli.specific.is_none());
        assert!(matches!(cli.format, Format::Json));
    }
}
