//! Gemini Files API and content-generation client.

use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GeminiError, GeminiResult};
use crate::retry::{retry_async, RetryConfig};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for video annotation unless overridden via `GEMINI_MODEL`.
pub const DEFAULT_MODEL: &str = "gemini-2.0-pro-exp-02-05";

/// Maximum wall-clock time to wait for an uploaded file to become active.
pub const MAX_PROCESSING_WAIT: Duration = Duration::from_secs(600);

/// Interval between file state queries while polling.
pub const PROCESSING_CHECK_INTERVAL: Duration = Duration::from_secs(10);

/// Instruction prompt sent alongside the uploaded video.
const ANALYSIS_PROMPT: &str = r#"
Given a short video description based on your observation of this video, generate:
1. A concise description (1 sentence, max 15 words) capturing the video's key visual and emotional elements.
2. A list of 2-5 tags (single words or short phrases) for filtering and context, focusing on appearance, emotion, and setting.

Example Input: "A man confidently speaking outdoors"
Example Output:
- Description: "A confident man speaking in an outdoor environment."
- Tags: ["man", "confident", "outdoor", "speaking"]

Provide the output in this format:
- Description: [your description]
- Tags: [tag1, tag2, tag3, ...]
"#;

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for the generative-language API.
    pub api_key: String,
    /// Endpoint base URL (overridable for tests).
    pub base_url: String,
    /// Model id used for generation.
    pub model: String,
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> GeminiResult<Self> {
        Ok(Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| GeminiError::config_error("GEMINI_API_KEY not set"))?,
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}

/// Processing state of an uploaded file as reported by the Files API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    /// Still being processed remotely.
    #[serde(rename = "PROCESSING", alias = "STATE_UNSPECIFIED")]
    Pending,
    /// Ready for inference.
    Active,
    /// Remote processing failed; the file is unusable.
    Failed,
    /// Any state this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// Handle to a file uploaded to the Files API.
///
/// Discarded after inference completes or fails; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiFile {
    /// Resource name, e.g. `files/abc123`.
    pub name: String,
    /// Dereferenceable media URI once the file is active.
    #[serde(default)]
    pub uri: Option<String>,
    /// Current processing state.
    #[serde(default = "FileState::unknown")]
    pub state: FileState,
}

impl FileState {
    fn unknown() -> Self {
        Self::Unknown
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: GeminiFile,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
struct FileData {
    #[serde(rename = "fileUri")]
    file_uri: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini API client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new client from configuration.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> GeminiResult<Self> {
        Ok(Self::new(GeminiConfig::from_env()?))
    }

    /// Upload a local video to the Files API (single attempt).
    pub async fn upload_file(&self, path: &Path) -> GeminiResult<GeminiFile> {
        let url = format!(
            "{}/upload/v1beta/files?key={}",
            self.config.base_url, self.config.api_key
        );
        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video")
            .to_string();

        info!("Uploading video to File API: {}", path.display());

        let bytes = tokio::fs::read(path).await?;
        let metadata = serde_json::json!({ "file": { "display_name": display_name } });
        let form = multipart::Form::new()
            .part(
                "metadata",
                multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(|e| GeminiError::upload_failed(e.to_string()))?,
            )
            .part(
                "file",
                multipart::Part::bytes(bytes)
                    .file_name(display_name)
                    .mime_str(video_mime_type(path))
                    .map_err(|e| GeminiError::upload_failed(e.to_string()))?,
            );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GeminiError::upload_failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::upload_failed(format!(
                "File API returned {status}: {body}"
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::upload_failed(e.to_string()))?;

        info!("Upload complete. File ID: {}", upload.file.name);
        Ok(upload.file)
    }

    /// Upload with the shared retry policy (3 retries, 2s base + jitter).
    pub async fn upload_with_retry(&self, path: &Path) -> GeminiResult<GeminiFile> {
        let config = RetryConfig::new("upload_file");
        retry_async(&config, || self.upload_file(path)).await
    }

    /// Query the current state of an uploaded file.
    pub async fn get_file(&self, name: &str) -> GeminiResult<GeminiFile> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.config.base_url, name, self.config.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeminiError::state_query_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeminiError::state_query_failed(format!(
                "File API returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GeminiError::state_query_failed(e.to_string()))
    }

    /// Poll until the uploaded file reaches an active state.
    ///
    /// Terminal outcomes: active (success), remote failure, timeout once
    /// elapsed wall-clock time exceeds `max_wait`. A query error is an
    /// immediate failure, not retried.
    pub async fn wait_for_active(
        &self,
        file: &GeminiFile,
        max_wait: Duration,
        check_interval: Duration,
    ) -> GeminiResult<GeminiFile> {
        info!("Waiting for video processing to complete...");
        let start = Instant::now();

        loop {
            let elapsed = start.elapsed();
            if elapsed > max_wait {
                return Err(GeminiError::ProcessingTimeout(elapsed.as_secs_f64()));
            }

            let updated = self.get_file(&file.name).await?;
            match updated.state {
                FileState::Active => {
                    info!(
                        "Video processing complete after {:.1} seconds",
                        elapsed.as_secs_f64()
                    );
                    return Ok(updated);
                }
                FileState::Failed => {
                    return Err(GeminiError::ProcessingFailed("FAILED".to_string()));
                }
                _ => {
                    debug!("Still processing... ({:.1}s elapsed)", elapsed.as_secs_f64());
                    tokio::time::sleep(check_interval).await;
                }
            }
        }
    }

    /// One `generateContent` call for an active file.
    ///
    /// An empty or whitespace-only reply is [`GeminiError::EmptyResponse`],
    /// which callers retry with backoff.
    pub async fn generate_annotation(&self, file: &GeminiFile) -> GeminiResult<String> {
        let file_uri = file
            .uri
            .clone()
            .ok_or_else(|| GeminiError::generate_failed("file has no media URI"))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    ContentPart::FileData {
                        file_data: FileData {
                            file_uri,
                            mime_type: "video/mp4".to_string(),
                        },
                    },
                    ContentPart::Text {
                        text: ANALYSIS_PROMPT.to_string(),
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::generate_failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::generate_failed(format!(
                "Gemini API returned {status}: {body}"
            )));
        }

        let generate: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::generate_failed(e.to_string()))?;

        let text = generate
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }

        Ok(text)
    }
}

/// MIME type for an allow-listed video extension; mp4 when unknown.
fn video_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "flv" => "video/x-flv",
        "mpeg" | "mpg" => "video/mpeg",
        "webm" => "video/webm",
        "wmv" => "video/x-ms-wmv",
        "3gp" => "video/3gpp",
        _ => "video/mp4",
    }
}
