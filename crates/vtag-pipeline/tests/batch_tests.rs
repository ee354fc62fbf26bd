//! End-to-end batch tests against a mock Gemini server.

use std::fs;
use std::path::Path;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vtag_gemini::{GeminiClient, GeminiConfig};
use vtag_models::AnalysisResult;
use vtag_pipeline::{run_batch, BatchOptions, PipelineError};

fn test_client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        model: "test-model".to_string(),
    })
}

fn write_video(path: &Path) {
    fs::write(path, b"opaque video payload, large enough").unwrap();
}

async fn mount_happy_path(server: &MockServer, uploads: u64) {
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "file": {
                "name": "files/fresh",
                "uri": format!("{}/media/fresh", server.uri()),
                "state": "ACTIVE",
            }
        })))
        .expect(uploads)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/fresh",
            "uri": format!("{}/media/fresh", server.uri()),
            "state": "ACTIVE",
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "- Description: A calm lake.\n- Tags: [calm, lake]" }]
                }
            }]
        })))
        .expect(uploads)
        .mount(server)
        .await;
}

#[tokio::test]
async fn prior_results_skip_processed_videos() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    write_video(&dir.path().join("video1.mp4"));
    write_video(&dir.path().join("video2.mp4"));

    let state_dir = tempfile::tempdir().unwrap();
    let results_path = state_dir.path().join("results.csv");
    fs::write(
        &results_path,
        "Filename,Description,Tags\nvideo1.mp4,A prior description.,\"[prior, tags]\"\n",
    )
    .unwrap();

    let options = BatchOptions {
        wait_base_secs: 0,
        results_path,
        ..Default::default()
    };
    let results = run_batch(&test_client(&server), dir.path(), &options)
        .await
        .unwrap();

    // Fresh result first, reconstituted prior result appended after it.
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].filename(), "video2.mp4");
    assert!(results[0].is_success());
    match &results[1] {
        AnalysisResult::Success { filename, response } => {
            assert_eq!(filename, "video1.mp4");
            assert_eq!(
                response,
                "- Description: A prior description.\n- Tags: [prior, tags]"
            );
        }
        other => panic!("expected reconstituted success, got {other:?}"),
    }
}

#[tokio::test]
async fn force_retry_reprocesses_everything() {
    let server = MockServer::start().await;
    mount_happy_path(&server, 2).await;

    let dir = tempfile::tempdir().unwrap();
    write_video(&dir.path().join("video1.mp4"));
    write_video(&dir.path().join("video2.mp4"));

    let state_dir = tempfile::tempdir().unwrap();
    let results_path = state_dir.path().join("results.csv");
    fs::write(
        &results_path,
        "Filename,Description,Tags\nvideo1.mp4,A prior description.,\"[prior, tags]\"\n",
    )
    .unwrap();

    let options = BatchOptions {
        wait_base_secs: 0,
        force_retry: true,
        results_path,
        ..Default::default()
    };
    let results = run_batch(&test_client(&server), dir.path(), &options)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(AnalysisResult::is_success));
    assert_eq!(results[0].filename(), "video1.mp4");
    assert_eq!(results[1].filename(), "video2.mp4");
}

#[tokio::test]
async fn single_invalid_file_yields_error_result_without_network() {
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let tiny = dir.path().join("tiny.mp4");
    fs::write(&tiny, b"x").unwrap();

    let results = run_batch(&test_client(&server), &tiny, &BatchOptions::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    match &results[0] {
        AnalysisResult::Failure { filename, error } => {
            assert_eq!(filename, "tiny.mp4");
            assert_eq!(error, "Invalid or unsupported video file");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_target_is_fatal() {
    let server = MockServer::start().await;
    let err = run_batch(
        &test_client(&server),
        Path::new("/no/such/target"),
        &BatchOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PipelineError::PathNotFound(_)));
}
