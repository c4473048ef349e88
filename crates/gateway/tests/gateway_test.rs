use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use datasmith_controller::{ExtractorSet, Orchestrator};
use datasmith_core::config::ServerConfig;
use datasmith_core::mocks::{MockExtractor, MockRouter, MockTaskTools, MockTranscriptFetcher};
use datasmith_core::types::{Intent, IntentPlan};
use datasmith_gateway::GatewayServer;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "datasmith-test-boundary";

fn orchestrator(plan: IntentPlan) -> Arc<Orchestrator> {
    Arc::new(
        Orchestrator::builder()
            .with_router(Arc::new(MockRouter::new(plan)))
            .with_tasks(Arc::new(MockTaskTools::new()))
            .with_transcripts(Arc::new(MockTranscriptFetcher::new()))
            .with_extractors(ExtractorSet::new(
                Arc::new(MockExtractor::text("text from image")),
                Arc::new(MockExtractor::failing("Could not parse PDF file")),
                Arc::new(MockExtractor::text("text from audio")),
            ))
            .build()
            .unwrap(),
    )
}

fn app(plan: IntentPlan) -> Router {
    GatewayServer::new(ServerConfig::default(), orchestrator(plan)).build_router()
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn process_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(
        app(IntentPlan::ambiguous()),
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_index_serves_html() {
    let response = app(IntentPlan::ambiguous())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_text_query_completes() {
    let (status, body) = send(
        app(IntentPlan::new(Intent::Sentiment, true)),
        process_request(&[Part::Text("query", "I love this product")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Complete");
    assert_eq!(body["extracted_text"], "I love this product");
    assert_eq!(body["result"], "sentiment result for: I love this product");
    assert_eq!(body["log"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_empty_submission_is_an_error_response() {
    let (status, body) = send(
        app(IntentPlan::ambiguous()),
        process_request(&[Part::Text("query", "  ")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Error");
    assert_eq!(body["extracted_text"], "");
    assert_eq!(body["result"], "Please provide text or upload a file.");
    assert_eq!(body["log"], serde_json::json!(["[1] No input provided."]));
}

#[tokio::test]
async fn test_empty_file_part_counts_as_no_file() {
    let (_, body) = send(
        app(IntentPlan::ambiguous()),
        process_request(&[Part::Text("query", ""), Part::File("file", "", b"")]),
    )
    .await;

    assert_eq!(body["status"], "Error");
    assert_eq!(body["result"], "Please provide text or upload a file.");
}

#[tokio::test]
async fn test_uploaded_image_is_extracted() {
    let (status, body) = send(
        app(IntentPlan::new(Intent::ExtractionOnly, true)),
        process_request(&[Part::File("file", "receipt.png", b"\x89PNG")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Complete");
    assert_eq!(body["extracted_text"], "text from image");
    assert_eq!(body["result"], "Extracted Text: text from image");
}

#[tokio::test]
async fn test_extraction_failure_is_reported_with_ok_status() {
    let (status, body) = send(
        app(IntentPlan::new(Intent::Summarize, true)),
        process_request(&[
            Part::Text("query", "summarize"),
            Part::File("file", "paper.pdf", b"%PDF-1.7"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Error");
    assert_eq!(body["result"], "Extraction failed: Could not parse PDF file");
}

#[tokio::test]
async fn test_ambiguous_request_awaits_clarity() {
    let (_, body) = send(
        app(IntentPlan::ambiguous()),
        process_request(&[Part::Text("query", "here is some text")]),
    )
    .await;

    assert_eq!(body["status"], "Awaiting Clarity");
}

#[tokio::test]
async fn test_non_multipart_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/process")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query": "hi"}"#))
        .unwrap();

    let (status, body) = send(app(IntentPlan::ambiguous()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "Error");
    assert!(body["log"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_upload_is_refused() {
    let config = ServerConfig {
        max_upload_bytes: 64,
        ..ServerConfig::default()
    };
    let app = GatewayServer::new(config, orchestrator(IntentPlan::ambiguous())).build_router();
    let big = vec![b'a'; 1024];

    let response = app
        .oneshot(process_request(&[Part::File("file", "big.png", &big)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_metrics_route_requires_handle() {
    let response = app(IntentPlan::ambiguous())
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
