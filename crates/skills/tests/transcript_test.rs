use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use datasmith_core::traits::TranscriptFetcher;
use datasmith_skills::YouTubeTranscripts;

const VIDEO: &str = "https://youtu.be/dQw4w9WgXcQ";

/// Serve `app` on an ephemeral port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn fetcher(base: &str) -> YouTubeTranscripts {
    YouTubeTranscripts::new(base, "en", Duration::from_secs(5)).unwrap()
}

async fn watch_page(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    if params.get("v").map(String::as_str) != Some("dQw4w9WgXcQ") {
        return (StatusCode::NOT_FOUND, "unknown video".into());
    }
    let language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(language.starts_with("en"));

    let page = r#"<html><script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"/api/timedtext?v=dQw4w9WgXcQ&lang=de","languageCode":"de"},{"baseUrl":"/api/timedtext?v=dQw4w9WgXcQ&lang=en","languageCode":"en"}]}}};</script></html>"#;
    (StatusCode::OK, page.into())
}

async fn timedtext(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    match params.get("lang").map(String::as_str) {
        Some("en") => (
            StatusCode::OK,
            r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="1.5"> Hello </text><text start="1.5" dur="2">world &amp;amp; more</text></transcript>"#.into(),
        ),
        _ => (StatusCode::OK, "<transcript><text start=\"0\">Hallo</text></transcript>".into()),
    }
}

#[tokio::test]
async fn test_transcript_segments_joined_with_spaces() {
    let app = Router::new()
        .route("/watch", get(watch_page))
        .route("/api/timedtext", get(timedtext));
    let base = spawn(app).await;
    let fetcher = fetcher(&base);

    assert_eq!(fetcher.try_fetch(VIDEO).await.unwrap(), "Hello world & more");
    assert_eq!(
        fetcher.fetch_transcript(VIDEO).await.unwrap(),
        "Hello world & more"
    );
}

#[tokio::test]
async fn test_rate_limited_watch_page() {
    let app = Router::new().route(
        "/watch",
        get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let base = spawn(app).await;
    let fetcher = fetcher(&base);

    let err = fetcher.try_fetch(VIDEO).await.unwrap_err();
    assert_eq!(err.kind(), "TooManyRequests");

    let text = fetcher.fetch_transcript(VIDEO).await.unwrap();
    assert!(text.starts_with("Transcript fetching failed."));
    assert!(text.ends_with("(Specific Error: TooManyRequests)"));
}

#[tokio::test]
async fn test_page_without_caption_tracks() {
    let app = Router::new().route(
        "/watch",
        get(|| async { "<html><script>var ytInitialPlayerResponse = {\"videoDetails\":{}};</script></html>" }),
    );
    let base = spawn(app).await;

    let text = fetcher(&base).fetch_transcript(VIDEO).await.unwrap();
    assert!(text.ends_with("(Specific Error: TranscriptsDisabled)"));
}

#[tokio::test]
async fn test_server_error_is_request_failure() {
    let app = Router::new().route(
        "/watch",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn(app).await;

    let err = fetcher(&base).try_fetch(VIDEO).await.unwrap_err();
    assert_eq!(err.kind(), "RequestFailed");
}

#[tokio::test]
async fn test_non_video_link_makes_no_request() {
    // nothing listens here
    let fetcher = fetcher("http://127.0.0.1:9");

    let text = fetcher
        .fetch_transcript("https://vimeo.com/123456789")
        .await
        .unwrap();
    assert!(text.ends_with("(Specific Error: InvalidVideoUrl)"));
}
