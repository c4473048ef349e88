//! Axum-based HTTP server for the agent.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, MatchedPath, Multipart, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use datasmith_controller::Orchestrator;
use datasmith_core::{
    config::ServerConfig,
    types::{AgentResponse, UploadedFile},
    Error, Result,
};

const CHAT_UI: &str = include_str!("../assets/chat_ui.html");

/// Shared application state.
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Gateway server.
pub struct GatewayServer {
    config: ServerConfig,
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(config: ServerConfig, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            state: Arc::new(AppState { orchestrator }),
            metrics_handle: None,
        }
    }

    /// Set metrics handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/process", post(process_handler))
            .with_state(self.state.clone());

        if let Some(handle) = &self.metrics_handle {
            let handle = handle.clone();
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }

        router
            .layer(middleware::from_fn(track_metrics))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.max_upload_bytes))
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::gateway(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(addr = %addr, "Gateway server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::gateway(format!("Server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Fields of a `/process` form.
#[derive(Debug, Default)]
struct Submission {
    query: String,
    file: Option<UploadedFile>,
}

// =============================================================================
// Handlers
// =============================================================================

async fn index_handler() -> Html<&'static str> {
    Html(CHAT_UI)
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Main entry point: a multipart form with optional `query` and `file`.
async fn process_handler(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<AgentResponse>) {
    let submission = match multipart {
        Ok(multipart) => read_submission(multipart).await,
        Err(rejection) => Err(Error::invalid_request(rejection.body_text())),
    };

    let submission = match submission {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected /process request");
            return (
                StatusCode::BAD_REQUEST,
                Json(AgentResponse::error(e.to_string(), Vec::new())),
            );
        }
    };

    tracing::info!(
        query_length = submission.query.len(),
        filename = submission.file.as_ref().map(|f| f.filename.as_str()),
        "Processing submission"
    );

    let response = state
        .orchestrator
        .run(&submission.query, submission.file)
        .await;
    (StatusCode::OK, Json(response))
}

async fn read_submission(mut multipart: Multipart) -> Result<Submission> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("query") => {
                submission.query = field
                    .text()
                    .await
                    .map_err(|e| Error::invalid_request(e.body_text()))?;
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::invalid_request(e.body_text()))?;

                // Browsers send an empty part when no file was chosen.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                submission.file = Some(UploadedFile::new(filename, bytes));
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown form field");
            }
        }
    }

    Ok(submission)
}

/// Record request count and latency per matched route.
async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    datasmith_telemetry::track_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
