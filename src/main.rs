#![deny(unused)]
//! DataSmith - request-routing agent
//!
//! Accepts text, images, PDFs and audio over HTTP, works out what the user
//! wants and dispatches to the matching task.

use std::sync::Arc;

use datasmith_controller::{ExtractorSet, Orchestrator};
use datasmith_core::config::AppConfig;
use datasmith_gateway::{GatewayServer, LlmIntentRouter};
use datasmith_model_gateway::FallbackModel;
use datasmith_skills::{AudioPlaceholder, ImageOcr, LlmTaskTools, PdfText, YouTubeTranscripts};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize tracing
    datasmith_telemetry::configure_tracing(&config.telemetry)?;

    tracing::info!("Starting DataSmith v{}", env!("CARGO_PKG_VERSION"));

    // =========================================================================
    // Model access
    // =========================================================================
    let model = Arc::new(FallbackModel::from_config(&config.model)?);

    // =========================================================================
    // Extraction adapters
    // =========================================================================
    let extractors = ExtractorSet::new(
        Arc::new(ImageOcr::from_config(&config.extraction)),
        Arc::new(PdfText::new()),
        Arc::new(AudioPlaceholder::new()),
    );
    let transcripts = Arc::new(YouTubeTranscripts::from_config(&config.extraction)?);

    // =========================================================================
    // Orchestrator
    // =========================================================================
    let orchestrator = Orchestrator::builder()
        .with_router(Arc::new(LlmIntentRouter::new(model.clone())))
        .with_tasks(Arc::new(LlmTaskTools::new(model)))
        .with_transcripts(transcripts)
        .with_extractors(extractors)
        .build()?;

    // =========================================================================
    // Gateway
    // =========================================================================
    let mut server = GatewayServer::new(config.server, Arc::new(orchestrator));
    match datasmith_telemetry::setup_metrics_recorder() {
        Ok(handle) => server = server.with_metrics(handle),
        Err(e) => tracing::warn!(error = %e, "Metrics recorder unavailable; /metrics disabled"),
    }

    tracing::info!("DataSmith initialized successfully");

    server.run().await?;

    Ok(())
}
