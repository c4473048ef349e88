//! Request orchestration: extract, classify, gate, dispatch.
//!
//! Hard failures (nothing to work with) end the run with `Error`. Everything
//! downstream of extraction is soft: a failing task still produces a
//! `Complete` response carrying the failure text.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::Instrument;

use datasmith_core::{
    traits::{Extractor, IntentRouter, TaskTools, TranscriptFetcher},
    types::{AgentResponse, Extraction, FileKind, Intent, IntentPlan, UploadedFile},
    Result,
};

use crate::builder::OrchestratorBuilder;
use crate::explain::ExplainLog;

static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/\S*(?:v=|/e/)|youtu\.be/)\S*").expect("video URL regex must compile")
});

const NO_INPUT_MESSAGE: &str = "Please provide text or upload a file.";

/// One extractor per supported file kind.
#[derive(Clone)]
pub struct ExtractorSet {
    pub image: Arc<dyn Extractor>,
    pub pdf: Arc<dyn Extractor>,
    pub audio: Arc<dyn Extractor>,
}

impl ExtractorSet {
    pub fn new(image: Arc<dyn Extractor>, pdf: Arc<dyn Extractor>, audio: Arc<dyn Extractor>) -> Self {
        Self { image, pdf, audio }
    }

    /// Extractor for `kind`, or `None` when the kind is not supported.
    pub fn for_kind(&self, kind: FileKind) -> Option<&Arc<dyn Extractor>> {
        match kind {
            FileKind::Image => Some(&self.image),
            FileKind::Pdf => Some(&self.pdf),
            FileKind::Audio => Some(&self.audio),
            FileKind::Unsupported => None,
        }
    }
}

/// Runs one request end to end. Holds no per-request state, so a single
/// instance is shared across concurrent requests.
pub struct Orchestrator {
    pub(crate) router: Arc<dyn IntentRouter>,
    pub(crate) tasks: Arc<dyn TaskTools>,
    pub(crate) transcripts: Arc<dyn TranscriptFetcher>,
    pub(crate) extractors: ExtractorSet,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Process a query and optional upload. Never fails; problems are
    /// reported through the response status and log.
    pub async fn run(&self, query: &str, file: Option<UploadedFile>) -> AgentResponse {
        let span = tracing::info_span!(
            "orchestrator.run",
            has_file = file.is_some(),
            intent = tracing::field::Empty,
            status = tracing::field::Empty,
        );

        let response = self.execute(query, file).instrument(span.clone()).await;

        span.record("status", response.status.as_str());
        metrics::counter!("agent_runs_total", "status" => response.status.as_str()).increment(1);
        tracing::info!(
            parent: &span,
            status = response.status.as_str(),
            steps = response.log.len(),
            "Run finished"
        );

        response
    }

    async fn execute(&self, query: &str, file: Option<UploadedFile>) -> AgentResponse {
        let mut log = ExplainLog::new();
        let trimmed = query.trim();

        if trimmed.is_empty() && file.is_none() {
            log.push("No input provided.");
            return AgentResponse::error(NO_INPUT_MESSAGE, log.into_entries());
        }
        log.push(format!("Received query: '{}...'", preview(query, 50)));

        let mut extracted_text = trimmed.to_string();
        let mut confidence = None;

        if let Some(file) = &file {
            log.push(format!(
                "Processing uploaded file: {} (Type: {})",
                file.filename,
                file.extension()
            ));

            match self.extract(file).await {
                Ok(Some(extraction)) => {
                    extracted_text = extraction.text;
                    confidence = extraction.confidence;
                }
                Ok(None) => log.push("Unsupported file type. Treating as Text-Only."),
                Err(e) => {
                    tracing::warn!(filename = %file.filename, error = %e, "Extraction failed");
                    log.push(format!("Error during extraction: {}. Stopping execution.", e));
                    return AgentResponse::error(format!("Extraction failed: {}", e), log.into_entries());
                }
            }

            if !extracted_text.is_empty() {
                log.push(format!("Content extracted: {}...", preview(&extracted_text, 50)));
            }
        }

        let full_context = format!("{} {}", extracted_text, trimmed);

        let mut plan = self.router.classify(&full_context).await;
        log.push(format!(
            "Identified intent: {} (Clear: {})",
            plan.intent, plan.is_clear
        ));

        let video_url = VIDEO_URL_RE
            .find(&full_context)
            .map(|m| m.as_str().to_string());
        if let Some(url) = &video_url {
            plan.intent = Intent::YoutubeFetch;
            plan.is_clear = true;
            log.push(format!("Video URL detected: {}. Routing to transcript fetch.", url));
        }

        tracing::Span::current().record("intent", plan.intent.as_str());
        metrics::counter!("agent_intents_total", "intent" => intent_label(&plan.intent)).increment(1);

        if !plan.is_actionable() {
            let question = match self.tasks.follow_up(&full_context).await {
                Ok(question) => question,
                Err(e) => {
                    log.push(format!("Error during task execution: {}", e));
                    format!("Task Execution Failed: {}", e)
                }
            };
            log.push("Intent ambiguous. Returning follow-up question.");
            return AgentResponse::awaiting_clarity(extracted_text, question, log.into_entries());
        }

        log.push(format!("Executing task: {}", plan.intent));
        let result = match self
            .dispatch(&plan, query, &extracted_text, confidence.as_deref(), video_url.as_deref())
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(intent = %plan.intent, error = %e, "Task failed");
                log.push(format!("Error during task execution: {}", e));
                format!("Task Execution Failed: {}", e)
            }
        };

        log.push("Execution complete. Formatting final output.");
        AgentResponse::complete(extracted_text, result, log.into_entries())
    }

    /// `Ok(None)` for file kinds with no extractor.
    async fn extract(&self, file: &UploadedFile) -> Result<Option<Extraction>> {
        let kind = file.kind();
        let Some(extractor) = self.extractors.for_kind(kind) else {
            return Ok(None);
        };
        tracing::debug!(filename = %file.filename, kind = ?kind, size = file.bytes.len(), "Extracting");
        extractor.extract(file).await.map(Some)
    }

    async fn dispatch(
        &self,
        plan: &IntentPlan,
        query: &str,
        extracted_text: &str,
        confidence: Option<&str>,
        video_url: Option<&str>,
    ) -> Result<String> {
        match &plan.intent {
            Intent::YoutubeFetch => {
                self.transcripts
                    .fetch_transcript(video_url.unwrap_or(query))
                    .await
            }
            Intent::Summarize => {
                self.tasks
                    .summarize(extracted_text, &plan.detected_constraints)
                    .await
            }
            Intent::Sentiment => self.tasks.sentiment(extracted_text).await,
            Intent::CodeExplain => self.tasks.code_explain(extracted_text).await,
            Intent::Conversational => self.tasks.conversational(query).await,
            Intent::ExtractionOnly => Ok(match confidence {
                Some(c) => format!("Extracted Text: {} (OCR Confidence: {})", extracted_text, c),
                None => format!("Extracted Text: {}", extracted_text),
            }),
            other @ (Intent::Ambiguous | Intent::Other(_)) => {
                Ok(format!("Unknown Intent: {}. Please clarify.", other))
            }
        }
    }
}

/// Metric label for an intent; unknown labels collapse to one series.
fn intent_label(intent: &Intent) -> String {
    match intent {
        Intent::Other(_) => "OTHER".to_string(),
        known => known.as_str().to_string(),
    }
}

fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
