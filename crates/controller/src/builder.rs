//! Builder for Orchestrator.

use std::sync::Arc;

use datasmith_core::traits::{Extractor, IntentRouter, TaskTools, TranscriptFetcher};
use datasmith_core::{Error, Result};

use crate::orchestrator::{ExtractorSet, Orchestrator};

/// Builder for constructing an Orchestrator.
#[derive(Default)]
pub struct OrchestratorBuilder {
    router: Option<Arc<dyn IntentRouter>>,
    tasks: Option<Arc<dyn TaskTools>>,
    transcripts: Option<Arc<dyn TranscriptFetcher>>,
    image: Option<Arc<dyn Extractor>>,
    pdf: Option<Arc<dyn Extractor>>,
    audio: Option<Arc<dyn Extractor>>,
}

impl OrchestratorBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the intent router.
    pub fn with_router(mut self, router: Arc<dyn IntentRouter>) -> Self {
        self.router = Some(router);
        self
    }

    /// Set the task tools.
    pub fn with_tasks(mut self, tasks: Arc<dyn TaskTools>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Set the transcript fetcher used for video links.
    pub fn with_transcripts(mut self, transcripts: Arc<dyn TranscriptFetcher>) -> Self {
        self.transcripts = Some(transcripts);
        self
    }

    /// Set all three extractors at once.
    pub fn with_extractors(mut self, extractors: ExtractorSet) -> Self {
        self.image = Some(extractors.image);
        self.pdf = Some(extractors.pdf);
        self.audio = Some(extractors.audio);
        self
    }

    /// Build the Orchestrator. Every component is required.
    pub fn build(self) -> Result<Orchestrator> {
        let missing = |what: &str| Error::Config(format!("orchestrator requires {}", what));

        Ok(Orchestrator {
            router: self.router.ok_or_else(|| missing("an intent router"))?,
            tasks: self.tasks.ok_or_else(|| missing("task tools"))?,
            transcripts: self.transcripts.ok_or_else(|| missing("a transcript fetcher"))?,
            extractors: ExtractorSet {
                image: self.image.ok_or_else(|| missing("an image extractor"))?,
                pdf: self.pdf.ok_or_else(|| missing("a PDF extractor"))?,
                audio: self.audio.ok_or_else(|| missing("an audio extractor"))?,
            },
        })
    }
}
