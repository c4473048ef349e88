//! Mock implementations of core traits for testing.
//!
//! These are shared by the unit and integration tests of every crate in the
//! workspace. Each mock counts its calls so tests can assert which adapters a
//! run did or did not touch.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::{
    traits::{Extractor, IntentRouter, Prompt, SchemaDescriptor, StructuredModel, TaskTools, TranscriptFetcher},
    types::{Extraction, IntentPlan, UploadedFile},
    Error, Result,
};

// =============================================================================
// Mock Intent Router
// =============================================================================

/// Router that always returns the same plan.
pub struct MockRouter {
    plan: IntentPlan,
    contexts: Mutex<Vec<String>>,
}

impl MockRouter {
    pub fn new(plan: IntentPlan) -> Self {
        Self {
            plan,
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Number of classifications performed.
    pub fn call_count(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }

    /// Contexts passed to `classify`, in order.
    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntentRouter for MockRouter {
    async fn classify(&self, context: &str) -> IntentPlan {
        self.contexts.lock().unwrap().push(context.to_string());
        self.plan.clone()
    }
}

// =============================================================================
// Mock Extractor
// =============================================================================

/// Extractor returning a fixed extraction, or failing with a fixed message.
pub struct MockExtractor {
    outcome: std::result::Result<Extraction, String>,
    call_count: Mutex<usize>,
}

impl MockExtractor {
    pub fn returning(extraction: Extraction) -> Self {
        Self {
            outcome: Ok(extraction),
            call_count: Mutex::new(0),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::returning(Extraction::text(text))
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            call_count: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, _file: &UploadedFile) -> Result<Extraction> {
        *self.call_count.lock().unwrap() += 1;
        self.outcome.clone().map_err(Error::extraction)
    }
}

// =============================================================================
// Mock Transcript Fetcher
// =============================================================================

/// Fetcher that echoes the URL it was asked for.
#[derive(Default)]
pub struct MockTranscriptFetcher {
    urls: Mutex<Vec<String>>,
}

impl MockTranscriptFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptFetcher for MockTranscriptFetcher {
    async fn fetch_transcript(&self, url: &str) -> Result<String> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(format!("Transcript of {}", url))
    }
}

// =============================================================================
// Mock Task Tools
// =============================================================================

/// Task tools that record each call as `name(argument)` and return a
/// predictable string. Individual tasks can be made to fail.
#[derive(Default)]
pub struct MockTaskTools {
    calls: Mutex<Vec<String>>,
    failing: Vec<&'static str>,
}

impl MockTaskTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named task (`summarize`, `sentiment`, ...) return an error.
    pub fn failing_on(mut self, task: &'static str) -> Self {
        self.failing.push(task);
        self
    }

    /// Recorded calls.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls excluding the follow-up generator.
    pub fn task_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("follow_up("))
            .collect()
    }

    fn record(&self, task: &'static str, arg: &str) -> Result<String> {
        self.calls.lock().unwrap().push(format!("{}({})", task, arg));
        if self.failing.contains(&task) {
            return Err(Error::task(format!("{} backend unavailable", task)));
        }
        Ok(format!("{} result for: {}", task, arg))
    }
}

#[async_trait]
impl TaskTools for MockTaskTools {
    async fn summarize(&self, content: &str, constraints: &[String]) -> Result<String> {
        self.record("summarize", &format!("{}|{}", content, constraints.join(",")))
    }

    async fn sentiment(&self, content: &str) -> Result<String> {
        self.record("sentiment", content)
    }

    async fn code_explain(&self, content: &str) -> Result<String> {
        self.record("code_explain", content)
    }

    async fn conversational(&self, query: &str) -> Result<String> {
        self.record("conversational", query)
    }

    async fn follow_up(&self, context: &str) -> Result<String> {
        self.record("follow_up", context)
    }
}

// =============================================================================
// Scripted Structured Model
// =============================================================================

/// Structured model that replays a queue of responses, then errors.
pub struct ScriptedModel {
    responses: Mutex<Vec<Result<Value>>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<Value>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A model that always answers with the same value.
    pub fn constant(value: Value) -> Self {
        Self::new(vec![Ok(value)])
    }

    /// A model whose every call fails.
    pub fn unavailable() -> Self {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// `(schema name, rendered prompt)` per call.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredModel for ScriptedModel {
    async fn generate_structured(&self, prompt: &Prompt, schema: &SchemaDescriptor) -> Result<Value> {
        self.prompts
            .lock()
            .unwrap()
            .push((schema.name.clone(), prompt.render()));

        let mut responses = self.responses.lock().unwrap();
        match responses.len() {
            0 => Err(Error::model_provider("scripted model has no responses")),
            // the last response repeats
            1 => match &responses[0] {
                Ok(value) => Ok(value.clone()),
                Err(e) => Err(Error::model_provider(e.to_string())),
            },
            _ => responses.remove(0),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
