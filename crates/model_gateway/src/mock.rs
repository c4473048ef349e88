//! Deterministic stand-in for the hosted model.
//!
//! Used when no credential is configured or a live call fails. Responses are
//! keyed by schema name and always satisfy that schema, so downstream
//! rendering never sees a missing field.

use serde_json::{json, Value};

use datasmith_core::{
    traits::{Prompt, SchemaDescriptor},
    types::{CodeAnalysis, Intent, IntentPlan, SentimentOutput, SummarizationOutput},
};

/// Schema-keyed mock model.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockStructuredModel;

impl MockStructuredModel {
    pub fn new() -> Self {
        Self
    }

    /// Produce the stand-in value for a schema.
    pub fn respond(&self, prompt: &Prompt, schema: &SchemaDescriptor) -> Value {
        let value = match schema.name.as_str() {
            "IntentPlan" => {
                let content = prompt.content.to_lowercase();
                let plan = if content.contains("summarize") || content.contains("explain") {
                    IntentPlan::ambiguous()
                } else {
                    IntentPlan::new(Intent::Conversational, true)
                };
                serde_json::to_value(plan)
            }
            "SummarizationOutput" => serde_json::to_value(SummarizationOutput {
                one_line_summary: Some("Mock Summary.".into()),
                three_bullets: Some(vec![
                    "Mock Point 1".into(),
                    "Mock Point 2".into(),
                    "Mock Point 3".into(),
                ]),
                five_sentence_summary: Some("Mock five sentence summary.".into()),
            }),
            "SentimentOutput" => serde_json::to_value(SentimentOutput {
                label: Some("Neutral".into()),
                confidence: Some("50%".into()),
                justification: Some("Mock justification; no live model was available.".into()),
            }),
            "CodeAnalysis" => serde_json::to_value(CodeAnalysis {
                explanation: Some("Mock Explanation.".into()),
                bug_detection: Some("Mock Bug.".into()),
                time_complexity: Some("Mock O(n)".into()),
            }),
            _ => Ok(json!({})),
        };

        value.unwrap_or_else(|_| json!({}))
    }
}
