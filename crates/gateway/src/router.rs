//! Intent router backed by a structured model call.

use std::sync::Arc;

use async_trait::async_trait;

use datasmith_core::{
    traits::{IntentRouter, Prompt, SchemaDescriptor},
    types::IntentPlan,
};
use datasmith_model_gateway::FallbackModel;

const INSTRUCTION: &str = "Determine the single primary intent (SUMMARIZE, CODE_EXPLAIN, SENTIMENT, CONVERSATIONAL, EXTRACTION_ONLY) and if the request is clear.";

/// Classifies request context with one `IntentPlan` structured call.
///
/// Never fails: a result that does not parse as a plan is treated as an
/// ambiguous request, so the user gets asked instead of guessed at.
pub struct LlmIntentRouter {
    model: Arc<FallbackModel>,
}

impl LlmIntentRouter {
    pub fn new(model: Arc<FallbackModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl IntentRouter for LlmIntentRouter {
    async fn classify(&self, context: &str) -> IntentPlan {
        tracing::debug!(content_length = context.len(), "Classifying intent");

        let prompt = Prompt::new(INSTRUCTION, format!("Context: {}", context));
        let value = self
            .model
            .generate(&prompt, &SchemaDescriptor::of::<IntentPlan>())
            .await;

        match serde_json::from_value::<IntentPlan>(value) {
            Ok(plan) => {
                tracing::debug!(
                    intent = %plan.intent,
                    is_clear = plan.is_clear,
                    constraints = ?plan.detected_constraints,
                    "Intent classified"
                );
                plan
            }
            Err(e) => {
                tracing::warn!(error = %e, "Malformed intent plan, treating request as ambiguous");
                IntentPlan::ambiguous()
            }
        }
    }
}
