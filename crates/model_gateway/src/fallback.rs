//! Primary-or-mock routing for structured calls.

use std::sync::Arc;

use secrecy::Secret;
use serde_json::Value;

use datasmith_core::{
    config::ModelConfig,
    traits::{Prompt, SchemaDescriptor, StructuredModel},
    Result,
};

use crate::mock::MockStructuredModel;
use crate::openrouter::OpenRouterClient;

/// Structured-call front door used by the task adapters and the router.
///
/// Never fails: without a primary model, or when the primary errors, the
/// deterministic mock answers instead.
pub struct FallbackModel {
    primary: Option<Arc<dyn StructuredModel>>,
    mock: MockStructuredModel,
}

impl FallbackModel {
    /// Wrap an optional primary model.
    pub fn new(primary: Option<Arc<dyn StructuredModel>>) -> Self {
        Self {
            primary,
            mock: MockStructuredModel::new(),
        }
    }

    /// Mock answers only.
    pub fn mock_only() -> Self {
        Self::new(None)
    }

    /// Build from configuration; a missing credential means mock only.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let primary = match &config.api_key {
            Some(key) => {
                let key: Secret<String> = key.clone();
                let client = OpenRouterClient::new(config, key)?;
                tracing::info!(model = %config.name, base_url = %config.base_url, "Structured model configured");
                Some(Arc::new(client) as Arc<dyn StructuredModel>)
            }
            None => {
                tracing::warn!("No model API key configured. All structured calls use the mock fallback.");
                None
            }
        };
        Ok(Self::new(primary))
    }

    /// Whether a live model is configured.
    pub fn is_live(&self) -> bool {
        self.primary.is_some()
    }

    /// Issue a structured call, falling back to the mock on any failure.
    pub async fn generate(&self, prompt: &Prompt, schema: &SchemaDescriptor) -> Value {
        let Some(primary) = &self.primary else {
            record_fallback(schema, "unconfigured");
            return self.mock.respond(prompt, schema);
        };

        match primary.generate_structured(prompt, schema).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    model = %primary.model_name(),
                    schema = %schema.name,
                    error = %e,
                    "Structured call failed, using mock fallback"
                );
                record_fallback(schema, e.kind());
                self.mock.respond(prompt, schema)
            }
        }
    }
}

fn record_fallback(schema: &SchemaDescriptor, reason: &'static str) {
    metrics::counter!(
        "model_fallbacks_total",
        "schema" => schema.name.clone(),
        "reason" => reason
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use datasmith_core::mocks::ScriptedModel;
    use datasmith_core::types::SentimentOutput;
    use serde_json::json;

    #[tokio::test]
    async fn test_primary_answer_is_used() {
        let primary = Arc::new(ScriptedModel::constant(json!({"label": "Positive"})));
        let model = FallbackModel::new(Some(primary.clone() as Arc<dyn StructuredModel>));

        let value = model
            .generate(&Prompt::new("a", "b"), &SchemaDescriptor::of::<SentimentOutput>())
            .await;

        assert_eq!(value["label"], "Positive");
        assert_eq!(primary.call_count(), 1);
        assert!(model.is_live());
    }

    #[tokio::test]
    async fn test_primary_failure_uses_mock() {
        let model = FallbackModel::new(Some(Arc::new(ScriptedModel::unavailable())));

        let value = model
            .generate(&Prompt::new("a", "b"), &SchemaDescriptor::of::<SentimentOutput>())
            .await;

        assert_eq!(value["label"], "Neutral");
    }

    #[tokio::test]
    async fn test_missing_key_is_mock_only() {
        let model = FallbackModel::from_config(&ModelConfig::default()).unwrap();
        assert!(!model.is_live());
    }
}
