//! Task adapters backed by structured model calls.
//!
//! Each model-backed task issues exactly one structured call and flattens the
//! typed result into display text. Missing fields show as `N/A`; a result of
//! the wrong shape is an error the orchestrator reports softly.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use datasmith_core::{
    traits::{Prompt, SchemaDescriptor, TaskTools},
    types::{CodeAnalysis, SentimentOutput, SummarizationOutput},
    Error, Result,
};
use datasmith_model_gateway::FallbackModel;

/// Fixed reply to small talk.
pub const GREETING: &str = "Hello! I am a DataSmith Agent. I can process text, images, PDFs, or audio, and perform tasks like summarization, sentiment analysis, and code explanation based on your goal.";

/// Fixed clarification question.
pub const FOLLOW_UP_QUESTION: &str = "I detected content, but what should I do with it? (e.g., Summarize, Analyze Sentiment, Explain Code)";

const NA: &str = "N/A";

/// `TaskTools` over the fallback-aware model.
pub struct LlmTaskTools {
    model: Arc<FallbackModel>,
}

impl LlmTaskTools {
    pub fn new(model: Arc<FallbackModel>) -> Self {
        Self { model }
    }

    async fn call<T>(&self, task: &str, prompt: Prompt) -> Result<T>
    where
        T: DeserializeOwned + schemars::JsonSchema,
    {
        let schema = SchemaDescriptor::of::<T>();
        tracing::debug!(task, schema = %schema.name, "Issuing structured call");
        let value = self.model.generate(&prompt, &schema).await;
        decode(task, value)
    }
}

#[async_trait]
impl TaskTools for LlmTaskTools {
    async fn summarize(&self, content: &str, constraints: &[String]) -> Result<String> {
        let mut instruction = String::from(
            "Summarize the following content. Output must contain a 1-line summary, 3 bullets, and a 5-sentence summary.",
        );
        if !constraints.is_empty() {
            instruction.push_str(&format!(" Honor these constraints: {}.", constraints.join(", ")));
        }

        let output: SummarizationOutput = self
            .call("summarize", Prompt::new(instruction, format!("Content: {}", content)))
            .await?;
        Ok(render_summary(&output))
    }

    async fn sentiment(&self, content: &str) -> Result<String> {
        let prompt = Prompt::new(
            "Perform sentiment analysis on the text. Return the JSON structure with label, confidence (as a percentage), and one-line justification.",
            format!("Text: {}", content),
        );
        let output: SentimentOutput = self.call("sentiment", prompt).await?;
        Ok(render_sentiment(&output))
    }

    async fn code_explain(&self, content: &str) -> Result<String> {
        let prompt = Prompt::new(
            "Analyze the following code. Explain its function, detect any bugs, and state its time complexity.",
            format!("Code:\n\n```\n{}\n```", content),
        );
        let output: CodeAnalysis = self.call("code_explain", prompt).await?;
        Ok(render_code_analysis(&output))
    }

    async fn conversational(&self, _query: &str) -> Result<String> {
        Ok(GREETING.to_string())
    }

    async fn follow_up(&self, _context: &str) -> Result<String> {
        Ok(FOLLOW_UP_QUESTION.to_string())
    }
}

/// Deserialize a model result, rejecting anything that is not an object of
/// the expected field types.
fn decode<T: DeserializeOwned>(task: &str, value: Value) -> Result<T> {
    if !value.is_object() {
        return Err(Error::task(format!(
            "{} returned a non-object result: {}",
            task, value
        )));
    }
    serde_json::from_value(value)
        .map_err(|e| Error::task(format!("{} returned a malformed result: {}", task, e)))
}

fn or_na(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(NA)
}

pub fn render_summary(output: &SummarizationOutput) -> String {
    let bullets = output
        .three_bullets
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|b| format!("* {}", b))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "One-Line Summary: {}\n\nKey Points:\n{}\n\nFive-Sentence Summary:\n{}",
        or_na(&output.one_line_summary),
        bullets,
        or_na(&output.five_sentence_summary)
    )
}

pub fn render_sentiment(output: &SentimentOutput) -> String {
    format!(
        "Label: {} (Confidence: {}) - Justification: {}",
        or_na(&output.label),
        or_na(&output.confidence),
        or_na(&output.justification)
    )
}

pub fn render_code_analysis(output: &CodeAnalysis) -> String {
    format!(
        "Code Explanation:\n{}\n\nBug Detection:\n{}\n\nTime Complexity: {}",
        or_na(&output.explanation),
        or_na(&output.bug_detection),
        or_na(&output.time_complexity)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use datasmith_core::{mocks::ScriptedModel, traits::StructuredModel};
    use serde_json::json;

    fn tools_with(model: ScriptedModel) -> (LlmTaskTools, Arc<ScriptedModel>) {
        let model = Arc::new(model);
        let fallback = FallbackModel::new(Some(model.clone() as Arc<dyn StructuredModel>));
        (LlmTaskTools::new(Arc::new(fallback)), model)
    }

    #[tokio::test]
    async fn test_summary_from_mock_model() {
        let tools = LlmTaskTools::new(Arc::new(FallbackModel::mock_only()));
        let text = tools.summarize("Long article", &[]).await.unwrap();
        assert!(text.starts_with("One-Line Summary: Mock Summary.\n\nKey Points:\n* "));
        assert!(text.ends_with("\n\nFive-Sentence Summary:\nMock five sentence summary."));
    }

    #[tokio::test]
    async fn test_summary_constraints_reach_the_prompt() {
        let (tools, model) = tools_with(ScriptedModel::constant(json!({
            "one_line_summary": "Short.",
            "three_bullets": ["a", "b", "c"],
            "five_sentence_summary": "Five."
        })));

        let text = tools
            .summarize("Body", &["3_bullets".to_string(), "formal".to_string()])
            .await
            .unwrap();
        assert_eq!(
            text,
            "One-Line Summary: Short.\n\nKey Points:\n* a\n* b\n* c\n\nFive-Sentence Summary:\nFive."
        );

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, "SummarizationOutput");
        assert!(prompts[0].1.contains("Honor these constraints: 3_bullets, formal."));
        assert!(prompts[0].1.ends_with("Content: Body"));
    }

    #[tokio::test]
    async fn test_missing_fields_render_na() {
        let (tools, _) = tools_with(ScriptedModel::constant(json!({"label": "Positive"})));
        assert_eq!(
            tools.sentiment("great").await.unwrap(),
            "Label: Positive (Confidence: N/A) - Justification: N/A"
        );

        let (tools, _) = tools_with(ScriptedModel::constant(json!({})));
        assert_eq!(
            tools.code_explain("fn main() {}").await.unwrap(),
            "Code Explanation:\nN/A\n\nBug Detection:\nN/A\n\nTime Complexity: N/A"
        );
        assert_eq!(
            tools.summarize("x", &[]).await.unwrap(),
            "One-Line Summary: N/A\n\nKey Points:\n\n\nFive-Sentence Summary:\nN/A"
        );
    }

    #[tokio::test]
    async fn test_malformed_results_are_errors() {
        let (tools, _) = tools_with(ScriptedModel::constant(json!(["not", "an", "object"])));
        let err = tools.sentiment("x").await.unwrap_err();
        assert!(matches!(err, Error::TaskExecution(_)));

        let (tools, _) = tools_with(ScriptedModel::constant(json!({"three_bullets": "one string"})));
        assert!(tools.summarize("x", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_model_failure_falls_back_to_mock() {
        let (tools, model) = tools_with(ScriptedModel::unavailable());
        assert_eq!(
            tools.code_explain("x").await.unwrap(),
            "Code Explanation:\nMock Explanation.\n\nBug Detection:\nMock Bug.\n\nTime Complexity: Mock O(n)"
        );
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_template_tasks_skip_the_model() {
        let (tools, model) = tools_with(ScriptedModel::unavailable());
        assert_eq!(tools.conversational("hi").await.unwrap(), GREETING);
        assert_eq!(tools.follow_up("some content").await.unwrap(), FOLLOW_UP_QUESTION);
        assert_eq!(model.call_count(), 0);
    }
}
