//! OpenAI-compatible chat-completions client for structured output.
//!
//! Targets OpenRouter by default; any endpoint speaking the
//! `/chat/completions` protocol with `response_format: json_object` works.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use datasmith_core::{
    config::ModelConfig,
    traits::{Prompt, SchemaDescriptor, StructuredModel},
    Error, Result,
};

/// Hosted structured-output client.
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    api_key: Secret<String>,
    model: String,
    temperature: f32,
    referer: String,
    title: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenRouterClient {
    /// Create a client from model settings and a credential.
    pub fn new(config: &ModelConfig, api_key: Secret<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::model_provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.name.clone(),
            temperature: config.temperature,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    fn system_prompt(schema: &SchemaDescriptor) -> String {
        format!(
            "You are a precise agent. Your response MUST be a JSON object conforming strictly \
             to the following JSON schema (including all field names): {}. \
             Do not include any text outside the JSON.",
            schema.to_prompt_json()
        )
    }

    fn build_request<'a>(&'a self, prompt: &Prompt, schema: &SchemaDescriptor) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(Self::system_prompt(schema)),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(prompt.render()),
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl StructuredModel for OpenRouterClient {
    async fn generate_structured(&self, prompt: &Prompt, schema: &SchemaDescriptor) -> Result<Value> {
        tracing::debug!(
            model = %self.model,
            schema = %schema.name,
            prompt_len = prompt.content.len(),
            "Calling structured model"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&self.build_request(prompt, schema))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("model call timed out: {}", e))
                } else {
                    Error::model_provider(format!("request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::model_provider(format!("HTTP {}: {}", status, body)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::model_provider(format!("invalid completion body: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::model_provider("completion has no message content"))?;

        parse_json_content(&content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Parse a model's message content as a JSON value.
///
/// Tolerates Markdown code fences and text around a single top-level object.
pub fn parse_json_content(content: &str) -> Result<Value> {
    let trimmed = strip_code_fence(content.trim());

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => {
            serde_json::from_str(&trimmed[start..=end]).map_err(Error::from)
        }
        _ => Err(Error::model_provider(format!(
            "content is not JSON: {}",
            trimmed.chars().take(80).collect::<String>()
        ))),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the language tag line, e.g. ```json
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
