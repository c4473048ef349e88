//! Structured-output model traits.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Description of the JSON shape a structured call must return.
///
/// Plain data: a name used for routing fallbacks plus the JSON Schema that is
/// embedded in the system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Schema name, e.g. `IntentPlan`.
    pub name: String,
    /// JSON Schema document.
    pub schema: Value,
}

impl SchemaDescriptor {
    /// Derive a descriptor from a type's JSON Schema.
    pub fn of<T: JsonSchema>() -> Self {
        let root = schemars::schema_for!(T);
        Self {
            name: T::schema_name(),
            schema: serde_json::to_value(&root).unwrap_or_default(),
        }
    }

    /// Compact JSON rendering for prompts.
    pub fn to_prompt_json(&self) -> String {
        self.schema.to_string()
    }
}

/// Prompt for a structured call: a fixed instruction and the user content it
/// applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub instruction: String,
    pub content: String,
}

impl Prompt {
    pub fn new(instruction: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            content: content.into(),
        }
    }

    /// Full text sent to the model.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.instruction, self.content)
    }
}

/// A language model that answers with JSON matching a schema.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Issue one structured call. Transport errors, non-success responses and
    /// unparseable content are all `Err`.
    async fn generate_structured(&self, prompt: &Prompt, schema: &SchemaDescriptor)
        -> Result<Value>;

    /// Model identifier, for logs and metrics.
    fn model_name(&self) -> &str;
}
