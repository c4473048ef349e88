use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Task Output Types
// =============================================================================
//
// Fields are optional: a model may omit any of them and the renderers fall
// back to "N/A" for whatever is missing.

/// Output structure for the summarization task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SummarizationOutput {
    #[serde(default)]
    pub one_line_summary: Option<String>,
    #[serde(default)]
    pub three_bullets: Option<Vec<String>>,
    #[serde(default)]
    pub five_sentence_summary: Option<String>,
}

/// Output structure for the sentiment analysis task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentOutput {
    /// Positive, Negative, or Neutral.
    #[serde(default)]
    pub label: Option<String>,
    /// Confidence level (e.g., '95%', 'High').
    #[serde(default)]
    pub confidence: Option<String>,
    /// One-line justification for the label.
    #[serde(default)]
    pub justification: Option<String>,
}

/// Output structure for the code explanation task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CodeAnalysis {
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub bug_detection: Option<String>,
    #[serde(default)]
    pub time_complexity: Option<String>,
}
