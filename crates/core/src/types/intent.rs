use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Intent Types (Router Output)
// =============================================================================

/// Classified purpose of a request.
///
/// Serialized as the uppercase label. Labels outside the known set are kept
/// verbatim in [`Intent::Other`] so dispatch can report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    Summarize,
    Sentiment,
    CodeExplain,
    YoutubeFetch,
    Conversational,
    ExtractionOnly,
    Ambiguous,
    Other(String),
}

impl Intent {
    /// Wire label for this intent.
    pub fn as_str(&self) -> &str {
        match self {
            Intent::Summarize => "SUMMARIZE",
            Intent::Sentiment => "SENTIMENT",
            Intent::CodeExplain => "CODE_EXPLAIN",
            Intent::YoutubeFetch => "YOUTUBE_FETCH",
            Intent::Conversational => "CONVERSATIONAL",
            Intent::ExtractionOnly => "EXTRACTION_ONLY",
            Intent::Ambiguous => "AMBIGUOUS",
            Intent::Other(label) => label,
        }
    }

    /// Parse a label, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_uppercase();
        match normalized.as_str() {
            "SUMMARIZE" => Intent::Summarize,
            "SENTIMENT" => Intent::Sentiment,
            "CODE_EXPLAIN" => Intent::CodeExplain,
            "YOUTUBE_FETCH" => Intent::YoutubeFetch,
            "CONVERSATIONAL" => Intent::Conversational,
            "EXTRACTION_ONLY" => Intent::ExtractionOnly,
            "AMBIGUOUS" => Intent::Ambiguous,
            _ => Intent::Other(label.trim().to_string()),
        }
    }
}

impl From<String> for Intent {
    fn from(label: String) -> Self {
        Intent::from_label(&label)
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.as_str().to_string()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured output for the LLM intent router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntentPlan {
    /// One of: SUMMARIZE, SENTIMENT, CODE_EXPLAIN, YOUTUBE_FETCH, CONVERSATIONAL, EXTRACTION_ONLY, AMBIGUOUS
    #[schemars(with = "String")]
    pub intent: Intent,

    /// List of format constraints (e.g., '3_bullets', '5_sentences', 'bug_detection', 'time_complexity')
    #[serde(default)]
    pub detected_constraints: Vec<String>,

    /// True if the user's request is clear and actionable, False if a follow-up is needed.
    pub is_clear: bool,
}

impl IntentPlan {
    /// Create a plan with no constraints.
    pub fn new(intent: Intent, is_clear: bool) -> Self {
        Self {
            intent,
            detected_constraints: Vec::new(),
            is_clear,
        }
    }

    /// The verdict used whenever classification cannot be trusted.
    pub fn ambiguous() -> Self {
        Self::new(Intent::Ambiguous, false)
    }

    /// Attach detected constraints.
    pub fn with_constraints(mut self, constraints: Vec<String>) -> Self {
        self.detected_constraints = constraints;
        self
    }

    /// True when a task may run without asking the user first.
    pub fn is_actionable(&self) -> bool {
        self.is_clear && self.intent != Intent::Ambiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intent_labels_are_case_insensitive() {
        assert_eq!(Intent::from_label("summarize"), Intent::Summarize);
        assert_eq!(Intent::from_label(" Code_Explain "), Intent::CodeExplain);
        assert_eq!(
            Intent::from_label("TRANSLATE"),
            Intent::Other("TRANSLATE".to_string())
        );
    }

    #[test]
    fn test_plan_parses_without_constraints() {
        let plan: IntentPlan =
            serde_json::from_value(json!({"intent": "SENTIMENT", "is_clear": true})).unwrap();
        assert_eq!(plan.intent, Intent::Sentiment);
        assert!(plan.detected_constraints.is_empty());
        assert!(plan.is_actionable());
    }

    #[test]
    fn test_plan_rejects_missing_clarity() {
        let parsed = serde_json::from_value::<IntentPlan>(json!({"intent": "SUMMARIZE"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_plan_serializes_label() {
        let plan = IntentPlan::new(Intent::YoutubeFetch, true);
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["intent"], "YOUTUBE_FETCH");
    }

    #[test]
    fn test_ambiguous_is_never_actionable() {
        assert!(!IntentPlan::new(Intent::Ambiguous, true).is_actionable());
        assert!(!IntentPlan::new(Intent::Summarize, false).is_actionable());
    }
}
