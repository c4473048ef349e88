use serde::{Deserialize, Serialize};

// =============================================================================
// Agent Response Types
// =============================================================================

/// Terminal status of one orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Error,
    #[serde(rename = "Awaiting Clarity")]
    AwaitingClarity,
    Complete,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Error => "Error",
            AgentStatus::AwaitingClarity => "Awaiting Clarity",
            AgentStatus::Complete => "Complete",
        }
    }
}

/// Final response returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub status: AgentStatus,
    /// Text derived from the query or the uploaded file.
    pub extracted_text: String,
    /// Error message, clarification question, or task result.
    pub result: String,
    /// Explainability trace, `[n] message` per step.
    pub log: Vec<String>,
}

impl AgentResponse {
    /// Hard failure: nothing was extracted.
    pub fn error(result: impl Into<String>, log: Vec<String>) -> Self {
        Self {
            status: AgentStatus::Error,
            extracted_text: String::new(),
            result: result.into(),
            log,
        }
    }

    pub fn awaiting_clarity(
        extracted_text: impl Into<String>,
        question: impl Into<String>,
        log: Vec<String>,
    ) -> Self {
        Self {
            status: AgentStatus::AwaitingClarity,
            extracted_text: extracted_text.into(),
            result: question.into(),
            log,
        }
    }

    pub fn complete(
        extracted_text: impl Into<String>,
        result: impl Into<String>,
        log: Vec<String>,
    ) -> Self {
        Self {
            status: AgentStatus::Complete,
            extracted_text: extracted_text.into(),
            result: result.into(),
            log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        let response = AgentResponse::awaiting_clarity("text", "what now?", vec![]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "Awaiting Clarity");
        assert_eq!(json["extracted_text"], "text");

        let json = serde_json::to_value(AgentResponse::error("boom", vec![])).unwrap();
        assert_eq!(json["status"], "Error");
        assert_eq!(json["extracted_text"], "");
    }
}
