//! Intent routing traits.

use async_trait::async_trait;

use crate::types::IntentPlan;

/// Intent router for classifying incoming requests.
///
/// Infallible by contract: an unusable classification is reported as
/// [`IntentPlan::ambiguous`], which the orchestrator answers with a
/// clarification question.
#[async_trait]
pub trait IntentRouter: Send + Sync {
    /// Classify the combined request context.
    async fn classify(&self, context: &str) -> IntentPlan;
}
