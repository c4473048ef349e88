//! Task execution traits.

use async_trait::async_trait;

use crate::error::Result;

/// One method per executable intent, each returning display text.
#[async_trait]
pub trait TaskTools: Send + Sync {
    /// Summarize `content`, honoring detected format constraints.
    async fn summarize(&self, content: &str, constraints: &[String]) -> Result<String>;

    /// Label the sentiment of `content`.
    async fn sentiment(&self, content: &str) -> Result<String>;

    /// Explain code, detect bugs, and state its complexity.
    async fn code_explain(&self, content: &str) -> Result<String>;

    /// Reply to small talk.
    async fn conversational(&self, query: &str) -> Result<String>;

    /// Ask the user what to do with `context`.
    async fn follow_up(&self, context: &str) -> Result<String>;
}
