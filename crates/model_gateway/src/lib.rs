#![deny(unused)]
//! Model Gateway for DataSmith.
//!
//! This crate provides:
//! - An OpenAI-compatible structured-output client (OpenRouter by default)
//! - A deterministic, schema-keyed mock model
//! - Fallback routing from the live model to the mock

pub mod fallback;
pub mod mock;
pub mod openrouter;

pub use fallback::FallbackModel;
pub use mock::MockStructuredModel;
pub use openrouter::{parse_json_content, OpenRouterClient};
