//! Core traits for DataSmith.
//!
//! Traits are organized by the seam they cover:
//! - `gateway`: intent classification (IntentRouter)
//! - `extraction`: input modalities to text (Extractor, TranscriptFetcher)
//! - `tasks`: intent execution (TaskTools)
//! - `llm`: structured-output model calls (StructuredModel)

pub mod extraction;
pub mod gateway;
pub mod llm;
pub mod tasks;

pub use extraction::*;
pub use gateway::*;
pub use llm::*;
pub use tasks::*;
