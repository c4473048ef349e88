#![deny(unused)]
//! Orchestration for DataSmith.
//!
//! This crate provides the request pipeline: file extraction, intent
//! classification, the URL override and clarity gate, and task dispatch.

pub mod builder;
pub mod explain;
pub mod orchestrator;

pub use builder::OrchestratorBuilder;
pub use explain::ExplainLog;
pub use orchestrator::{ExtractorSet, Orchestrator};
