#![deny(unused)]
//! HTTP gateway for DataSmith.
//!
//! This crate provides the HTTP entry point (chat UI, `/process`, health and
//! metrics) and the model-backed intent router.

pub mod router;
pub mod server;

pub use router::LlmIntentRouter;
pub use server::{AppState, GatewayServer, HealthResponse};
