#![deny(unused)]
//! Observability for DataSmith.
//!
//! This crate provides:
//! - `tracing` subscriber setup (plain or JSON logs, optional OTLP export)
//! - The Prometheus metrics recorder and HTTP request metrics

pub mod metrics;
pub mod tracing_layer;

pub use self::metrics::{setup_metrics_recorder, track_request};
pub use tracing_layer::configure_tracing;
