#![deny(unused)]
//! Core types, traits, and error definitions for DataSmith.
//!
//! This crate provides the building blocks shared by the orchestrator, the
//! extraction and task adapters, the model gateway, and the HTTP layer.

pub mod config;
pub mod error;
pub mod mocks;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
