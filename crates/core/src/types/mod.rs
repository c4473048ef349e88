//! Core type definitions for DataSmith.
//!
//! Broken down into submodules for better maintainability.

pub mod file;
pub mod intent;
pub mod response;
pub mod task;

pub use file::*;
pub use intent::*;
pub use response::*;
pub use task::*;
