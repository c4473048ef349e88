//! Error types for DataSmith.

use thiserror::Error;

/// Result type alias using DataSmith's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for DataSmith.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Gateway Errors
    // =========================================================================
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // =========================================================================
    // Extraction Errors
    // =========================================================================
    #[error("{0}")]
    Extraction(String),

    #[error("OCR engine error: {0}")]
    Ocr(String),

    // =========================================================================
    // Task Errors
    // =========================================================================
    #[error("{0}")]
    TaskExecution(String),

    // =========================================================================
    // Model Gateway Errors
    // =========================================================================
    #[error("Model provider error: {0}")]
    ModelProvider(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a gateway error.
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an extraction error. These abort the request.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create an OCR engine error.
    pub fn ocr(msg: impl Into<String>) -> Self {
        Self::Ocr(msg.into())
    }

    /// Create a task execution error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::TaskExecution(msg.into())
    }

    /// Create a model provider error.
    pub fn model_provider(msg: impl Into<String>) -> Self {
        Self::ModelProvider(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short variant name, used in metrics labels and user-facing tags.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Gateway(_) => "Gateway",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::Extraction(_) => "Extraction",
            Self::Ocr(_) => "Ocr",
            Self::TaskExecution(_) => "TaskExecution",
            Self::ModelProvider(_) => "ModelProvider",
            Self::Timeout(_) => "Timeout",
            Self::Config(_) => "Config",
            Self::Serialization(_) => "Serialization",
            Self::Io(_) => "Io",
            Self::Internal(_) => "Internal",
            Self::Other(_) => "Other",
        }
    }
}
