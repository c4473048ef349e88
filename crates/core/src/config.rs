//! Application configuration.
//!
//! Built once at process start and handed to each component; nothing reads
//! the environment after [`AppConfig::load`] returns.

use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub extraction: ExtractionConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Hosted language-model settings. No `api_key` means every structured call
/// is served by the deterministic mock.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: String,
    pub api_key: Option<Secret<String>>,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub referer: String,
    pub title: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "deepseek-ai/deepseek-r1t2-chimera".into(),
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: None,
            timeout_secs: 30,
            temperature: 0.1,
            referer: "https://datasmith.local".into(),
            title: "DataSmith Agent".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Path to the Tesseract binary; `None` resolves `tesseract` on PATH.
    pub tesseract_cmd: Option<String>,
    pub transcript_base_url: String,
    pub transcript_language: String,
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: None,
            transcript_base_url: "https://www.youtube.com".into(),
            transcript_language: "en".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_filter: String,
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: "info,datasmith=debug".into(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("DATASMITH_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__MODEL__NAME=... to model.name
            .add_source(Environment::with_prefix("APP").separator("__"))
            // Variables the deployment scripts already export
            .set_override_option("model.api_key", non_empty(std::env::var("OPENROUTER_API_KEY").ok()))?
            .set_override_option(
                "extraction.tesseract_cmd",
                non_empty(std::env::var("TESSERACT_CMD_PATH").ok()),
            )?
            .build()?;

        s.try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        self.server.bind_addr()
    }
}

/// An exported but empty variable counts as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
