//! Image text extraction with the Tesseract OCR engine.
//!
//! The image is decoded in-process first; bytes that are not an image are a
//! hard failure. Everything after that (spawning Tesseract, reading its
//! output) is absorbed into a sentinel text so OCR trouble never aborts a
//! request.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use datasmith_core::{
    config::ExtractionConfig,
    traits::Extractor,
    types::{Extraction, UploadedFile},
    Error, Result,
};

use super::preview;

/// Text returned when OCR itself fails.
pub const OCR_ERROR_TEXT: &str = "OCR_ERROR: Could not process image content.";

/// Tesseract-backed image extractor.
pub struct ImageOcr {
    /// Tesseract binary to invoke.
    tesseract_cmd: String,
}

impl ImageOcr {
    /// Create an extractor using `cmd`, or `tesseract` from PATH.
    pub fn new(cmd: Option<String>) -> Self {
        Self {
            tesseract_cmd: cmd.unwrap_or_else(|| "tesseract".to_string()),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.tesseract_cmd.clone())
    }

    /// Decode the image to validate format and dimensions.
    pub fn validate_image(image_data: &[u8]) -> Result<ImageInfo> {
        use image::GenericImageView;

        let img = image::load_from_memory(image_data)
            .map_err(|e| Error::extraction(format!("cannot identify image file: {}", e)))?;

        let (width, height) = img.dimensions();
        let format = image::guess_format(image_data)
            .map(|f| format!("{:?}", f))
            .unwrap_or_else(|_| "unknown".to_string());

        Ok(ImageInfo {
            width,
            height,
            format,
            size_bytes: image_data.len(),
        })
    }

    /// Run Tesseract on a file, writing to stdout. `config` selects an output
    /// config such as `tsv`.
    async fn run_tesseract(&self, path: &std::path::Path, config: Option<&str>) -> Result<String> {
        let mut cmd = Command::new(&self.tesseract_cmd);
        cmd.arg(path).arg("stdout");
        if let Some(config) = config {
            cmd.arg(config);
        }

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// OCR text plus formatted confidence.
    async fn recognize(&self, image_data: &[u8]) -> Result<(String, String)> {
        let file = tempfile::Builder::new().prefix("datasmith-ocr-").tempfile()?;
        tokio::fs::write(file.path(), image_data).await?;

        let text = self.run_tesseract(file.path(), None).await?.trim().to_string();
        let tsv = self.run_tesseract(file.path(), Some("tsv")).await?;

        Ok((text, format_confidence(average_confidence(&tsv))))
    }
}

#[async_trait]
impl Extractor for ImageOcr {
    async fn extract(&self, file: &UploadedFile) -> Result<Extraction> {
        let info = Self::validate_image(&file.bytes)?;
        tracing::debug!(
            width = info.width,
            height = info.height,
            format = %info.format,
            size = info.size_bytes,
            "Running OCR"
        );

        match self.recognize(&file.bytes).await {
            Ok((text, confidence)) => {
                tracing::info!(
                    chars = text.len(),
                    confidence = %confidence,
                    preview = %preview(&text, 50),
                    "OCR complete"
                );
                Ok(Extraction::text(text).with_confidence(confidence))
            }
            Err(e) => {
                tracing::warn!(error = %e, cmd = %self.tesseract_cmd, "OCR failed");
                Ok(Extraction::text(OCR_ERROR_TEXT).with_confidence(format!("Error: {}", e.kind())))
            }
        }
    }
}

/// Mean per-word confidence from Tesseract TSV output.
///
/// Rows with a negative confidence (layout rows, not words) are skipped.
/// Returns `None` when no word was scored.
pub fn average_confidence(tsv: &str) -> Option<f64> {
    let mut lines = tsv.lines();
    let header = lines.next()?;
    let conf_idx = header.split('\t').position(|col| col.trim() == "conf")?;

    let scores: Vec<f64> = lines
        .filter_map(|line| line.split('\t').nth(conf_idx))
        .filter_map(|conf| conf.trim().parse::<f64>().ok())
        .filter(|conf| *conf >= 0.0)
        .collect();

    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

/// Render a confidence the way it is shown to users.
pub fn format_confidence(avg: Option<f64>) -> String {
    match avg {
        Some(avg) => format!("{:.2}% (Average)", avg),
        None => "N/A (no words detected)".to_string(),
    }
}

/// Information about an image.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Image format (Png, Jpeg, etc.).
    pub format: String,
    /// Size in bytes.
    pub size_bytes: usize,
}
