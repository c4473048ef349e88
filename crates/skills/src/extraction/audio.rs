//! Audio "transcription".
//!
//! No speech-to-text engine is wired in; every audio upload yields the same
//! canned transcript so the rest of the pipeline can be exercised end to end.

use async_trait::async_trait;

use datasmith_core::{
    traits::Extractor,
    types::{Extraction, UploadedFile},
    Result,
};

/// Canned transcript returned for every audio upload.
pub const PLACEHOLDER_TRANSCRIPT: &str = "Transcribed Audio: The lecture covered the fundamentals of agentic design, focusing on modularity, data ingestion, and the final output constraints, confirming the importance of the three summary formats.";

/// Audio container formats recognised by their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    M4a,
    Wav,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::M4a => "audio/mp4",
            AudioFormat::Wav => "audio/wav",
        }
    }

    /// Detect format from bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        if data.starts_with(b"RIFF") && data.len() >= 12 && &data[8..12] == b"WAVE" {
            return Some(AudioFormat::Wav);
        }
        if data.starts_with(b"ID3") || data.starts_with(&[0xFF, 0xFB]) || data.starts_with(&[0xFF, 0xFA]) {
            return Some(AudioFormat::Mp3);
        }
        if data.len() >= 8 && &data[4..8] == b"ftyp" {
            return Some(AudioFormat::M4a);
        }

        None
    }
}

/// Extractor that ignores the audio content.
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioPlaceholder;

impl AudioPlaceholder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for AudioPlaceholder {
    async fn extract(&self, file: &UploadedFile) -> Result<Extraction> {
        let format = AudioFormat::detect(&file.bytes);
        tracing::info!(
            filename = %file.filename,
            mime = format.map(|f| f.mime_type()).unwrap_or("unknown"),
            size = file.bytes.len(),
            "Audio received, returning placeholder transcript"
        );
        Ok(Extraction::text(PLACEHOLDER_TRANSCRIPT))
    }
}
