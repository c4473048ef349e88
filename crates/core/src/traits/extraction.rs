//! Extraction traits: one implementation per input modality.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Extraction, UploadedFile};

/// Turns an uploaded file into plain text.
///
/// Adapters absorb backend trouble into their returned text where they can;
/// an `Err` means the input itself was unusable and aborts the request.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, file: &UploadedFile) -> Result<Extraction>;
}

/// Fetches the transcript of a video given its URL.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch_transcript(&self, url: &str) -> Result<String>;
}
