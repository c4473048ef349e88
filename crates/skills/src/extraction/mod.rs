//! Extraction adapters, one per input modality.

pub mod audio;
pub mod ocr;
pub mod pdf;
pub mod youtube;

pub use audio::{AudioFormat, AudioPlaceholder, PLACEHOLDER_TRANSCRIPT};
pub use ocr::{ImageInfo, ImageOcr, OCR_ERROR_TEXT};
pub use pdf::{PdfText, PDF_PARSE_ERROR, SCANNED_PDF_FALLBACK};
pub use youtube::{video_id, TranscriptError, YouTubeTranscripts};

/// First `max` characters of `text`, for log previews.
pub(crate) fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
