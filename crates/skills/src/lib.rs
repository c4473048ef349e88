#![deny(unused)]
//! Adapters for DataSmith.
//!
//! This crate provides:
//! - Extraction adapters: image OCR, PDF text layer, audio placeholder
//! - The YouTube transcript fetcher
//! - LLM-backed task tools (summary, sentiment, code analysis)

pub mod extraction;
pub mod tasks;

pub use extraction::{
    video_id, AudioPlaceholder, ImageOcr, PdfText, TranscriptError, YouTubeTranscripts,
    OCR_ERROR_TEXT, PDF_PARSE_ERROR, PLACEHOLDER_TRANSCRIPT, SCANNED_PDF_FALLBACK,
};
pub use tasks::{LlmTaskTools, FOLLOW_UP_QUESTION, GREETING};
