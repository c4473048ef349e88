use bytes::Bytes;
use serde::{Deserialize, Serialize};

// =============================================================================
// Upload & Extraction Types
// =============================================================================

/// A file uploaded alongside the query.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Lowercased text after the last `.`, or the whole name when there is none.
    pub fn extension(&self) -> String {
        self.filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Modality of this upload.
    pub fn kind(&self) -> FileKind {
        FileKind::from_filename(&self.filename)
    }
}

/// Supported input modalities, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Image,
    Pdf,
    Audio,
    Unsupported,
}

impl FileKind {
    /// Classify an extension (already lowercased or not).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "png" => FileKind::Image,
            "pdf" => FileKind::Pdf,
            "mp3" | "wav" | "m4a" => FileKind::Audio,
            _ => FileKind::Unsupported,
        }
    }

    /// Classify a file name.
    pub fn from_filename(filename: &str) -> Self {
        Self::from_extension(filename.rsplit('.').next().unwrap_or_default())
    }
}

/// Text produced by one extraction adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Extracted plain text.
    pub text: String,
    /// OCR confidence, only produced by the image path.
    pub confidence: Option<String>,
}

impl Extraction {
    /// Text without a confidence score.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    /// Attach a confidence score.
    pub fn with_confidence(mut self, confidence: impl Into<String>) -> Self {
        self.confidence = Some(confidence.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_dispatch() {
        assert_eq!(FileKind::from_filename("scan.PDF"), FileKind::Pdf);
        assert_eq!(FileKind::from_filename("photo.Png"), FileKind::Image);
        assert_eq!(FileKind::from_filename("photo.jpg"), FileKind::Image);
        assert_eq!(FileKind::from_filename("talk.m4a"), FileKind::Audio);
        assert_eq!(FileKind::from_filename("talk.WAV"), FileKind::Audio);
        // jpeg is deliberately not in the image set
        assert_eq!(FileKind::from_filename("photo.jpeg"), FileKind::Unsupported);
        assert_eq!(FileKind::from_filename("notes.txt"), FileKind::Unsupported);
        assert_eq!(FileKind::from_filename("README"), FileKind::Unsupported);
    }

    #[test]
    fn test_extension_uses_last_segment() {
        let file = UploadedFile::new("archive.tar.PDF", Bytes::new());
        assert_eq!(file.extension(), "pdf");
        assert_eq!(file.kind(), FileKind::Pdf);
    }
}
