//! Text-layer extraction for PDF documents.

use std::panic::{catch_unwind, AssertUnwindSafe};

use async_trait::async_trait;

use datasmith_core::{
    traits::Extractor,
    types::{Extraction, UploadedFile},
    Result,
};

use super::preview;

/// Returned when a PDF parses but carries no text layer.
pub const SCANNED_PDF_FALLBACK: &str =
    "(PDF OCR Fallback Used) Please provide a clearer text-based PDF.";

/// Returned when the document cannot be parsed at all.
pub const PDF_PARSE_ERROR: &str = "Error: Could not parse PDF file.";

/// Reads the embedded text of every page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfText;

impl PdfText {
    pub fn new() -> Self {
        Self
    }

    /// Text of all pages in order, or one of the sentinel texts.
    pub fn text_from_bytes(data: &[u8]) -> String {
        // pdf-extract panics on some malformed inputs.
        let result = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(data)));

        match result {
            Ok(Ok(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    SCANNED_PDF_FALLBACK.to_string()
                } else {
                    text.to_string()
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "PDF parse failed");
                PDF_PARSE_ERROR.to_string()
            }
            Err(_) => {
                tracing::warn!("PDF parser panicked");
                PDF_PARSE_ERROR.to_string()
            }
        }
    }
}

#[async_trait]
impl Extractor for PdfText {
    async fn extract(&self, file: &UploadedFile) -> Result<Extraction> {
        let bytes = file.bytes.clone();
        let text = tokio::task::spawn_blocking(move || Self::text_from_bytes(&bytes))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "PDF worker failed");
                PDF_PARSE_ERROR.to_string()
            });

        tracing::info!(
            filename = %file.filename,
            chars = text.len(),
            preview = %preview(&text, 50),
            "PDF text extracted"
        );
        Ok(Extraction::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-page PDF whose content stream is `content`, with a correct
    /// xref table.
    fn one_page_pdf(content: &str) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>".to_string(),
            format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref
            )
            .as_bytes(),
        );
        pdf
    }

    #[test]
    fn test_text_layer_is_trimmed() {
        let pdf = one_page_pdf("BT /F1 12 Tf 72 720 Td (Hello World) Tj ET");
        assert_eq!(PdfText::text_from_bytes(&pdf), "Hello World");
    }

    #[test]
    fn test_page_without_text_uses_fallback() {
        let pdf = one_page_pdf("0 0 m 100 100 l S");
        assert_eq!(PdfText::text_from_bytes(&pdf), SCANNED_PDF_FALLBACK);
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        assert_eq!(PdfText::text_from_bytes(b"this is not a pdf"), PDF_PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_parse_failure_does_not_abort() {
        let extraction = PdfText::new()
            .extract(&UploadedFile::new("notes.pdf", b"%PDF-garbage".to_vec()))
            .await
            .unwrap();
        assert_eq!(extraction.text, PDF_PARSE_ERROR);
    }
}
