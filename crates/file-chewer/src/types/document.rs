//! Source documents, extraction results and chunks

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

use super::format::FormatKind;
use crate::error::{Error, Result};

/// Uploaded file: raw bytes plus the caller's filename / media type hints
#[derive(Debug, Clone)]
pub struct SourceDocument {
    filename: String,
    media_type: Option<String>,
    data: Vec<u8>,
}

impl SourceDocument {
    /// Create a document from in-memory bytes
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            media_type: None,
            data: data.into(),
        }
    }

    /// Attach a declared media type
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Read a document from disk. An unreadable file is reported as corrupt input.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let data = std::fs::read(path)
            .map_err(|e| Error::corrupt(filename.clone(), format!("unreadable file: {}", e)))?;

        Ok(Self::new(filename, data))
    }

    /// Declared filename
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Declared media type, if any
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Raw file bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the file has no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// What happened to the OCR fallback during a PDF extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OcrOutcome {
    /// Not a PDF, or the embedded text looked fine
    NotRequired,
    /// Text looked suspect but OCR is disabled or no engine is configured
    Skipped,
    /// OCR output had more alphabetic content and replaced the original
    Replaced { original_alpha: usize, ocr_alpha: usize },
    /// OCR ran but did not beat the original text
    KeptOriginal { original_alpha: usize, ocr_alpha: usize },
    /// OCR was attempted and failed; original text retained
    Degraded { reason: String },
}

impl OcrOutcome {
    /// Whether OCR was attempted at all
    pub fn attempted(&self) -> bool {
        matches!(
            self,
            OcrOutcome::Replaced { .. } | OcrOutcome::KeptOriginal { .. } | OcrOutcome::Degraded { .. }
        )
    }

    /// Whether OCR was attempted and failed
    pub fn is_degraded(&self) -> bool {
        matches!(self, OcrOutcome::Degraded { .. })
    }
}

/// Normalized text for one source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Format the document was routed to
    pub format: FormatKind,
    /// Extracted text (possibly empty)
    pub text: String,
    /// OCR fallback result
    pub ocr: OcrOutcome,
    /// HTML extractor produced nothing and the generic reader was used
    pub used_generic_fallback: bool,
}

impl Extraction {
    /// Create an extraction that needed no fallback
    pub fn new(format: FormatKind, text: String) -> Self {
        Self {
            format,
            text,
            ocr: OcrOutcome::NotRequired,
            used_generic_fallback: false,
        }
    }

    /// True when OCR was attempted and failed
    pub fn degraded(&self) -> bool {
        self.ocr.is_degraded()
    }
}

/// A bounded span of document text ready for embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in document order (0-based)
    pub index: usize,
    /// Chunk text
    pub content: String,
    /// Number of sentence units in the chunk
    pub unit_count: usize,
    /// Leading units repeated from the previous chunk
    pub overlap_units: usize,
}

impl Chunk {
    /// Character count of the chunk text
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Result of ingesting one upload: the text and its chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestedDocument {
    /// Identifier for the upload
    pub file_id: Uuid,
    /// Original filename
    pub filename: String,
    /// Routed format
    pub format: FormatKind,
    /// SHA-256 of the extracted text
    pub content_hash: String,
    /// Extracted text
    pub text: String,
    /// Ordered chunks
    pub chunks: Vec<Chunk>,
    /// OCR fallback result
    pub ocr: OcrOutcome,
}

impl IngestedDocument {
    /// Build from an extraction and its chunks
    pub fn new(filename: impl Into<String>, extraction: Extraction, chunks: Vec<Chunk>) -> Self {
        Self {
            file_id: Uuid::new_v4(),
            filename: filename.into(),
            format: extraction.format,
            content_hash: hash_content(&extraction.text),
            text: extraction.text,
            chunks,
            ocr: extraction.ocr,
        }
    }

    /// Chunk texts in order
    pub fn chunk_texts(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.content.clone()).collect()
    }
}

/// Hash content
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_document_accessors() {
        let doc = SourceDocument::new("a.txt", b"hello".to_vec()).with_media_type("text/plain");
        assert_eq!(doc.filename(), "a.txt");
        assert_eq!(doc.media_type(), Some("text/plain"));
        assert_eq!(doc.data(), b"hello");
        assert_eq!(doc.len(), 5);
    }

    #[test]
    fn test_from_missing_path_is_corrupt_input() {
        let err = SourceDocument::from_path("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, Error::CorruptInput { ref filename, .. } if filename == "here.pdf"));
    }

    #[test]
    fn test_ocr_outcome_flags() {
        assert!(!OcrOutcome::NotRequired.attempted());
        assert!(!OcrOutcome::Skipped.attempted());
        let degraded = OcrOutcome::Degraded { reason: "no tesseract".into() };
        assert!(degraded.attempted());
        assert!(degraded.is_degraded());
        assert!(!OcrOutcome::Replaced { original_alpha: 1, ocr_alpha: 2 }.is_degraded());
    }

    #[test]
    fn test_hash_content_is_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_eq!(hash_content("abc").len(), 64);
    }
}
