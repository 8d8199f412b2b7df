//! Extraction orchestration: classify, extract, fall back
//!
//! Pure compute over bytes the caller already holds. Holds only immutable
//! shared tables, so one orchestrator can serve concurrent requests.

use std::sync::Arc;

use super::extractors::{ExtractorTable, PlainTextExtractor, TextExtractor};
use super::ocr::OcrFallback;
use crate::config::ChewerConfig;
use crate::error::{Error, Result};
use crate::types::{Extraction, FormatKind, FormatRegistry, OcrOutcome, SourceDocument};

/// Routes a source document to its extractor and applies fallback policy
#[derive(Debug, Clone)]
pub struct ExtractionOrchestrator {
    registry: Arc<FormatRegistry>,
    extractors: Arc<ExtractorTable>,
    ocr: OcrFallback,
}

impl ExtractionOrchestrator {
    pub fn new(registry: Arc<FormatRegistry>, extractors: Arc<ExtractorTable>, ocr: OcrFallback) -> Self {
        Self {
            registry,
            extractors,
            ocr,
        }
    }

    /// Orchestrator with built-in tables and Tesseract OCR per configuration
    pub fn from_config(config: &ChewerConfig) -> Self {
        Self::new(
            Arc::new(config.format_registry()),
            Arc::new(ExtractorTable::builtin()),
            OcrFallback::from_config(&config.ocr),
        )
    }

    /// Replace the OCR fallback
    pub fn with_ocr(mut self, ocr: OcrFallback) -> Self {
        self.ocr = ocr;
        self
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Classify a file against this orchestrator's registry
    pub fn classify(&self, filename: &str, media_type: Option<&str>) -> FormatKind {
        self.registry.classify(filename, media_type)
    }

    /// Extract normalized text
    pub fn extract_text(&self, source: &SourceDocument) -> Result<String> {
        self.extract(source).map(|extraction| extraction.text)
    }

    /// Extract text with fallback details
    pub fn extract(&self, source: &SourceDocument) -> Result<Extraction> {
        // Classify
        let format = self.classify(source.filename(), source.media_type());
        if !format.is_supported() {
            return Err(Error::UnsupportedFormat(match source.media_type() {
                Some(media_type) => format!("{} ({})", source.filename(), media_type),
                None => source.filename().to_string(),
            }));
        }

        let extractor = self
            .extractors
            .get(format)
            .ok_or_else(|| Error::UnsupportedFormat(format!("no extractor registered for {}", format)))?;

        tracing::debug!(
            filename = source.filename(),
            format = %format,
            bytes = source.len(),
            "Extracting text"
        );

        // Extract
        let text = extractor.extract(source.data()).map_err(|e| match e {
            Error::CorruptInput { message, .. } => Error::corrupt(source.filename(), message),
            other => other,
        })?;

        // Conditional fallback
        let mut extraction = Extraction::new(format, text);
        match format {
            FormatKind::Html if extraction.text.trim().is_empty() => {
                tracing::warn!(
                    "HTML extractor found no text in {}, using generic reader",
                    source.filename()
                );
                extraction.text = PlainTextExtractor.extract(source.data())?;
                extraction.used_generic_fallback = true;
            }
            FormatKind::Pdf => {
                let (text, outcome) = self.ocr.apply(source.data(), std::mem::take(&mut extraction.text));
                extraction.text = text;
                extraction.ocr = outcome;
            }
            _ => {}
        }

        if let OcrOutcome::Degraded { reason } = &extraction.ocr {
            tracing::warn!(filename = source.filename(), "OCR degraded: {}", reason);
        }

        tracing::debug!(
            filename = source.filename(),
            chars = extraction.text.len(),
            "Extraction finished"
        );
        Ok(extraction)
    }
}

impl Default for ExtractionOrchestrator {
    fn default() -> Self {
        Self::from_config(&ChewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::ocr::QualityPolicy;

    fn orchestrator() -> ExtractionOrchestrator {
        ExtractionOrchestrator::default().with_ocr(OcrFallback::disabled(QualityPolicy::default()))
    }

    #[test]
    fn test_unknown_format_is_unsupported() {
        let err = orchestrator()
            .extract(&SourceDocument::new("payload.exe", b"MZ".to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_plain_text_round_trip() {
        let doc = SourceDocument::new("Knowkute_File_Chewer.txt", b"Knowkute File Chewer".to_vec());
        assert_eq!(orchestrator().extract_text(&doc).unwrap(), "Knowkute File Chewer");
    }

    #[test]
    fn test_media_type_routes_before_extension() {
        let doc = SourceDocument::new("page.txt", b"<p>Hello</p>".to_vec()).with_media_type("text/html");
        let extraction = orchestrator().extract(&doc).unwrap();
        assert_eq!(extraction.format, FormatKind::Html);
        assert_eq!(extraction.text, "Hello");
        assert_eq!(extraction.ocr, OcrOutcome::NotRequired);
    }

    #[test]
    fn test_empty_html_falls_back_to_generic_reader() {
        let doc = SourceDocument::new("blank.html", b"<html><body></body></html>".to_vec());
        let extraction = orchestrator().extract(&doc).unwrap();
        assert!(extraction.used_generic_fallback);
        assert_eq!(extraction.text, "<html><body></body></html>");
    }

    #[test]
    fn test_corrupt_input_carries_filename() {
        let doc = SourceDocument::new("report.pdf", b"not a pdf".to_vec());
        let err = orchestrator().extract(&doc).unwrap_err();
        assert!(matches!(err, Error::CorruptInput { ref filename, .. } if filename == "report.pdf"));
    }

    #[test]
    fn test_malformed_xml_is_extractor_failure() {
        let doc = SourceDocument::new("bad.xml", b"<a><b></a>".to_vec());
        let err = orchestrator().extract(&doc).unwrap_err();
        assert!(matches!(err, Error::ExtractorFailure { format: FormatKind::Xml, .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_orchestrator_is_shareable_across_threads() {
        let orchestrator = Arc::new(orchestrator());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let orchestrator = Arc::clone(&orchestrator);
                std::thread::spawn(move || {
                    let doc = SourceDocument::new(format!("doc{}.txt", i), format!("body {}", i));
                    orchestrator.extract_text(&doc).unwrap()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("body {}", i));
        }
    }
}
