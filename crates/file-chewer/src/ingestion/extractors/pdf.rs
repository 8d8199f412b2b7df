//! PDF text layer

use lopdf::Document;

use super::TextExtractor;
use crate::error::{Error, Result};
use crate::types::FormatKind;

/// Ligatures some PDF fonts emit instead of letter pairs
const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Extracts the embedded text layer page by page, in page order.
///
/// Pages are read with `lopdf` and concatenated as-is; when any page cannot be
/// read that way the whole document is handed to `pdf-extract` instead. Empty
/// pages contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

/// Per-page lopdf results for one document
#[derive(Debug, Default)]
struct PageTexts {
    text: String,
    failed: Vec<u32>,
    total: usize,
}

impl PageTexts {
    fn push(&mut self, page_text: &str) {
        self.text.push_str(page_text);
    }
}

impl PdfExtractor {
    /// Page texts concatenated in page order
    fn extract_pages(doc: &Document) -> PageTexts {
        let pages = doc.get_pages();
        let mut result = PageTexts {
            total: pages.len(),
            ..PageTexts::default()
        };

        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => result.push(&page_text),
                Err(e) => {
                    tracing::debug!("Could not extract text from page {}: {}", page_number, e);
                    result.failed.push(*page_number);
                }
            }
        }

        result
    }

    /// Choose between the lopdf page texts and a whole-document read.
    ///
    /// Any unreadable page sends the document to `whole_document`. When every
    /// page failed its error is returned; when only some failed, the readable
    /// pages are kept if the whole-document read fails or finds nothing.
    fn resolve(pages: PageTexts, whole_document: impl FnOnce() -> Result<String>) -> Result<String> {
        if pages.failed.is_empty() {
            return Ok(pages.text);
        }

        if pages.failed.len() == pages.total {
            tracing::warn!(
                "lopdf could not read any of {} pages, trying pdf-extract",
                pages.total
            );
            return whole_document();
        }

        tracing::warn!(
            "lopdf could not read pages {:?} of {}, trying pdf-extract",
            pages.failed,
            pages.total
        );
        match whole_document() {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => {
                tracing::warn!("pdf-extract found no text, keeping the readable pages");
                Ok(pages.text)
            }
            Err(e) => {
                tracing::warn!("pdf-extract failed ({}), keeping the readable pages", e);
                Ok(pages.text)
            }
        }
    }

    /// Whole-document extraction through pdf-extract. Runs on its own thread
    /// because some malformed fonts make it panic.
    fn extract_whole_document(data: &[u8]) -> Result<String> {
        let data = data.to_vec();
        let handle = std::thread::spawn(move || pdf_extract::extract_text_from_mem(&data));

        match handle.join() {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(Error::extractor(FormatKind::Pdf, e.to_string())),
            Err(_) => Err(Error::extractor(
                FormatKind::Pdf,
                "pdf-extract panicked while reading the document",
            )),
        }
    }

    fn cleanup(text: &str) -> String {
        let mut cleaned = text.replace('\0', "");
        for (ligature, letters) in LIGATURES {
            if cleaned.contains(*ligature) {
                cleaned = cleaned.replace(*ligature, letters);
            }
        }
        cleaned
    }
}

impl TextExtractor for PdfExtractor {
    fn format(&self) -> FormatKind {
        FormatKind::Pdf
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let doc = Document::load_mem(data)
            .map_err(|e| Error::corrupt("document.pdf", format!("failed to load PDF: {}", e)))?;

        let pages = Self::extract_pages(&doc);
        let page_count = pages.total;
        let text = Self::resolve(pages, || Self::extract_whole_document(data))?;

        tracing::debug!(pages = page_count, chars = text.len(), "Extracted PDF text layer");
        Ok(Self::cleanup(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_corrupt() {
        let err = PdfExtractor.extract(b"%PDF-1.4 truncated").unwrap_err();
        assert!(matches!(err, Error::CorruptInput { .. }));
    }

    #[test]
    fn test_cleanup_expands_ligatures_and_drops_nul() {
        assert_eq!(PdfExtractor::cleanup("e\u{FB03}cient\0 \u{FB01}le"), "efficient file");
    }

    fn page_texts(texts: &[&str], failed: &[u32]) -> PageTexts {
        let mut pages = PageTexts {
            total: texts.len() + failed.len(),
            failed: failed.to_vec(),
            ..PageTexts::default()
        };
        for text in texts {
            pages.push(text);
        }
        pages
    }

    #[test]
    fn test_pages_concatenate_without_separator() {
        let pages = page_texts(&["First page. ", "", "Second page."], &[]);
        let text = PdfExtractor::resolve(pages, || panic!("no fallback expected")).unwrap();
        assert_eq!(text, "First page. Second page.");
    }

    #[test]
    fn test_partial_failure_uses_whole_document() {
        let pages = page_texts(&["Page one."], &[2]);
        let text = PdfExtractor::resolve(pages, || Ok("Page one. Page two.".to_string())).unwrap();
        assert_eq!(text, "Page one. Page two.");
    }

    #[test]
    fn test_partial_failure_keeps_readable_pages_when_fallback_fails() {
        let pages = page_texts(&["Page one."], &[2]);
        let text = PdfExtractor::resolve(pages, || Err(Error::extractor(FormatKind::Pdf, "bad font")))
            .unwrap();
        assert_eq!(text, "Page one.");

        let pages = page_texts(&["Page one."], &[2, 3]);
        assert_eq!(PdfExtractor::resolve(pages, || Ok("  ".to_string())).unwrap(), "Page one.");
    }

    #[test]
    fn test_total_failure_propagates_fallback_error() {
        let pages = page_texts(&[], &[1, 2]);
        let err = PdfExtractor::resolve(pages, || Err(Error::extractor(FormatKind::Pdf, "bad xref")))
            .unwrap_err();
        assert!(matches!(err, Error::ExtractorFailure { format: FormatKind::Pdf, .. }));
    }

    #[test]
    fn test_cleanup_keeps_glyph_markers() {
        assert_eq!(PdfExtractor::cleanup("/gid00012/gid00013"), "/gid00012/gid00013");
    }
}
