//! Format-specific text extractors and the dispatch table over them

mod html;
mod mhtml;
mod pdf;
mod presentation;
mod spreadsheet;
mod text;
mod word;
mod xml;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::types::FormatKind;

pub use html::HtmlExtractor;
pub use mhtml::MhtmlExtractor;
pub use pdf::PdfExtractor;
pub use presentation::PresentationExtractor;
pub use spreadsheet::SpreadsheetExtractor;
pub use text::PlainTextExtractor;
pub use word::WordExtractor;
pub use xml::XmlExtractor;

/// Converts raw bytes of one format family into plain text
pub trait TextExtractor: Send + Sync {
    /// Format this extractor handles
    fn format(&self) -> FormatKind;

    /// Extract text from file bytes
    fn extract(&self, data: &[u8]) -> Result<String>;
}

/// Dispatch table from format to extractor
#[derive(Clone)]
pub struct ExtractorTable {
    extractors: HashMap<FormatKind, Arc<dyn TextExtractor>>,
}

impl ExtractorTable {
    /// Empty table
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Table with every built-in extractor
    pub fn builtin() -> Self {
        Self::empty()
            .with(PdfExtractor)
            .with(WordExtractor)
            .with(SpreadsheetExtractor)
            .with(PresentationExtractor)
            .with(PlainTextExtractor)
            .with(HtmlExtractor)
            .with(MhtmlExtractor)
            .with(XmlExtractor)
    }

    /// Register (or replace) the extractor for its format
    pub fn with(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractors.insert(extractor.format(), Arc::new(extractor));
        self
    }

    /// Look up the extractor for a format
    pub fn get(&self, format: FormatKind) -> Option<&Arc<dyn TextExtractor>> {
        self.extractors.get(&format)
    }
}

/// OOXML containers (.docx, .xlsx, .pptx) are zip archives
pub(crate) fn is_zip(data: &[u8]) -> bool {
    data.starts_with(b"PK\x03\x04")
}

impl Default for ExtractorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ExtractorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<_> = self.extractors.keys().map(|k| k.as_str()).collect();
        formats.sort_unstable();
        f.debug_struct("ExtractorTable").field("formats", &formats).finish()
    }
}
