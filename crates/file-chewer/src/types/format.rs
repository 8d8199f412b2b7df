//! Format classification: media type / extension to extractor family

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Extractor family a file is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// PDF document
    Pdf,
    /// Word document (.docx, .doc)
    Word,
    /// Spreadsheet (.xlsx, .xlsm, .xls, .ods)
    Spreadsheet,
    /// Presentation (.pptx, .ppt)
    Presentation,
    /// Plain text
    PlainText,
    /// HTML page
    Html,
    /// MHTML web archive
    Mhtml,
    /// XML document
    Xml,
    /// No extractor matches
    Unknown,
}

impl FormatKind {
    /// Every routable format, in dispatch-table order
    pub const SUPPORTED: [FormatKind; 8] = [
        FormatKind::Pdf,
        FormatKind::Word,
        FormatKind::Spreadsheet,
        FormatKind::Presentation,
        FormatKind::PlainText,
        FormatKind::Html,
        FormatKind::Mhtml,
        FormatKind::Xml,
    ];

    /// Stable identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Pdf => "pdf",
            FormatKind::Word => "word",
            FormatKind::Spreadsheet => "spreadsheet",
            FormatKind::Presentation => "presentation",
            FormatKind::PlainText => "plain_text",
            FormatKind::Html => "html",
            FormatKind::Mhtml => "mhtml",
            FormatKind::Xml => "xml",
            FormatKind::Unknown => "unknown",
        }
    }

    /// Check if this is a supported format
    pub fn is_supported(&self) -> bool {
        !matches!(self, FormatKind::Unknown)
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const BUILTIN_MEDIA_TYPES: &[(&str, FormatKind)] = &[
    ("application/pdf", FormatKind::Pdf),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        FormatKind::Word,
    ),
    ("application/msword", FormatKind::Word),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        FormatKind::Spreadsheet,
    ),
    ("application/vnd.ms-excel.sheet.macroenabled.12", FormatKind::Spreadsheet),
    ("application/vnd.ms-excel", FormatKind::Spreadsheet),
    ("application/vnd.oasis.opendocument.spreadsheet", FormatKind::Spreadsheet),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        FormatKind::Presentation,
    ),
    ("application/vnd.ms-powerpoint", FormatKind::Presentation),
    ("text/plain", FormatKind::PlainText),
    ("text/markdown", FormatKind::PlainText),
    ("text/csv", FormatKind::PlainText),
    ("text/html", FormatKind::Html),
    ("application/xhtml+xml", FormatKind::Html),
    ("multipart/related", FormatKind::Mhtml),
    ("message/rfc822", FormatKind::Mhtml),
    ("application/x-mimearchive", FormatKind::Mhtml),
    ("application/xml", FormatKind::Xml),
    ("text/xml", FormatKind::Xml),
];

const BUILTIN_EXTENSIONS: &[(&str, FormatKind)] = &[
    ("pdf", FormatKind::Pdf),
    ("docx", FormatKind::Word),
    ("doc", FormatKind::Word),
    ("xlsx", FormatKind::Spreadsheet),
    ("xlsm", FormatKind::Spreadsheet),
    ("xls", FormatKind::Spreadsheet),
    ("ods", FormatKind::Spreadsheet),
    ("pptx", FormatKind::Presentation),
    ("ppt", FormatKind::Presentation),
    ("txt", FormatKind::PlainText),
    ("text", FormatKind::PlainText),
    ("md", FormatKind::PlainText),
    ("csv", FormatKind::PlainText),
    ("log", FormatKind::PlainText),
    ("html", FormatKind::Html),
    ("htm", FormatKind::Html),
    ("xhtml", FormatKind::Html),
    ("mhtml", FormatKind::Mhtml),
    ("mht", FormatKind::Mhtml),
    ("xml", FormatKind::Xml),
];

/// Immutable lookup table from media types and extensions to formats.
///
/// Built once (optionally extended from configuration) and then shared
/// read-only, typically behind an `Arc`.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    media_types: HashMap<String, FormatKind>,
    extensions: HashMap<String, FormatKind>,
}

impl FormatRegistry {
    /// Registry with the built-in media type and extension tables
    pub fn builtin() -> Self {
        Self {
            media_types: BUILTIN_MEDIA_TYPES
                .iter()
                .map(|(mt, kind)| (mt.to_string(), *kind))
                .collect(),
            extensions: BUILTIN_EXTENSIONS
                .iter()
                .map(|(ext, kind)| (ext.to_string(), *kind))
                .collect(),
        }
    }

    /// Add media type mappings. Consumes the builder, so the table cannot
    /// change once it is shared.
    pub fn with_media_types<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, FormatKind)>,
        S: AsRef<str>,
    {
        for (media_type, kind) in entries {
            self.media_types
                .insert(normalize_media_type(media_type.as_ref()), kind);
        }
        self
    }

    /// Classify a file. Media type wins; the extension is consulted when the
    /// media type is absent or not in the table.
    pub fn classify(&self, filename: &str, media_type: Option<&str>) -> FormatKind {
        if let Some(kind) = media_type
            .map(normalize_media_type)
            .and_then(|mt| self.media_types.get(&mt).copied())
        {
            return kind;
        }

        extension_of(filename)
            .and_then(|ext| self.extensions.get(&ext).copied())
            .unwrap_or(FormatKind::Unknown)
    }

    /// Number of media type entries
    pub fn media_type_count(&self) -> usize {
        self.media_types.len()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

static DEFAULT_REGISTRY: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::builtin);

/// Classify against the built-in registry
pub fn classify(filename: &str, media_type: Option<&str>) -> FormatKind {
    DEFAULT_REGISTRY.classify(filename, media_type)
}

/// Lowercase and strip parameters (`text/html; charset=utf-8` -> `text/html`)
fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
