//! HTML

use scraper::Html;

use super::TextExtractor;
use crate::error::Result;
use crate::types::FormatKind;

/// Elements whose text never renders
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Visible text nodes joined with single spaces, tags stripped
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    /// Extract visible text from markup
    pub fn visible_text(html: &str) -> String {
        let document = Html::parse_document(html);
        let mut parts: Vec<&str> = Vec::new();

        for node in document.tree.root().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                parts.push(trimmed);
            }
        }

        parts.join(" ")
    }
}

impl TextExtractor for HtmlExtractor {
    fn format(&self) -> FormatKind {
        FormatKind::Html
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let html = String::from_utf8_lossy(data);
        Ok(Self::visible_text(&html))
    }
}
