//! XML

use quick_xml::events::Event;
use quick_xml::Reader;

use super::TextExtractor;
use crate::error::{Error, Result};
use crate::types::FormatKind;

/// Element text and tail text in document order, trimmed pieces joined
/// with single spaces. Malformed XML is a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExtractor;

impl TextExtractor for XmlExtractor {
    fn format(&self) -> FormatKind {
        FormatKind::Xml
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let mut reader = Reader::from_reader(data);
        let mut parts: Vec<String> = Vec::new();
        let mut depth = 0usize;
        let mut saw_root = false;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::extractor(
                    FormatKind::Xml,
                    format!("at byte {}: {}", reader.buffer_position(), e),
                )
            })?;

            match event {
                Event::Start(_) => {
                    if depth == 0 && saw_root {
                        return Err(Error::extractor(FormatKind::Xml, "multiple root elements"));
                    }
                    depth += 1;
                    saw_root = true;
                }
                Event::Empty(_) => {
                    if depth == 0 && saw_root {
                        return Err(Error::extractor(FormatKind::Xml, "multiple root elements"));
                    }
                    saw_root = true;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                }
                Event::Text(text) if depth > 0 => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::extractor(FormatKind::Xml, e.to_string()))?;
                    push_trimmed(&mut parts, &text);
                }
                Event::CData(cdata) if depth > 0 => {
                    let bytes = cdata.into_inner();
                    push_trimmed(&mut parts, &String::from_utf8_lossy(&bytes));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(Error::extractor(FormatKind::Xml, "no root element found"));
        }
        if depth != 0 {
            return Err(Error::extractor(
                FormatKind::Xml,
                format!("{} unclosed element(s) at end of document", depth),
            ));
        }

        Ok(parts.join(" "))
    }
}

fn push_trimmed(parts: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
}
