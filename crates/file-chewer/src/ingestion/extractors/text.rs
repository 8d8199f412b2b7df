//! Plain text

use super::TextExtractor;
use crate::error::Result;
use crate::types::FormatKind;

/// UTF-8 reader; invalid sequences become U+FFFD
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn format(&self) -> FormatKind {
        FormatKind::PlainText
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}
