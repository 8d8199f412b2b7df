//! MHTML web archives

use mailparse::ParsedMail;

use super::{HtmlExtractor, TextExtractor};
use crate::error::{Error, Result};
use crate::types::FormatKind;

/// Finds the first `text/html` part of a MIME archive and extracts it as HTML.
/// An archive with no HTML part yields empty text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MhtmlExtractor;

impl MhtmlExtractor {
    /// Depth-first walk, the message itself first
    fn first_html_payload(part: &ParsedMail<'_>) -> Option<Vec<u8>> {
        if part.ctype.mimetype.eq_ignore_ascii_case("text/html") {
            match part.get_body_raw() {
                Ok(body) if !body.is_empty() => return Some(body),
                Ok(_) => {}
                Err(e) => tracing::debug!("Skipping undecodable text/html part: {}", e),
            }
        }
        part.subparts.iter().find_map(Self::first_html_payload)
    }
}

impl TextExtractor for MhtmlExtractor {
    fn format(&self) -> FormatKind {
        FormatKind::Mhtml
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let message = mailparse::parse_mail(data)
            .map_err(|e| Error::corrupt("archive.mhtml", e.to_string()))?;

        match Self::first_html_payload(&message) {
            Some(html) => Ok(HtmlExtractor::visible_text(&String::from_utf8_lossy(&html))),
            None => {
                tracing::debug!("MHTML archive has no text/html part");
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCHIVE: &str = "From: <Saved by Blink>\r\n\
Subject: Knowkute File Chewer - Swagger UI\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/related; type=\"text/html\"; boundary=\"----MultipartBoundary--abc\"\r\n\
\r\n\
------MultipartBoundary--abc\r\n\
Content-Type: text/css\r\n\
Content-Location: https://example.com/style.css\r\n\
\r\n\
body { color: red; }\r\n\
------MultipartBoundary--abc\r\n\
Content-Type: text/html\r\n\
Content-Transfer-Encoding: quoted-printable\r\n\
Content-Location: https://example.com/docs\r\n\
\r\n\
<html><head><title>Swagger UI</title></head><body><h2 class=3D\"title\">Knowkute=\r\n\
\x20File Chewer</h2></body></html>\r\n\
------MultipartBoundary--abc--\r\n";

    #[test]
    fn test_first_html_part_is_extracted() {
        let text = MhtmlExtractor.extract(ARCHIVE.as_bytes()).unwrap();
        assert!(text.contains("Swagger UI"));
        assert!(text.contains("Knowkute File Chewer"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_no_html_part_is_empty_not_error() {
        let archive = "MIME-Version: 1.0\r\n\
Content-Type: multipart/related; boundary=\"b\"\r\n\
\r\n\
--b\r\n\
Content-Type: image/png\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
iVBORw0KGgo=\r\n\
--b--\r\n";
        assert_eq!(MhtmlExtractor.extract(archive.as_bytes()).unwrap(), "");
    }
}
