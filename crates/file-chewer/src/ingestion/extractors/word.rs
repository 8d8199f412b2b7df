//! Word documents (.docx)

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use super::{is_zip, TextExtractor};
use crate::error::{Error, Result};
use crate::types::FormatKind;

/// Body paragraphs in document order, one per line
#[derive(Debug, Clone, Copy, Default)]
pub struct WordExtractor;

impl WordExtractor {
    fn collect_runs(children: &[ParagraphChild], out: &mut String) {
        for child in children {
            match child {
                ParagraphChild::Run(run) => {
                    for run_child in &run.children {
                        match run_child {
                            RunChild::Text(t) => out.push_str(&t.text),
                            RunChild::Tab(_) => out.push('\t'),
                            _ => {}
                        }
                    }
                }
                ParagraphChild::Hyperlink(link) => Self::collect_runs(&link.children, out),
                _ => {}
            }
        }
    }
}

impl TextExtractor for WordExtractor {
    fn format(&self) -> FormatKind {
        FormatKind::Word
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        if !is_zip(data) {
            return Err(Error::corrupt(
                "document.docx",
                "not an OOXML package (legacy binary .doc is not readable)",
            ));
        }

        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extractor(FormatKind::Word, e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in &doc.document.children {
            // Tables are skipped, matching the body-paragraph view of the document
            if let DocumentChild::Paragraph(p) = child {
                let mut line = String::new();
                Self::collect_runs(&p.children, &mut line);
                paragraphs.push(line);
            }
        }

        Ok(paragraphs.join("\n"))
    }
}
