//! PowerPoint presentations (.pptx)

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Read;

use super::{is_zip, TextExtractor};
use crate::error::{Error, Result};
use crate::types::FormatKind;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

type Archive<'a> = zip::ZipArchive<std::io::Cursor<&'a [u8]>>;

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::extractor(FormatKind::Presentation, e.to_string())
}

/// Text of every shape on every slide, in document order
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationExtractor;

impl PresentationExtractor {
    /// Slide parts in the order the deck lists them (`p:sldIdLst`), falling
    /// back to slide-number order when the package has no usable list.
    fn slide_names(archive: &mut Archive<'_>) -> Result<Vec<String>> {
        if let (Some(presentation), Some(rels)) = (
            read_part(archive, PRESENTATION_PART)?,
            read_part(archive, PRESENTATION_RELS)?,
        ) {
            let targets = Self::relationship_targets(&rels)?;
            let listed: Vec<String> = Self::slide_rel_ids(&presentation)?
                .iter()
                .filter_map(|id| targets.get(id))
                .map(|target| resolve_target(target))
                .filter(|name| archive.file_names().any(|n| n == name))
                .collect();
            if !listed.is_empty() {
                return Ok(listed);
            }
            tracing::debug!("Slide list did not resolve to any slide part, using slide numbers");
        }
        Ok(Self::numbered_slides(archive))
    }

    /// Slide parts sorted by slide number (slide2 before slide10)
    fn numbered_slides(archive: &Archive<'_>) -> Vec<String> {
        let mut names: Vec<(u32, String)> = archive
            .file_names()
            .filter(|name| name.starts_with(SLIDE_PREFIX) && name.ends_with(".xml"))
            .filter_map(|name| {
                name.trim_start_matches(SLIDE_PREFIX)
                    .trim_end_matches(".xml")
                    .parse::<u32>()
                    .ok()
                    .map(|n| (n, name.to_string()))
            })
            .collect();
        names.sort_by_key(|(n, _)| *n);
        names.into_iter().map(|(_, name)| name).collect()
    }

    /// Relationship ids (`r:id`) of `<p:sldId>` entries, in deck order
    fn slide_rel_ids(xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        let mut ids = Vec::new();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                    for attr in e.attributes() {
                        let attr = attr.map_err(xml_error)?;
                        // the unprefixed `id` is the numeric slide id, not the relationship
                        if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
                            ids.push(attr.unescape_value().map_err(xml_error)?.into_owned());
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(ids)
    }

    /// `Id -> Target` for every relationship in a `.rels` part
    fn relationship_targets(xml: &str) -> Result<HashMap<String, String>> {
        let mut reader = Reader::from_str(xml);
        let mut targets = HashMap::new();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                    let mut id = None;
                    let mut target = None;
                    for attr in e.attributes() {
                        let attr = attr.map_err(xml_error)?;
                        match attr.key.as_ref() {
                            b"Id" => id = Some(attr.unescape_value().map_err(xml_error)?.into_owned()),
                            b"Target" => {
                                target = Some(attr.unescape_value().map_err(xml_error)?.into_owned())
                            }
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(target)) = (id, target) {
                        targets.insert(id, target);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(targets)
    }

    /// Texts of the `<p:sp>` shapes on one slide. A shape's paragraphs are
    /// joined with newlines; shapes without text are skipped.
    fn shape_texts(xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);

        let mut shapes = Vec::new();
        let mut shape_depth = 0usize;
        let mut in_text = false;
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current = String::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::extractor(FormatKind::Presentation, e.to_string()))?;

            match event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"sp" => {
                        shape_depth += 1;
                        if shape_depth == 1 {
                            paragraphs.clear();
                            current.clear();
                        }
                    }
                    b"p" if shape_depth > 0 => current.clear(),
                    b"t" if shape_depth > 0 => in_text = true,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"p" if shape_depth > 0 => paragraphs.push(String::new()),
                    b"br" if shape_depth > 0 => current.push('\n'),
                    _ => {}
                },
                Event::Text(t) if in_text => {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::extractor(FormatKind::Presentation, e.to_string()))?;
                    current.push_str(&text);
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if shape_depth > 0 => paragraphs.push(std::mem::take(&mut current)),
                    b"sp" if shape_depth > 0 => {
                        shape_depth -= 1;
                        if shape_depth == 0 {
                            let text = paragraphs.join("\n");
                            if !text.trim().is_empty() {
                                shapes.push(text);
                            }
                            paragraphs.clear();
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(shapes)
    }
}

/// Part contents, or `None` when the package does not contain it
fn read_part(archive: &mut Archive<'_>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(xml_error(e)),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

/// Package path of a relationship target relative to `ppt/`
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target.trim_start_matches("./")),
    }
}

impl TextExtractor for PresentationExtractor {
    fn format(&self) -> FormatKind {
        FormatKind::Presentation
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        if !is_zip(data) {
            return Err(Error::corrupt(
                "presentation.pptx",
                "not an OOXML package (legacy binary .ppt is not readable)",
            ));
        }

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))
            .map_err(|e| Error::corrupt("presentation.pptx", e.to_string()))?;

        let mut texts = Vec::new();
        for (slide_index, slide_name) in Self::slide_names(&mut archive)?.into_iter().enumerate() {
            let mut xml = String::new();
            archive
                .by_name(&slide_name)
                .map_err(xml_error)?
                .read_to_string(&mut xml)?;

            let shapes = Self::shape_texts(&xml)?;
            tracing::debug!(slide = slide_index + 1, shapes = shapes.len(), "Read slide");
            texts.extend(shapes);
        }

        Ok(texts.join("\n"))
    }
}
