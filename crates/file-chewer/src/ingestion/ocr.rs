//! OCR fallback for PDFs whose embedded text layer is unusable
//!
//! A text layer is suspect when it has too few letters, too low a letter
//! ratio, or contains the `/gid` glyph marker left by broken font maps. Suspect
//! text is re-derived by rasterizing each page and running OCR; the OCR text
//! wins only if it has strictly more alphabetic characters.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::config::OcrConfig;
use crate::error::{Error, Result};
use crate::types::OcrOutcome;

/// One rasterized PDF page
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// PNG-encoded image
    pub png: Vec<u8>,
}

/// Rasterizer plus character recognizer
pub trait OcrEngine: Send + Sync {
    /// Render every page of a PDF to an image, in page order
    fn render_pages(&self, pdf: &[u8]) -> Result<Vec<PageImage>>;

    /// Recognize the text on one page image
    fn recognize(&self, image: &PageImage) -> Result<String>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// Count of alphabetic characters
pub fn alpha_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

/// Measurements behind the suspect-text decision
#[derive(Debug, Clone, PartialEq)]
pub struct TextQuality {
    pub alpha_chars: usize,
    pub total_chars: usize,
    pub alpha_ratio: f64,
    pub has_glyph_marker: bool,
    pub suspect: bool,
}

/// Thresholds for judging a PDF text layer
#[derive(Debug, Clone)]
pub struct QualityPolicy {
    pub min_alpha_chars: usize,
    pub min_alpha_ratio: f64,
    pub glyph_marker: String,
}

impl QualityPolicy {
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            min_alpha_chars: config.min_alpha_chars,
            min_alpha_ratio: config.min_alpha_ratio,
            glyph_marker: config.glyph_marker.clone(),
        }
    }

    /// Measure text against the thresholds. Any single failed check makes it suspect.
    pub fn assess(&self, text: &str) -> TextQuality {
        let alpha_chars = alpha_count(text);
        let total_chars = text.chars().count();
        let alpha_ratio = if total_chars == 0 {
            0.0
        } else {
            alpha_chars as f64 / total_chars as f64
        };
        let has_glyph_marker = !self.glyph_marker.is_empty() && text.contains(&self.glyph_marker);

        TextQuality {
            alpha_chars,
            total_chars,
            alpha_ratio,
            has_glyph_marker,
            suspect: alpha_chars < self.min_alpha_chars
                || alpha_ratio < self.min_alpha_ratio
                || has_glyph_marker,
        }
    }
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self::from_config(&OcrConfig::default())
    }
}

/// Decides whether to OCR a PDF and which text to keep
#[derive(Clone)]
pub struct OcrFallback {
    policy: QualityPolicy,
    engine: Option<Arc<dyn OcrEngine>>,
}

impl OcrFallback {
    pub fn new(policy: QualityPolicy, engine: Option<Arc<dyn OcrEngine>>) -> Self {
        Self { policy, engine }
    }

    /// Fallback with no engine: suspect text is reported as `Skipped`
    pub fn disabled(policy: QualityPolicy) -> Self {
        Self::new(policy, None)
    }

    /// Build from configuration, using Tesseract when OCR is enabled
    pub fn from_config(config: &OcrConfig) -> Self {
        let engine: Option<Arc<dyn OcrEngine>> = if config.enabled {
            Some(Arc::new(TesseractOcr::from_config(config)))
        } else {
            None
        };
        Self::new(QualityPolicy::from_config(config), engine)
    }

    pub fn policy(&self) -> &QualityPolicy {
        &self.policy
    }

    /// Return the text to keep and what OCR did. Never fails: OCR errors
    /// leave the original text in place and are reported as `Degraded`.
    pub fn apply(&self, pdf: &[u8], text: String) -> (String, OcrOutcome) {
        let quality = self.policy.assess(&text);
        if !quality.suspect {
            return (text, OcrOutcome::NotRequired);
        }

        tracing::debug!(
            alpha = quality.alpha_chars,
            ratio = quality.alpha_ratio,
            glyph_marker = quality.has_glyph_marker,
            "PDF text layer looks suspect"
        );

        let Some(engine) = &self.engine else {
            return (text, OcrOutcome::Skipped);
        };

        match Self::run(engine.as_ref(), pdf) {
            Ok(ocr_text) => {
                let ocr_alpha = alpha_count(&ocr_text);
                let original_alpha = quality.alpha_chars;
                if ocr_alpha > original_alpha {
                    tracing::info!(
                        "OCR ({}) replaced PDF text: {} -> {} alphabetic chars",
                        engine.name(),
                        original_alpha,
                        ocr_alpha
                    );
                    (ocr_text, OcrOutcome::Replaced { original_alpha, ocr_alpha })
                } else {
                    (text, OcrOutcome::KeptOriginal { original_alpha, ocr_alpha })
                }
            }
            Err(e) => {
                tracing::warn!("OCR fallback failed, keeping original text: {}", e);
                (text, OcrOutcome::Degraded { reason: e.to_string() })
            }
        }
    }

    /// Render and recognize every page; each page's text ends with a newline
    fn run(engine: &dyn OcrEngine, pdf: &[u8]) -> Result<String> {
        let pages = engine.render_pages(pdf)?;
        let mut text = String::new();
        for page in &pages {
            text.push_str(&engine.recognize(page)?);
            text.push('\n');
        }
        Ok(text)
    }
}

impl std::fmt::Debug for OcrFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrFallback")
            .field("policy", &self.policy)
            .field("engine", &self.engine.as_ref().map(|e| e.name().to_string()))
            .finish()
    }
}

/// OCR through poppler's `pdftoppm` and the `tesseract` CLI
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    pdftoppm_bin: PathBuf,
    tesseract_bin: PathBuf,
    dpi: u32,
    language: String,
}

impl TesseractOcr {
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            pdftoppm_bin: config.pdftoppm_bin.clone(),
            tesseract_bin: config.tesseract_bin.clone(),
            dpi: config.dpi,
            language: config.language.clone(),
        }
    }

    /// Check if an executable can be spawned
    fn is_available(bin: &Path, version_flag: &str) -> bool {
        Command::new(bin)
            .arg(version_flag)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn page_number(path: &Path) -> Option<u32> {
        path.file_stem()?
            .to_str()?
            .rsplit('-')
            .next()?
            .parse()
            .ok()
    }
}

impl OcrEngine for TesseractOcr {
    fn render_pages(&self, pdf: &[u8]) -> Result<Vec<PageImage>> {
        if !Self::is_available(&self.pdftoppm_bin, "-v") {
            return Err(Error::ocr(format!(
                "{} not found (install poppler-utils)",
                self.pdftoppm_bin.display()
            )));
        }

        let temp_dir = tempfile::tempdir()?;
        let pdf_path = temp_dir.path().join("input.pdf");
        std::fs::write(&pdf_path, pdf)?;

        let output = Command::new(&self.pdftoppm_bin)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&pdf_path)
            .arg(temp_dir.path().join("page"))
            .output()
            .map_err(|e| Error::ocr(format!("pdftoppm failed to start: {}", e)))?;

        if !output.status.success() {
            return Err(Error::ocr(format!(
                "pdftoppm error: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mut pages = Vec::new();
        for entry in std::fs::read_dir(temp_dir.path())? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "png") {
                if let Some(page_number) = Self::page_number(&path) {
                    pages.push(PageImage {
                        page_number,
                        png: std::fs::read(&path)?,
                    });
                }
            }
        }
        pages.sort_by_key(|p| p.page_number);

        if pages.is_empty() {
            return Err(Error::ocr("pdftoppm produced no page images"));
        }
        tracing::debug!("Rasterized {} pages at {} DPI", pages.len(), self.dpi);
        Ok(pages)
    }

    fn recognize(&self, image: &PageImage) -> Result<String> {
        let mut child = Command::new(&self.tesseract_bin)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::ocr(format!(
                    "{} failed to start: {}",
                    self.tesseract_bin.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&image.png)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::ocr(format!(
                "tesseract failed on page {}: {}",
                image.page_number,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
