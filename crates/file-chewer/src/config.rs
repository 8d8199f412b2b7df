//! Configuration for extraction and chunking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{FormatKind, FormatRegistry};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChewerConfig {
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// OCR fallback configuration
    #[serde(default)]
    pub ocr: OcrConfig,
    /// Format registry additions
    #[serde(default)]
    pub formats: FormatsConfig,
}

impl ChewerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: ChewerConfig = toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CHEWER_*` environment overrides
    pub fn apply_env(mut self) -> Result<Self> {
        if let Some(size) = env_parse::<usize>("CHEWER_CHUNK_SIZE")? {
            self.chunking.chunk_size = size;
        }
        if let Some(overlap) = env_parse::<usize>("CHEWER_CHUNK_OVERLAP")? {
            self.chunking.overlap = overlap;
        }
        if let Some(enabled) = env_parse::<bool>("CHEWER_OCR_ENABLED")? {
            self.ocr.enabled = enabled;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be greater than 0".into()));
        }
        if !(0.0..=1.0).contains(&self.ocr.min_alpha_ratio) {
            return Err(Error::Config(format!(
                "ocr.min_alpha_ratio must be within [0, 1], got {}",
                self.ocr.min_alpha_ratio
            )));
        }
        if self.ocr.dpi == 0 {
            return Err(Error::Config("ocr.dpi must be greater than 0".into()));
        }
        Ok(())
    }

    /// Build the format registry: built-ins plus configured media types
    pub fn format_registry(&self) -> FormatRegistry {
        FormatRegistry::builtin().with_media_types(
            self.formats
                .media_types
                .iter()
                .map(|(media_type, kind)| (media_type.as_str(), *kind)),
        )
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={}: {}", key, value, e))),
        Err(_) => Ok(None),
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Size budget in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Trailing sentence units carried into the next chunk
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_chunk_size() -> usize { 512 }
fn default_overlap() -> usize { 50 }

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

/// OCR fallback configuration for low-quality PDF text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Run OCR when PDF text looks suspect
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fewer alphabetic characters than this is suspect
    #[serde(default = "default_min_alpha_chars")]
    pub min_alpha_chars: usize,
    /// Alphabetic / total character ratio below this is suspect
    #[serde(default = "default_min_alpha_ratio")]
    pub min_alpha_ratio: f64,
    /// Substring left behind by broken font glyph mapping
    #[serde(default = "default_glyph_marker")]
    pub glyph_marker: String,
    /// Rasterization resolution
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Tesseract language
    #[serde(default = "default_language")]
    pub language: String,
    /// pdftoppm executable
    #[serde(default = "default_pdftoppm")]
    pub pdftoppm_bin: PathBuf,
    /// tesseract executable
    #[serde(default = "default_tesseract")]
    pub tesseract_bin: PathBuf,
}

fn default_true() -> bool { true }
fn default_min_alpha_chars() -> usize { 50 }
fn default_min_alpha_ratio() -> f64 { 0.2 }
fn default_glyph_marker() -> String { "/gid".to_string() }
fn default_dpi() -> u32 { 150 }
fn default_language() -> String { "eng".to_string() }
fn default_pdftoppm() -> PathBuf { PathBuf::from("pdftoppm") }
fn default_tesseract() -> PathBuf { PathBuf::from("tesseract") }

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            min_alpha_chars: default_min_alpha_chars(),
            min_alpha_ratio: default_min_alpha_ratio(),
            glyph_marker: default_glyph_marker(),
            dpi: default_dpi(),
            language: default_language(),
            pdftoppm_bin: default_pdftoppm(),
            tesseract_bin: default_tesseract(),
        }
    }
}

/// Extra media type routes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatsConfig {
    /// Media type -> format
    #[serde(default)]
    pub media_types: HashMap<String, FormatKind>,
}
