//! Sentence-aware chunking with sentence-count overlap
//!
//! Text is split into sentence units after `.`, `!` or `?` followed by
//! whitespace. Units are packed into chunks until the next one would push the
//! summed unit length over `chunk_size`; the next chunk then starts with the
//! last `overlap` units of the previous one. A unit is never cut, so a single
//! sentence longer than the budget becomes an oversized chunk, and carried
//! units can push a chunk past the budget when `overlap > 0`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChunkingConfig;
use crate::types::Chunk;

static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("static regex"));

/// Split text into sentence units. Terminal punctuation stays with its
/// sentence; the separating whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0usize;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // punctuation is ASCII, so +1 stays on a char boundary
        let end = boundary.start() + 1;
        if end > start {
            units.push(&text[start..end]);
        }
        start = boundary.end();
    }
    if start < text.len() {
        units.push(&text[start..]);
    }

    units
}

fn char_len(unit: &str) -> usize {
    unit.chars().count()
}

/// Packs sentence units into bounded, overlapping chunks
#[derive(Debug, Clone, Copy)]
pub struct ChunkManager {
    /// Size budget in characters (summed unit length)
    chunk_size: usize,
    /// Trailing units carried into the next chunk
    overlap: usize,
}

impl ChunkManager {
    /// Create a new chunk manager
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self { chunk_size, overlap }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk texts in document order
    pub fn create_chunks(&self, text: &str) -> Vec<String> {
        self.chunk(text).into_iter().map(|c| c.content).collect()
    }

    /// Chunks with index and overlap bookkeeping
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut buffer: Vec<&str> = Vec::new();
        let mut current_len = 0usize;
        let mut carried = 0usize;

        for unit in split_sentences(text) {
            let unit_len = char_len(unit);

            if !buffer.is_empty() && current_len + unit_len > self.chunk_size {
                Self::close(&mut chunks, &buffer, carried);

                let seed = self.overlap_seed(&buffer);
                carried = seed.len();
                current_len = seed.iter().map(|u| char_len(u)).sum();
                buffer = seed;
            }

            buffer.push(unit);
            current_len += unit_len;
        }

        if !buffer.is_empty() {
            Self::close(&mut chunks, &buffer, carried);
        }

        tracing::debug!(
            chunks = chunks.len(),
            chunk_size = self.chunk_size,
            overlap = self.overlap,
            "Chunked text"
        );
        chunks
    }

    /// The last `overlap` units of a closed chunk (all of them when it is
    /// shorter), which start the next chunk.
    fn overlap_seed<'a>(&self, closed: &[&'a str]) -> Vec<&'a str> {
        closed[closed.len().saturating_sub(self.overlap)..].to_vec()
    }

    fn close(chunks: &mut Vec<Chunk>, units: &[&str], overlap_units: usize) {
        let content = units.join(" ");
        if content.trim().is_empty() {
            return;
        }
        chunks.push(Chunk {
            index: chunks.len(),
            content,
            unit_count: units.len(),
            overlap_units,
        });
    }
}

impl Default for ChunkManager {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

/// Chunk text with the given budget and sentence overlap
pub fn create_chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    ChunkManager::new(chunk_size, overlap).create_chunks(text)
}
