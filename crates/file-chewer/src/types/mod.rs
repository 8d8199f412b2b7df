//! Core types for the extraction pipeline

pub mod document;
pub mod format;

pub use document::{Chunk, Extraction, IngestedDocument, OcrOutcome, SourceDocument};
pub use format::{classify, FormatKind, FormatRegistry};
