//! Document ingestion: extraction, OCR fallback, chunking

pub mod chunker;
pub mod extractors;
pub mod ocr;
mod orchestrator;
mod processor;

pub use chunker::{create_chunks, split_sentences, ChunkManager};
pub use extractors::{ExtractorTable, TextExtractor};
pub use ocr::{OcrEngine, OcrFallback, PageImage, QualityPolicy, TesseractOcr};
pub use orchestrator::ExtractionOrchestrator;
pub use processor::{IndexReport, IngestPipeline};
