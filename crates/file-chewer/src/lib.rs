//! file-chewer: multi-format text extraction and chunking for RAG ingestion
//!
//! Uploaded files are classified by media type or extension, routed to a
//! format-specific extractor (plain text, PDF, Word, spreadsheets, slides,
//! HTML, MHTML, XML), rescued by OCR when a PDF's text layer is unusable,
//! and split into sentence-aware overlapping chunks ready for embedding.
//!
//! ```no_run
//! use file_chewer::{ExtractionOrchestrator, SourceDocument, create_chunks};
//!
//! let orchestrator = ExtractionOrchestrator::default();
//! let doc = SourceDocument::from_path("report.pdf")?;
//! let text = orchestrator.extract_text(&doc)?;
//! let chunks = create_chunks(&text, 512, 50);
//! # Ok::<(), file_chewer::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::ChewerConfig;
pub use error::{Error, Result};
pub use ingestion::{create_chunks, ChunkManager, ExtractionOrchestrator, IngestPipeline};
pub use retrieval::QueryService;
pub use types::{
    classify, Chunk, Extraction, FormatKind, FormatRegistry, IngestedDocument, OcrOutcome, SourceDocument,
};
