//! Error types for extraction and chunking

use thiserror::Error;

use crate::types::FormatKind;

/// Result type alias for file-chewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Extraction pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// No extractor matches the file's media type or extension
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Bytes are unreadable or malformed for the claimed format
    #[error("Corrupt input '{filename}': {message}")]
    CorruptInput { filename: String, message: String },

    /// The underlying parser failed while reading a well-formed container
    #[error("{format} extractor failed: {message}")]
    ExtractorFailure { format: FormatKind, message: String },

    /// OCR tooling is missing or failed; never surfaced by the orchestrator
    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector store error
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a corrupt input error
    pub fn corrupt(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptInput {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an extractor failure
    pub fn extractor(format: FormatKind, message: impl Into<String>) -> Self {
        Self::ExtractorFailure {
            format,
            message: message.into(),
        }
    }

    /// Create an OCR unavailable error
    pub fn ocr(message: impl Into<String>) -> Self {
        Self::OcrUnavailable(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector store error
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the caller sent something we cannot process (4xx-equivalent).
    ///
    /// Everything else is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_) | Error::CorruptInput { .. } | Error::Config(_)
        )
    }

    /// Short machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::CorruptInput { .. } => "corrupt_input",
            Error::ExtractorFailure { .. } => "extractor_failure",
            Error::OcrUnavailable(_) => "ocr_unavailable",
            Error::Config(_) => "config_error",
            Error::Embedding(_) => "embedding_error",
            Error::VectorStore(_) => "vector_store_error",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }
}
