//! Ingestion pipeline: extract, chunk, embed, store

use futures::future::join_all;
use std::sync::Arc;
use uuid::Uuid;

use super::chunker::ChunkManager;
use super::orchestrator::ExtractionOrchestrator;
use crate::config::ChewerConfig;
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, StoredChunk, VectorStoreProvider};
use crate::types::{IngestedDocument, SourceDocument};

/// Summary of one indexed upload
#[derive(Debug, Clone)]
pub struct IndexReport {
    /// Upload identifier the chunks were stored under
    pub file_id: Uuid,
    /// Original filename
    pub filename: String,
    /// Chunks embedded and stored
    pub chunks_indexed: usize,
}

/// Pipeline for processing uploads into chunks
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    orchestrator: Arc<ExtractionOrchestrator>,
    chunker: ChunkManager,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(orchestrator: Arc<ExtractionOrchestrator>, chunker: ChunkManager) -> Self {
        Self { orchestrator, chunker }
    }

    pub fn from_config(config: &ChewerConfig) -> Self {
        Self::new(
            Arc::new(ExtractionOrchestrator::from_config(config)),
            ChunkManager::from_config(&config.chunking),
        )
    }

    pub fn orchestrator(&self) -> &ExtractionOrchestrator {
        &self.orchestrator
    }

    pub fn chunker(&self) -> &ChunkManager {
        &self.chunker
    }

    /// Extract and chunk one upload.
    ///
    /// A document with no extractable text is not an error; it yields an
    /// empty chunk list.
    pub fn ingest(&self, source: &SourceDocument) -> Result<IngestedDocument> {
        let extraction = self.orchestrator.extract(source)?;
        let chunks = self.chunker.chunk(&extraction.text);

        if chunks.is_empty() {
            tracing::warn!("No text extracted from {}", source.filename());
        }

        let document = IngestedDocument::new(source.filename(), extraction, chunks);
        tracing::info!(
            file_id = %document.file_id,
            format = %document.format,
            "Ingested {}: {} chars, {} chunks",
            document.filename,
            document.text.len(),
            document.chunks.len()
        );
        Ok(document)
    }

    /// Ingest on the blocking pool, then embed and store the chunks
    pub async fn index(
        &self,
        source: SourceDocument,
        embedder: &dyn EmbeddingProvider,
        store: &dyn VectorStoreProvider,
    ) -> Result<IndexReport> {
        let pipeline = self.clone();
        let document = tokio::task::spawn_blocking(move || pipeline.ingest(&source))
            .await
            .map_err(|e| Error::internal(format!("extraction task failed: {}", e)))??;

        let texts = document.chunk_texts();
        if texts.is_empty() {
            return Ok(IndexReport {
                file_id: document.file_id,
                filename: document.filename,
                chunks_indexed: 0,
            });
        }

        let vectors = embedder.embed_batch(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(Error::embedding(format!(
                "{} returned {} embeddings for {} chunks",
                embedder.name(),
                vectors.len(),
                texts.len()
            )));
        }

        let stored: Vec<StoredChunk> = document
            .chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| StoredChunk {
                id: Uuid::new_v4(),
                file_id: document.file_id,
                chunk_index: chunk.index,
                text: chunk.content.clone(),
                vector,
            })
            .collect();
        let chunks_indexed = stored.len();
        store.add(stored).await?;

        tracing::info!(
            "Indexed {} chunks from {} into {}",
            chunks_indexed,
            document.filename,
            store.name()
        );

        Ok(IndexReport {
            file_id: document.file_id,
            filename: document.filename,
            chunks_indexed,
        })
    }

    /// Index several uploads concurrently; results keep input order
    pub async fn index_all(
        &self,
        sources: Vec<SourceDocument>,
        embedder: &dyn EmbeddingProvider,
        store: &dyn VectorStoreProvider,
    ) -> Vec<Result<IndexReport>> {
        let futures = sources
            .into_iter()
            .map(|source| self.index(source, embedder, store));
        join_all(futures).await
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::from_config(&ChewerConfig::default())
    }
}
