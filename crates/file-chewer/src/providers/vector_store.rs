//! Vector store provider trait and an in-memory implementation

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// One stored chunk vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Chunk id
    pub id: Uuid,
    /// Upload the chunk came from
    pub file_id: Uuid,
    /// Chunk index within the upload
    pub chunk_index: usize,
    /// Chunk text
    pub text: String,
    /// Embedding
    pub vector: Vec<f32>,
}

/// Search result from vector store
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// Chunk text
    pub text: String,
    /// Upload the chunk came from
    pub file_id: Uuid,
    /// Cosine similarity (higher is more similar)
    pub score: f32,
}

/// Trait for vector storage and similarity search
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert chunk vectors
    async fn add(&self, chunks: Vec<StoredChunk>) -> Result<()>;

    /// Top `k` chunks by similarity to the query vector
    async fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<VectorSearchResult>>;

    /// Delete all chunks for an upload
    async fn delete_by_file(&self, file_id: &Uuid) -> Result<usize>;

    /// Get total number of vectors stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Brute-force cosine store held in memory
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    chunks: RwLock<Vec<StoredChunk>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn add(&self, chunks: Vec<StoredChunk>) -> Result<()> {
        let mut stored = self.chunks.write();
        // an empty store takes its dimension from the first incoming vector
        let expected = stored.first().or_else(|| chunks.first()).map(|c| c.vector.len());
        if let Some(expected) = expected {
            if let Some(bad) = chunks.iter().find(|c| c.vector.len() != expected) {
                return Err(Error::vector_store(format!(
                    "dimension mismatch: expected {}, got {}",
                    expected,
                    bad.vector.len()
                )));
            }
        }
        stored.extend(chunks);
        Ok(())
    }

    async fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<VectorSearchResult>> {
        let stored = self.chunks.read();
        let mut results: Vec<VectorSearchResult> = stored
            .iter()
            .map(|chunk| VectorSearchResult {
                text: chunk.text.clone(),
                file_id: chunk.file_id,
                score: cosine_similarity(query_vector, &chunk.vector),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(k);
        Ok(results)
    }

    async fn delete_by_file(&self, file_id: &Uuid) -> Result<usize> {
        let mut stored = self.chunks.write();
        let before = stored.len();
        stored.retain(|c| c.file_id != *file_id);
        Ok(before - stored.len())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.chunks.read().len())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
