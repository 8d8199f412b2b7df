//! Query service: embed the question, search the store, return chunk texts

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorSearchResult, VectorStoreProvider};

/// Chunks returned when the caller does not ask for a specific count
pub const DEFAULT_TOP_K: usize = 3;

/// Retrieves the chunks most similar to a query
#[derive(Clone)]
pub struct QueryService {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl QueryService {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStoreProvider>) -> Self {
        Self { embedder, store }
    }

    /// Chunk texts ranked by similarity, best first
    pub async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>> {
        Ok(self
            .search(text, top_k)
            .await?
            .into_iter()
            .map(|r| r.text)
            .collect())
    }

    /// Ranked results with scores
    pub async fn search(&self, text: &str, top_k: usize) -> Result<Vec<VectorSearchResult>> {
        if text.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(text).await?;
        let results = self.store.search(&query_vector, top_k).await?;

        tracing::debug!(
            embedder = self.embedder.name(),
            store = self.store.name(),
            "Query matched {} chunks",
            results.len()
        );
        Ok(results)
    }
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService")
            .field("embedder", &self.embedder.name())
            .field("store", &self.store.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{InMemoryVectorStore, StoredChunk};
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Keyword presence vector over a tiny vocabulary
    struct KeywordEmbedder;

    const VOCAB: [&str; 4] = ["invoice", "holiday", "server", "budget"];

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(VOCAB
                .iter()
                .map(|word| if lower.contains(word) { 1.0 } else { 0.0 })
                .collect())
        }

        fn dimensions(&self) -> usize {
            VOCAB.len()
        }

        fn name(&self) -> &str {
            "keywords"
        }
    }

    async fn service_with(texts: &[&str]) -> QueryService {
        let embedder = Arc::new(KeywordEmbedder);
        let store = Arc::new(InMemoryVectorStore::new());
        let file_id = Uuid::new_v4();
        let mut chunks = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            chunks.push(StoredChunk {
                id: Uuid::new_v4(),
                file_id,
                chunk_index: i,
                text: text.to_string(),
                vector: embedder.embed(text).await.unwrap(),
            });
        }
        store.add(chunks).await.unwrap();
        QueryService::new(embedder, store)
    }

    #[tokio::test]
    async fn test_query_returns_best_match_first() {
        let service = service_with(&[
            "The holiday schedule is posted.",
            "Pay the invoice by Friday.",
            "The server restarts nightly.",
        ])
        .await;

        let texts = service.query("When is the invoice due?", DEFAULT_TOP_K).await.unwrap();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], "Pay the invoice by Friday.");
    }

    #[tokio::test]
    async fn test_query_respects_top_k() {
        let service = service_with(&["invoice one.", "invoice two.", "budget three."]).await;
        assert_eq!(service.query("invoice", 1).await.unwrap().len(), 1);
        assert!(service.query("invoice", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_returns_nothing() {
        let service = service_with(&["invoice one."]).await;
        assert!(service.query("   ", 3).await.unwrap().is_empty());
    }
}
