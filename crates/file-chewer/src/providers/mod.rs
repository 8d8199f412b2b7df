//! Provider abstractions for embeddings and vector storage
//!
//! The embedding model and the vector database are external collaborators;
//! only the traits and an in-memory store live here.

pub mod embedding;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use vector_store::{InMemoryVectorStore, StoredChunk, VectorSearchResult, VectorStoreProvider};
