//! Similarity retrieval over indexed chunks

mod search;

pub use search::{QueryService, DEFAULT_TOP_K};
