//! Vector store abstraction

mod local;

pub use local::{INDEX_FILE, LocalVectorStore};

use crate::error::Result;
use async_trait::async_trait;
use supply_core::{ScoredSegment, TextSegment};

/// Persisted similarity index over text segments
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and store `segments`, returning how many were added
    async fn upsert(&self, segments: Vec<TextSegment>) -> Result<usize>;

    /// Up to `k` segments most similar to `query`, best first.
    ///
    /// An empty store yields an empty vector, not an error.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredSegment>>;

    /// Remove every entry
    async fn clear(&self) -> Result<()>;

    /// Number of stored entries
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Cosine similarity. Empty or zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
