//! Text embedding backends

mod hashing;
#[cfg(feature = "local-embeddings")]
mod minilm;
mod openai;

pub use hashing::HashingEmbedder;
#[cfg(feature = "local-embeddings")]
pub use minilm::MiniLmEmbedder;
pub use openai::OpenAiEmbedder;

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use supply_core::{EmbeddingBackend, EmbeddingConfig};

/// Maps texts to fixed-size vectors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier persisted with an index so it is never queried with another model
    fn name(&self) -> String;

    /// Length of every vector this embedder returns
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per text in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Create the embedder selected by `config`
pub async fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::Hashing => Ok(Arc::new(HashingEmbedder::new(config.dimension)?)),
        EmbeddingBackend::OpenAi => Ok(Arc::new(OpenAiEmbedder::from_config(config)?)),
        #[cfg(feature = "local-embeddings")]
        EmbeddingBackend::MiniLm => Ok(Arc::new(MiniLmEmbedder::load(&config.local_model).await?)),
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingBackend::MiniLm => Err(crate::error::IndexError::Config(
            "the minilm backend requires building with the `local-embeddings` feature".to_string(),
        )),
    }
}

/// Scale `vector` to unit length in place. Zero vectors are left untouched.
pub(crate) fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
