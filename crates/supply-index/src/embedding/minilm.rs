//! all-MiniLM-L6-v2 sentence embeddings computed locally with candle

use super::{Embedder, l2_normalize};
use crate::error::{IndexError, Result};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{Repo, RepoType, api::sync::Api};
use std::sync::Arc;
use tokenizers::{PaddingParams, Tokenizer};
use tracing::info;

const EMBEDDING_DIM: usize = 384;

fn model_err(context: &str) -> impl Fn(candle_core::Error) -> IndexError + '_ {
    move |e| IndexError::Embedding(format!("{context}: {e}"))
}

/// Sentence-transformers MiniLM model downloaded from the Hugging Face hub
pub struct MiniLmEmbedder {
    model_id: String,
    inner: Arc<Loaded>,
}

struct Loaded {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl MiniLmEmbedder {
    /// Download (on first use) and load the model
    pub async fn load(model_id: &str) -> Result<Self> {
        let id = model_id.to_string();
        let loaded = tokio::task::spawn_blocking(move || load_model(&id))
            .await
            .map_err(|e| IndexError::Embedding(format!("model loading task failed: {e}")))??;

        info!(model = model_id, "Loaded local embedding model");
        Ok(Self {
            model_id: model_id.to_string(),
            inner: Arc::new(loaded),
        })
    }
}

fn load_model(model_id: &str) -> Result<Loaded> {
    let device = Device::Cpu;
    let hub_err = |e: hf_hub::api::sync::ApiError| IndexError::Embedding(format!("hub download failed: {e}"));

    let api = Api::new().map_err(hub_err)?;
    let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));
    let config_path = repo.get("config.json").map_err(hub_err)?;
    let tokenizer_path = repo.get("tokenizer.json").map_err(hub_err)?;
    let weights_path = repo.get("model.safetensors").map_err(hub_err)?;

    let config: Config = serde_json::from_str(&std::fs::read_to_string(config_path)?)?;
    let mut tokenizer = Tokenizer::from_file(tokenizer_path)
        .map_err(|e| IndexError::Embedding(format!("failed to load tokenizer: {e}")))?;
    tokenizer.with_padding(Some(PaddingParams::default()));

    // SAFETY: the safetensors file is owned by the hub cache and not modified while mapped
    #[allow(unsafe_code)]
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
            .map_err(model_err("failed to map weights"))?
    };
    let model = BertModel::load(vb, &config).map_err(model_err("failed to build model"))?;

    Ok(Loaded {
        model,
        tokenizer,
        device,
    })
}

impl Loaded {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| IndexError::Embedding(format!("tokenization failed: {e}")))?;

        let ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()
            .map_err(model_err("token ids"))?;
        let masks = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()
            .map_err(model_err("attention mask"))?;

        let input_ids = Tensor::stack(&ids, 0).map_err(model_err("batch ids"))?;
        let attention_mask = Tensor::stack(&masks, 0).map_err(model_err("batch mask"))?;
        let token_type_ids = input_ids.zeros_like().map_err(model_err("token types"))?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(model_err("forward pass"))?;
        let pooled = mean_pool(&hidden, &attention_mask).map_err(model_err("pooling"))?;

        let mut vectors = pooled.to_vec2::<f32>().map_err(model_err("output"))?;
        for vector in &mut vectors {
            l2_normalize(vector);
        }
        Ok(vectors)
    }
}

/// Mean of the token embeddings, ignoring padding
fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask = attention_mask
        .unsqueeze(2)?
        .expand(hidden.shape())?
        .to_dtype(hidden.dtype())?;
    let summed = (hidden * &mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
    summed.broadcast_div(&counts)
}

#[async_trait]
impl Embedder for MiniLmEmbedder {
    fn name(&self) -> String {
        format!("minilm:{}", self.model_id)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let inner = Arc::clone(&self.inner);
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || inner.embed(&texts))
            .await
            .map_err(|e| IndexError::Embedding(format!("embedding task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::cosine_similarity;

    const MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

    #[tokio::test]
    #[ignore] // downloads the model
    async fn test_embedding_dimension() {
        let embedder = MiniLmEmbedder::load(MODEL).await.unwrap();
        let vectors = embedder.embed(&["Microchip".to_string()]).await.unwrap();
        assert_eq!(vectors[0].len(), EMBEDDING_DIM);
    }

    #[tokio::test]
    #[ignore] // downloads the model
    async fn test_related_texts_score_higher() {
        let embedder = MiniLmEmbedder::load(MODEL).await.unwrap();
        let texts = vec![
            "semiconductor supplier in Taiwan".to_string(),
            "chip factory in Hsinchu".to_string(),
            "cotton fabric from Brazil".to_string(),
        ];
        let v = embedder.embed(&texts).await.unwrap();
        assert!(cosine_similarity(&v[0], &v[1]) > cosine_similarity(&v[0], &v[2]));
    }
}
