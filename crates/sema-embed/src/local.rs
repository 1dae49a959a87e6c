//! In-process embedding with a candle BERT model.

use std::sync::Arc;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tokio::sync::OnceCell;

use crate::error::{EmbedError, Result};

/// Loaded BERT feature-extraction model.
#[derive(Clone)]
pub struct EmbedModel {
    model: Arc<BertModel>,
    tokenizer: Tokenizer,
    device: Device,
}

impl std::fmt::Debug for EmbedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedModel")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl EmbedModel {
    /// Load a BERT embedding model from the Hugging Face Hub.
    ///
    /// # Errors
    ///
    /// Returns an error if model download or loading fails.
    pub fn load(repo_id: &str, device: &Device) -> Result<Self> {
        let api = hf_hub::api::sync::Api::new()
            .map_err(|e| EmbedError::ModelLoad(format!("failed to create hub API client: {e}")))?;
        let repo = api.model(repo_id.to_owned());

        let config_path = repo.get("config.json").map_err(|e| {
            EmbedError::ModelLoad(format!("failed to download config.json from {repo_id}: {e}"))
        })?;
        let tokenizer_path = repo.get("tokenizer.json").map_err(|e| {
            EmbedError::ModelLoad(format!(
                "failed to download tokenizer.json from {repo_id}: {e}"
            ))
        })?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            EmbedError::ModelLoad(format!(
                "failed to download model.safetensors from {repo_id}: {e}"
            ))
        })?;

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| EmbedError::ModelLoad(format!("failed to read BERT config: {e}")))?;
        let config: BertConfig = serde_json::from_str(&config_str)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbedError::ModelLoad(format!("failed to load tokenizer: {e}")))?;

        // SAFETY: file is a valid safetensors downloaded from the hub, not
        // modified during the VarBuilder lifetime
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };
        let model = BertModel::load(vb, &config)?;

        Ok(Self {
            model: Arc::new(model),
            tokenizer,
            device: device.clone(),
        })
    }

    /// Embed one text: mean pooling over token vectors, then L2
    /// normalization.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenization or the forward pass fails.
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbedError::Inference(format!("tokenizer encode failed: {e}")))?;

        let token_ids = encoding.get_ids();
        let token_type_ids: Vec<u32> = vec![0; token_ids.len()];

        let input_ids = Tensor::new(token_ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(token_type_ids.as_slice(), &self.device)?.unsqueeze(0)?;

        let embeddings = self.model.forward(&input_ids, &token_type_ids, None)?;

        let seq_len = embeddings.dim(1)?;
        let sum = embeddings.sum(1)?;
        let mean_pooled = (sum
            / f64::from(
                u32::try_from(seq_len)
                    .map_err(|e| EmbedError::Inference(format!("sequence length overflow: {e}")))?,
            ))?;

        let norm = mean_pooled.sqr()?.sum_keepdim(1)?.sqrt()?;
        let normalized = mean_pooled.broadcast_div(&norm)?.squeeze(0)?;

        normalized.to_vec1::<f32>().map_err(EmbedError::Candle)
    }
}

/// Lazily loaded local embedder. The model downloads and loads on first
/// use, then every subsequent text in the same batcher reuses it.
#[derive(Debug)]
pub struct LocalEmbedder {
    repo_id: String,
    model: OnceCell<EmbedModel>,
}

impl LocalEmbedder {
    #[must_use]
    pub fn new(repo_id: impl Into<String>) -> Self {
        Self {
            repo_id: repo_id.into(),
            model: OnceCell::new(),
        }
    }

    async fn model(&self) -> Result<&EmbedModel> {
        self.model
            .get_or_try_init(|| async {
                let repo_id = self.repo_id.clone();
                tracing::info!(model = %repo_id, "loading local embedding model");
                tokio::task::spawn_blocking(move || EmbedModel::load(&repo_id, &Device::Cpu))
                    .await
                    .map_err(|e| EmbedError::ModelLoad(format!("model load task failed: {e}")))?
            })
            .await
    }

    /// Embed one text on a blocking worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or inference fails.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = self.model().await?.clone();
        let owned = text.to_owned();
        tokio::task::spawn_blocking(move || model.embed_sync(&owned))
            .await
            .map_err(|e| EmbedError::Inference(format!("embedding task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedder_constructs_without_loading() {
        let embedder = LocalEmbedder::new("sentence-transformers/all-MiniLM-L6-v2");
        assert!(embedder.model.get().is_none());
    }

    #[tokio::test]
    #[ignore = "downloads a model from the Hugging Face Hub"]
    async fn integration_local_embed() {
        let embedder = LocalEmbedder::new("sentence-transformers/all-MiniLM-L6-v2");
        let vector = embedder.embed("fn main() {}").await.unwrap();
        assert_eq!(vector.len(), 384);

        // L2-normalized output.
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}
