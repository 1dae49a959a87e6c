//! Batch embedding with oversized-text splitting.

use crate::config::EmbedConfig;
use crate::error::Result;
use crate::provider::{AnyEmbedder, Embedder};
use crate::splitter::split_by_token_limit;

/// Vectors paired positionally with the exact texts that produced them.
///
/// `texts` reflects post-split slices: once splitting has occurred there is
/// no 1:1 correspondence with the caller's input text list.
#[derive(Debug, Default)]
pub struct EmbeddingBatch {
    pub vectors: Vec<Vec<f32>>,
    pub texts: Vec<String>,
}

/// Embeds batches of chunk texts through the configured provider.
#[derive(Debug)]
pub struct EmbeddingBatcher {
    config: EmbedConfig,
    embedder: AnyEmbedder,
}

impl EmbeddingBatcher {
    /// Build a batcher for `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the selected remote provider's
    /// credential is absent from the environment.
    pub fn new(config: EmbedConfig) -> Result<Self> {
        let embedder = AnyEmbedder::from_config(&config)?;
        Ok(Self { config, embedder })
    }

    /// Batcher over an explicitly constructed backend.
    #[must_use]
    pub fn with_embedder(config: EmbedConfig, embedder: AnyEmbedder) -> Self {
        Self { config, embedder }
    }

    #[must_use]
    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Embed every text, splitting those over the effective token limit.
    ///
    /// # Errors
    ///
    /// Returns the first provider error; nothing is retried.
    pub async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        let limit = self.config.token_limit();
        let mut batch = EmbeddingBatch::default();

        for text in texts {
            for slice in split_by_token_limit(text, limit) {
                let vector = self.embedder.embed(&slice).await?;
                batch.vectors.push(vector);
                batch.texts.push(slice);
            }
        }

        tracing::debug!(
            provider = self.embedder.name(),
            input = texts.len(),
            embedded = batch.vectors.len(),
            "batch embedded"
        );
        Ok(batch)
    }

    /// Embed a single query text, unsplit.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder.embed(text).await
    }
}
