//! Hugging Face Inference API feature-extraction client.

use std::fmt;

use serde::Serialize;

use crate::error::{EmbedError, Result};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Environment variable holding the Hugging Face API token.
pub const API_KEY_VAR: &str = "HUGGINGFACE_API_KEY";

pub struct HfEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl fmt::Debug for HfEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HfEmbedder")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HfEmbedder {
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), model)
    }

    #[must_use]
    pub fn with_base_url(api_key: String, mut base_url: String, model: String) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Read `HUGGINGFACE_API_KEY` and construct the embedder.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::MissingCredential`] when the variable is
    /// absent, before any network call.
    pub fn from_env(model: String) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| EmbedError::MissingCredential { var: API_KEY_VAR })?;
        Ok(Self::new(api_key, model))
    }

    /// Embed one text.
    ///
    /// Sentence-level models answer with a flat float array; token-level
    /// feature extraction answers with one array per token, which is
    /// mean-pooled here. Any other shape is a format error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response shape is
    /// unrecognized.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = FeatureExtractionRequest { inputs: text };

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, self.model))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(EmbedError::Http)?;

        if !status.is_success() {
            tracing::error!("Hugging Face inference API error {status}: {text}");
            return Err(EmbedError::InvalidResponse {
                provider: "huggingface",
                detail: format!("request failed (status {status})"),
            });
        }

        let value: serde_json::Value = serde_json::from_str(&text)?;
        parse_feature_vector(&value)
    }
}

/// Accept `[f32]` (sentence embedding) or `[[f32]]` (per-token vectors,
/// mean-pooled).
#[allow(clippy::cast_possible_truncation)]
fn parse_feature_vector(value: &serde_json::Value) -> Result<Vec<f32>> {
    let invalid = |detail: &str| EmbedError::InvalidResponse {
        provider: "huggingface",
        detail: detail.to_string(),
    };

    let Some(outer) = value.as_array() else {
        return Err(invalid("expected a JSON array"));
    };
    if outer.is_empty() {
        return Err(EmbedError::EmptyResponse {
            provider: "huggingface",
        });
    }

    if outer[0].is_number() {
        return outer
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| invalid("mixed element types in embedding"))
            })
            .collect();
    }

    if outer[0].is_array() {
        let rows: Vec<Vec<f32>> = outer
            .iter()
            .map(|row| {
                row.as_array()
                    .ok_or_else(|| invalid("mixed element types in embedding"))?
                    .iter()
                    .map(|v| {
                        v.as_f64()
                            .map(|f| f as f32)
                            .ok_or_else(|| invalid("non-numeric token vector"))
                    })
                    .collect()
            })
            .collect::<Result<_>>()?;

        let dim = rows[0].len();
        if dim == 0 || rows.iter().any(|r| r.len() != dim) {
            return Err(invalid("ragged token vectors"));
        }

        #[allow(clippy::cast_precision_loss)]
        let count = rows.len() as f32;
        let mut pooled = vec![0.0f32; dim];
        for row in &rows {
            for (acc, v) in pooled.iter_mut().zip(row) {
                *acc += v;
            }
        }
        for acc in &mut pooled {
            *acc /= count;
        }
        return Ok(pooled);
    }

    Err(invalid("unrecognized embedding shape"))
}

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
}
