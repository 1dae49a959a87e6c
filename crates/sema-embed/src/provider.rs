//! Provider abstraction over the embedding backends.

use crate::config::{EmbedConfig, ProviderKind};
use crate::error::Result;
use crate::huggingface::HfEmbedder;
#[cfg(feature = "local")]
use crate::local::LocalEmbedder;
use crate::openai::OpenAiEmbedder;

#[cfg(not(feature = "local"))]
use crate::error::EmbedError;

/// Capability contract every backend satisfies.
pub trait Embedder: Send + Sync {
    /// Embed one text into a fixed-dimension vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or answers with an
    /// unusable response.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send;

    fn name(&self) -> &'static str;
}

/// Generates a match over all `AnyEmbedder` variants, binding the inner
/// embedder and evaluating the given closure for each arm.
macro_rules! delegate_embedder {
    ($self:expr, |$e:ident| $expr:expr) => {
        match $self {
            #[cfg(feature = "local")]
            AnyEmbedder::Local($e) => $expr,
            AnyEmbedder::OpenAi($e) => $expr,
            AnyEmbedder::HuggingFace($e) => $expr,
            #[cfg(any(test, feature = "mock"))]
            AnyEmbedder::Mock($e) => $expr,
        }
    };
}

/// One of the configured embedding backends.
#[derive(Debug)]
pub enum AnyEmbedder {
    #[cfg(feature = "local")]
    Local(LocalEmbedder),
    OpenAi(OpenAiEmbedder),
    HuggingFace(HfEmbedder),
    #[cfg(any(test, feature = "mock"))]
    Mock(MockEmbedder),
}

impl AnyEmbedder {
    /// Build the backend selected by `config`.
    ///
    /// Remote backends read their credential here; a missing credential is
    /// a configuration error raised before any network call.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing credential or an unavailable backend.
    pub fn from_config(config: &EmbedConfig) -> Result<Self> {
        let model = config.model().to_string();
        match config.provider {
            #[cfg(feature = "local")]
            ProviderKind::Local => Ok(Self::Local(LocalEmbedder::new(model))),
            #[cfg(not(feature = "local"))]
            ProviderKind::Local => Err(EmbedError::ProviderUnavailable("local")),
            ProviderKind::OpenAi => Ok(Self::OpenAi(OpenAiEmbedder::from_env(model)?)),
            ProviderKind::HuggingFace => Ok(Self::HuggingFace(HfEmbedder::from_env(model)?)),
        }
    }
}

impl Embedder for AnyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        delegate_embedder!(self, |e| e.embed(text).await)
    }

    fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "local")]
            Self::Local(_) => "local",
            Self::OpenAi(_) => "openai",
            Self::HuggingFace(_) => "huggingface",
            #[cfg(any(test, feature = "mock"))]
            Self::Mock(_) => "mock",
        }
    }
}

/// Deterministic embedder for tests: hashes each text into a small
/// fixed-dimension vector without touching the network.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
}

#[cfg(any(test, feature = "mock"))]
impl MockEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Embed by folding character codes into the vector positions. Equal
    /// texts produce equal vectors.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for (i, c) in text.chars().enumerate() {
            vector[i % self.dimension] += (u32::from(c) % 97) as f32 / 97.0;
        }
        vector
    }
}

#[cfg(any(test, feature = "mock"))]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
