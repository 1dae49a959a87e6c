//! Text embedding with pluggable providers.
//!
//! One [`EmbeddingBatcher`] turns chunk texts into fixed-dimension vectors,
//! splitting oversized texts by a character-based token estimate before
//! embedding. Providers: a local candle BERT model (feature `local`,
//! default), the OpenAI embeddings API, and the Hugging Face Inference API.

pub mod batcher;
pub mod config;
pub mod error;
#[cfg(feature = "local")]
pub mod local;
pub mod provider;
pub mod splitter;

mod huggingface;
mod openai;

pub use batcher::{EmbeddingBatch, EmbeddingBatcher};
pub use config::{EmbedConfig, ProviderKind};
pub use error::{EmbedError, Result};
pub use huggingface::HfEmbedder;
pub use openai::OpenAiEmbedder;
pub use provider::{AnyEmbedder, Embedder};

#[cfg(any(test, feature = "mock"))]
pub use provider::MockEmbedder;
