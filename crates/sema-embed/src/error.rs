//! Error types for sema-embed.

/// Errors that can occur while embedding text.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Required credential missing from the environment. Raised at
    /// configuration time, before any network call.
    #[error("{var} environment variable is required")]
    MissingCredential { var: &'static str },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parse failed.
    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider returned no embedding.
    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    /// Provider response had an unrecognized shape.
    #[error("unexpected response from {provider}: {detail}")]
    InvalidResponse {
        provider: &'static str,
        detail: String,
    },

    /// Model loading failed.
    #[error("model loading failed: {0}")]
    ModelLoad(String),

    /// Local inference failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Candle tensor error.
    #[cfg(feature = "local")]
    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),

    /// Selected provider is not compiled into this build.
    #[error("provider {0} is not available in this build")]
    ProviderUnavailable(&'static str),
}

/// Result type alias using `EmbedError`.
pub type Result<T> = std::result::Result<T, EmbedError>;
