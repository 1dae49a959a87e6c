//! Error types for sema-index.

/// Errors that can occur while building, persisting, or searching an index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// IO error on an artifact or the registry.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Chunk extraction error.
    #[error("extraction error: {0}")]
    Extract(#[from] sema_extract::ExtractError),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embed(#[from] sema_embed::EmbedError),

    /// Config file parse error.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Vector/text inputs disagree on length.
    #[error("{vectors} vectors paired with {texts} texts")]
    LengthMismatch { vectors: usize, texts: usize },

    /// Attempt to build an index from zero vectors.
    #[error("cannot build an index from zero vectors")]
    EmptyIndex,

    /// Vector dimension disagrees with the index dimension.
    #[error("dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Index and text artifacts disagree with each other.
    #[error("corrupt artifact pair at {path}: {detail}")]
    CorruptArtifact { path: String, detail: String },

    /// Index artifact missing for a registered or requested repository.
    #[error("no index found for repository: {0}")]
    RepositoryNotIndexed(String),

    /// Repository yielded no embeddable text.
    #[error("no text extracted from repository at {0}")]
    NoTextExtracted(String),

    /// Search produced zero hits, distinct from "no index".
    #[error("search returned no results")]
    NoMatches,
}

/// Result type alias using `IndexError`.
pub type Result<T> = std::result::Result<T, IndexError>;
