//! Error types for sema-extract.

/// Errors that can occur during chunk extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// IO error reading source files or directories.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Target file or directory does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Walk root exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// External parser script is missing from its install location.
    #[error("parser script missing: {0}")]
    ParserMissing(String),

    /// External parser wrote to stderr or failed to run.
    #[error("parser failed for {file}: {stderr}")]
    ParserFailed { file: String, stderr: String },

    /// Parser stdout was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parser stdout parsed as JSON but was not an array.
    #[error("expected a JSON array of chunks, got {0}")]
    NotAnArray(&'static str),
}

/// Result type alias using `ExtractError`.
pub type Result<T> = std::result::Result<T, ExtractError>;
