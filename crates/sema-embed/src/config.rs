//! Embedding configuration.

use serde::{Deserialize, Serialize};

/// Which embedding backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// In-process candle BERT model.
    Local,
    /// OpenAI embeddings API; reads `OPENAI_API_KEY`.
    OpenAi,
    /// Hugging Face Inference API; reads `HUGGINGFACE_API_KEY`.
    HuggingFace,
}

impl ProviderKind {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::OpenAi => "openai",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Default model identifier for this provider.
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Local | Self::HuggingFace => "sentence-transformers/all-MiniLM-L6-v2",
            Self::OpenAi => "text-embedding-3-small",
        }
    }

    /// Default per-text token limit for this provider.
    #[must_use]
    pub fn default_token_limit(self) -> usize {
        match self {
            Self::Local | Self::HuggingFace => 512,
            Self::OpenAi => 8000,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "openai" => Ok(Self::OpenAi),
            "huggingface" => Ok(Self::HuggingFace),
            other => Err(format!("unknown embedding provider: {other}")),
        }
    }
}

/// Embedding configuration: provider, optional model override, optional
/// per-text token limit override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_limit: Option<usize>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Local,
            model: None,
            token_limit: None,
        }
    }
}

impl EmbedConfig {
    /// Model to use: the configured override or the provider default.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Effective per-text token limit: the configured override or the
    /// provider default. There is always a limit.
    #[must_use]
    pub fn token_limit(&self) -> usize {
        self.token_limit
            .unwrap_or_else(|| self.provider.default_token_limit())
    }

    /// Apply `SEMA_EMBED_PROVIDER`, `SEMA_EMBED_MODEL`, and
    /// `SEMA_TOKEN_LIMIT` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SEMA_EMBED_PROVIDER")
            && let Ok(kind) = v.parse()
        {
            self.provider = kind;
        }
        if let Ok(v) = std::env::var("SEMA_EMBED_MODEL") {
            self.model = Some(v);
        }
        if let Ok(v) = std::env::var("SEMA_TOKEN_LIMIT")
            && let Ok(limit) = v.parse::<usize>()
            && limit > 0
        {
            self.token_limit = Some(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local_with_no_overrides() {
        let config = EmbedConfig::default();
        assert_eq!(config.provider, ProviderKind::Local);
        assert!(config.model.is_none());
        assert!(config.token_limit.is_none());
    }

    #[test]
    fn provider_defaults() {
        assert_eq!(
            ProviderKind::OpenAi.default_model(),
            "text-embedding-3-small"
        );
        assert_eq!(ProviderKind::OpenAi.default_token_limit(), 8000);
        assert_eq!(ProviderKind::Local.default_token_limit(), 512);
        assert_eq!(ProviderKind::HuggingFace.default_token_limit(), 512);
    }

    #[test]
    fn effective_values_prefer_overrides() {
        let config = EmbedConfig {
            provider: ProviderKind::OpenAi,
            model: Some("text-embedding-3-large".into()),
            token_limit: Some(100),
        };
        assert_eq!(config.model(), "text-embedding-3-large");
        assert_eq!(config.token_limit(), 100);
    }

    #[test]
    fn effective_values_fall_back_to_provider_defaults() {
        let config = EmbedConfig {
            provider: ProviderKind::HuggingFace,
            model: None,
            token_limit: None,
        };
        assert_eq!(config.model(), "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.token_limit(), 512);
    }

    #[test]
    fn provider_kind_parse() {
        assert_eq!("local".parse::<ProviderKind>(), Ok(ProviderKind::Local));
        assert_eq!("openai".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!(
            "huggingface".parse::<ProviderKind>(),
            Ok(ProviderKind::HuggingFace)
        );
        assert!("cohere".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn serde_lowercase_tags() {
        let json = serde_json::to_string(&ProviderKind::HuggingFace).unwrap();
        assert_eq!(json, "\"huggingface\"");
        let config: EmbedConfig = serde_json::from_str(r#"{"provider":"openai"}"#).unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
    }
}
