//! Workspace configuration: storage location plus embedding settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sema_embed::EmbedConfig;

use crate::error::Result;

/// Top-level configuration, loadable from TOML with env overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemaConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub embedding: EmbedConfig,
}

/// Where indexes, parsers, and the registry live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

/// `$HOME/.sema`, or `./.sema` when no home directory is known.
#[must_use]
pub fn default_storage_root() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".sema")
}

impl Default for SemaConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            embedding: EmbedConfig::default(),
        }
    }
}

impl SemaConfig {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = std::env::var_os("SEMA_STORAGE_DIR") {
            self.storage.root = PathBuf::from(v);
        }
        self.embedding.apply_env_overrides();
    }
}
