//! Persistent map from repository identifier to index artifact path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the registry artifact inside the storage root.
pub const REGISTRY_FILE: &str = "repository_map.json";

/// One JSON object shared by all repositories: identifier → index path.
/// Registration is strict read-modify-write with last-write-wins; there is
/// no locking, so concurrent writers can lose updates.
#[derive(Debug, Clone)]
pub struct RepoRegistry {
    path: PathBuf,
}

impl RepoRegistry {
    /// Registry stored under `storage_root`.
    #[must_use]
    pub fn new(storage_root: &Path) -> Self {
        Self {
            path: storage_root.join(REGISTRY_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let bytes = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Set or overwrite the entry for `repo_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be read or written.
    pub fn register(&self, repo_id: &str, index_path: &Path) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(repo_id.to_string(), index_path.display().to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;

        tracing::debug!(repo = repo_id, index = %index_path.display(), "repository registered");
        Ok(())
    }

    /// Index path registered for `repo_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry exists but cannot be read.
    pub fn lookup(&self, repo_id: &str) -> Result<Option<PathBuf>> {
        Ok(self.read_map()?.remove(repo_id).map(PathBuf::from))
    }

    /// All registered repository identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry exists but cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.read_map()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_on_missing_registry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let registry = RepoRegistry::new(dir.path());
        assert_eq!(registry.lookup("github.com/a/b").unwrap(), None);
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn register_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let registry = RepoRegistry::new(dir.path());

        registry
            .register("github.com/a/b", Path::new("/data/b/index.json"))
            .unwrap();
        assert_eq!(
            registry.lookup("github.com/a/b").unwrap(),
            Some(PathBuf::from("/data/b/index.json"))
        );
    }

    #[test]
    fn reregistering_keeps_one_entry_pointing_at_latest() {
        let dir = tempfile::tempdir().unwrap();
        let registry = RepoRegistry::new(dir.path());

        registry
            .register("github.com/a/b", Path::new("/old/index.json"))
            .unwrap();
        registry
            .register("github.com/a/b", Path::new("/new/index.json"))
            .unwrap();

        assert_eq!(registry.list().unwrap(), vec!["github.com/a/b"]);
        assert_eq!(
            registry.lookup("github.com/a/b").unwrap(),
            Some(PathBuf::from("/new/index.json"))
        );
    }

    #[test]
    fn distinct_identifiers_coexist() {
        let dir = tempfile::tempdir().unwrap();
        let registry = RepoRegistry::new(dir.path());

        registry.register("repo-one", Path::new("/1.json")).unwrap();
        registry.register("repo-two", Path::new("/2.json")).unwrap();

        let mut ids = registry.list().unwrap();
        ids.sort();
        assert_eq!(ids, vec!["repo-one", "repo-two"]);
    }

    #[test]
    fn artifact_is_one_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let registry = RepoRegistry::new(dir.path());
        registry.register("r", Path::new("/r/index.json")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(registry.path()).unwrap()).unwrap();
        assert!(raw.is_object());
        assert_eq!(raw["r"], "/r/index.json");
    }

    #[test]
    fn creates_storage_root_on_first_register() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/storage");
        let registry = RepoRegistry::new(&nested);
        registry.register("r", Path::new("/r/index.json")).unwrap();
        assert!(nested.join(REGISTRY_FILE).exists());
    }
}
