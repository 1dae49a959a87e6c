//! Repository processing and query pipeline: walk → chunk → embed →
//! index → register, and the reverse lookup path for search.

use std::path::{Path, PathBuf};
use std::time::Instant;

use sema_embed::{EmbedConfig, EmbeddingBatcher};
use sema_extract::ChunkDispatcher;
use sema_extract::parser_proc::install_parsers;
use sema_extract::walker::walk_and_chunk;

use crate::artifact;
use crate::config::SemaConfig;
use crate::error::{IndexError, Result};
use crate::flat::{FlatIndex, SearchHit};
use crate::registry::RepoRegistry;

/// Default number of results returned by a search.
pub const DEFAULT_TOP_K: usize = 3;

const PARSERS_DIR: &str = "parsers";
const INDEX_FILE: &str = "index.json";

/// Summary of one repository-processing run.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub files_scanned: usize,
    pub files_failed: Vec<String>,
    pub chunks_extracted: usize,
    pub vectors_indexed: usize,
    pub index_path: PathBuf,
    pub duration_ms: u64,
}

/// Orchestrates indexing and search over one storage root.
#[derive(Debug)]
pub struct RepoIndexer {
    storage_root: PathBuf,
    dispatcher: ChunkDispatcher,
    batcher: EmbeddingBatcher,
    registry: RepoRegistry,
}

impl RepoIndexer {
    /// Indexer over `storage_root` with the given embedding configuration.
    ///
    /// Creates the storage root and materializes the bundled parser
    /// scripts under it.
    ///
    /// # Errors
    ///
    /// Returns an error if storage setup fails or the embedding provider's
    /// credential is missing.
    pub fn new(storage_root: impl Into<PathBuf>, embed: EmbedConfig) -> Result<Self> {
        let batcher = EmbeddingBatcher::new(embed)?;
        Self::with_batcher(storage_root, batcher)
    }

    /// Indexer from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`RepoIndexer::new`].
    pub fn from_config(config: &SemaConfig) -> Result<Self> {
        Self::new(config.storage.root.clone(), config.embedding.clone())
    }

    /// Indexer over an explicitly constructed batcher.
    ///
    /// # Errors
    ///
    /// Returns an error if storage setup fails.
    pub fn with_batcher(storage_root: impl Into<PathBuf>, batcher: EmbeddingBatcher) -> Result<Self> {
        let storage_root = storage_root.into();
        std::fs::create_dir_all(&storage_root)?;

        let parser_dir = storage_root.join(PARSERS_DIR);
        install_parsers(&parser_dir)?;

        Ok(Self {
            dispatcher: ChunkDispatcher::new(&parser_dir),
            registry: RepoRegistry::new(&storage_root),
            batcher,
            storage_root,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &RepoRegistry {
        &self.registry
    }

    /// Index artifact location for a repository identifier.
    #[must_use]
    pub fn index_path_for(&self, repo_id: &str) -> PathBuf {
        self.storage_root.join(repo_name(repo_id)).join(INDEX_FILE)
    }

    /// Process one repository wholesale: extract every chunk, embed, build
    /// a fresh flat index, persist it, and overwrite the registry entry.
    ///
    /// # Errors
    ///
    /// Per-file extraction failures are tolerated and reported; a missing
    /// root, a repository with no embeddable text, an embedding failure,
    /// or an artifact write failure is fatal to the run.
    pub async fn process_repository(&self, repo_id: &str, repo_path: &Path) -> Result<IndexReport> {
        let start = Instant::now();
        tracing::info!(repo = repo_id, path = %repo_path.display(), "processing repository");

        let walk = walk_and_chunk(&self.dispatcher, repo_path).await?;

        let texts: Vec<String> = walk
            .chunks
            .iter()
            .filter(|c| !c.code.is_empty())
            .map(|c| c.code.clone())
            .collect();
        if texts.is_empty() {
            return Err(IndexError::NoTextExtracted(repo_path.display().to_string()));
        }

        let batch = self.batcher.embed_texts(&texts).await?;
        let index = FlatIndex::build(batch.vectors, batch.texts)?;

        let index_path = self.index_path_for(repo_id);
        if let Some(parent) = index_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        artifact::save(&index, &index_path)?;
        self.registry.register(repo_id, &index_path)?;

        let report = IndexReport {
            files_scanned: walk.files_scanned,
            files_failed: walk.files_failed,
            chunks_extracted: walk.chunks.len(),
            vectors_indexed: index.len(),
            index_path,
            duration_ms: start.elapsed().as_millis().try_into().unwrap_or(u64::MAX),
        };
        tracing::info!(
            repo = repo_id,
            chunks = report.chunks_extracted,
            vectors = report.vectors_indexed,
            failed = report.files_failed.len(),
            "repository processed"
        );
        Ok(report)
    }

    /// Answer a query against a processed repository: the top-`k` most
    /// similar chunk texts by ascending distance.
    ///
    /// The query is embedded with the same configured provider and model
    /// as indexing; a stale index meeting a different embedding dimension
    /// fails loudly rather than returning nonsense.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository was never processed, the
    /// artifact pair is corrupt, embedding fails, or zero hits come back.
    pub async fn search_repository(
        &self,
        repo_id: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        let Some(index_path) = self.registry.lookup(repo_id)? else {
            return Err(IndexError::RepositoryNotIndexed(repo_id.to_string()));
        };

        let index = artifact::load(&index_path)?;
        let query_vector = self.batcher.embed_query(query).await?;
        let hits = index.search(&query_vector, k)?;

        tracing::debug!(repo = repo_id, hits = hits.len(), "search answered");
        Ok(hits)
    }
}

/// Storage directory name for a repository identifier: the last path
/// segment with any `.git` suffix stripped.
#[must_use]
pub fn repo_name(repo_id: &str) -> &str {
    let name = repo_id
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let name = name.strip_suffix(".git").unwrap_or(name);
    if name.is_empty() { "repository" } else { name }
}
