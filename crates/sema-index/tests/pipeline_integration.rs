//! End-to-end pipeline coverage over a real temporary storage root.

use std::fs;
use std::path::Path;

use sema_embed::{AnyEmbedder, EmbedConfig, EmbeddingBatcher, MockEmbedder, ProviderKind};
use sema_index::{IndexError, RepoIndexer};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn mock_indexer(storage: &Path) -> RepoIndexer {
    let config = EmbedConfig {
        provider: ProviderKind::Local,
        model: None,
        token_limit: Some(1000),
    };
    let batcher = EmbeddingBatcher::with_embedder(config, AnyEmbedder::Mock(MockEmbedder::new(16)));
    RepoIndexer::with_batcher(storage, batcher).unwrap()
}

fn write_sample_repo(root: &Path) {
    fs::create_dir_all(root.join("src/components")).unwrap();
    fs::write(
        root.join("src/session.ts"),
        r"
import { sign } from 'jsonwebtoken';

function createSession(user) { return sign(user); }
function destroySession(id) { revoke(id); }
",
    )
    .unwrap();
    fs::write(
        root.join("src/components/button.jsx"),
        "const Button = (props) => { return render(props); }",
    )
    .unwrap();
    fs::write(root.join("Makefile"), "all:\n\techo skip\n").unwrap();
}

#[tokio::test]
async fn process_persists_artifacts_a_fresh_indexer_can_search() {
    init_tracing();
    let storage = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();
    write_sample_repo(repo.path());

    let report = {
        let indexer = mock_indexer(storage.path());
        indexer
            .process_repository("https://github.com/acme/web.git", repo.path())
            .await
            .unwrap()
    };
    assert_eq!(report.chunks_extracted, 3);
    assert_eq!(report.vectors_indexed, 3);
    assert!(report.index_path.ends_with("web/index.json"));

    // A brand-new indexer over the same storage sees the registry entry and
    // reloads the artifact pair from disk.
    let fresh = mock_indexer(storage.path());
    let hits = fresh
        .search_repository("https://github.com/acme/web.git", "session handling", 2)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    for hit in &hits {
        assert!(hit.label < 3);
    }

    let all = fresh
        .search_repository("https://github.com/acme/web.git", "anything", 10)
        .await
        .unwrap();
    assert_eq!(all.len(), 3, "k clamps to the number of vectors");
}

#[tokio::test]
async fn registry_is_shared_across_repositories() {
    init_tracing();
    let storage = tempfile::tempdir().unwrap();
    let repo_a = tempfile::tempdir().unwrap();
    let repo_b = tempfile::tempdir().unwrap();
    fs::write(repo_a.path().join("a.ts"), "function alpha(){ one(); }").unwrap();
    fs::write(repo_b.path().join("b.ts"), "function beta(){ two(); }").unwrap();

    let indexer = mock_indexer(storage.path());
    indexer
        .process_repository("repo-a", repo_a.path())
        .await
        .unwrap();
    indexer
        .process_repository("repo-b", repo_b.path())
        .await
        .unwrap();

    let mut ids = indexer.registry().list().unwrap();
    ids.sort();
    assert_eq!(ids, vec!["repo-a", "repo-b"]);

    let hits = indexer
        .search_repository("repo-b", "beta", 1)
        .await
        .unwrap();
    assert!(hits[0].text.contains("beta"));
}

#[tokio::test]
async fn searching_with_a_mismatched_embedder_fails_loudly() {
    init_tracing();
    let storage = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();
    fs::write(repo.path().join("a.ts"), "function alpha(){ one(); }").unwrap();

    mock_indexer(storage.path())
        .process_repository("repo", repo.path())
        .await
        .unwrap();

    // Same storage, different embedding dimension: a stale index must be
    // rejected, not silently searched.
    let config = EmbedConfig {
        provider: ProviderKind::Local,
        model: None,
        token_limit: None,
    };
    let other = RepoIndexer::with_batcher(
        storage.path(),
        EmbeddingBatcher::with_embedder(config, AnyEmbedder::Mock(MockEmbedder::new(8))),
    )
    .unwrap();

    let err = other.search_repository("repo", "query", 3).await.unwrap_err();
    assert!(matches!(err, IndexError::DimensionMismatch { .. }));
}
