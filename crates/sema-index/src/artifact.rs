//! Index and text artifacts on disk.
//!
//! Two JSON files addressed by one base path: the index payload
//! (`dimension` plus row-major flattened vector data) and, at the base
//! path + [`TEXTS_SUFFIX`], the positionally aligned text array. The two
//! writes are not transactional as a pair; each file is written atomically
//! via temp-file + rename, texts first, and `load` rejects a pair whose
//! lengths disagree.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::flat::FlatIndex;

/// Suffix appended to the index path to address the text artifact.
pub const TEXTS_SUFFIX: &str = ".texts.json";

#[derive(Debug, Serialize, Deserialize)]
struct IndexArtifact {
    dimension: usize,
    embeddings: Vec<f32>,
}

/// Path of the text artifact belonging to `index_path`.
#[must_use]
pub fn texts_path(index_path: &Path) -> PathBuf {
    let mut name = index_path.as_os_str().to_owned();
    name.push(TEXTS_SUFFIX);
    PathBuf::from(name)
}

/// Persist an index as its artifact pair.
///
/// # Errors
///
/// Returns an error if either file cannot be written.
pub fn save(index: &FlatIndex, index_path: &Path) -> Result<()> {
    let texts: Vec<&str> = index.entries().iter().map(|e| e.text.as_str()).collect();
    let embeddings: Vec<f32> = index
        .entries()
        .iter()
        .flat_map(|e| e.vector.iter().copied())
        .collect();
    let payload = IndexArtifact {
        dimension: index.dimension(),
        embeddings,
    };

    write_atomic(&texts_path(index_path), &serde_json::to_vec(&texts)?)?;
    write_atomic(index_path, &serde_json::to_vec(&payload)?)?;

    tracing::info!(
        path = %index_path.display(),
        vectors = index.len(),
        dimension = index.dimension(),
        "index persisted"
    );
    Ok(())
}

/// Load an index from its artifact pair.
///
/// # Errors
///
/// Returns an error if either file is missing or unreadable, or the pair
/// is internally inconsistent.
pub fn load(index_path: &Path) -> Result<FlatIndex> {
    let corrupt = |detail: String| IndexError::CorruptArtifact {
        path: index_path.display().to_string(),
        detail,
    };

    if !index_path.exists() {
        return Err(IndexError::RepositoryNotIndexed(
            index_path.display().to_string(),
        ));
    }

    let payload: IndexArtifact = serde_json::from_slice(&std::fs::read(index_path)?)?;
    let texts: Vec<String> = serde_json::from_slice(&std::fs::read(texts_path(index_path))?)?;

    if payload.dimension == 0 {
        return Err(corrupt("zero dimension".to_string()));
    }
    if payload.embeddings.len() % payload.dimension != 0 {
        return Err(corrupt(format!(
            "{} floats do not divide into dimension {}",
            payload.embeddings.len(),
            payload.dimension
        )));
    }
    let count = payload.embeddings.len() / payload.dimension;
    if texts.len() != count {
        return Err(corrupt(format!(
            "{count} vectors but {} texts",
            texts.len()
        )));
    }

    let vectors: Vec<Vec<f32>> = payload
        .embeddings
        .chunks(payload.dimension)
        .map(<[f32]>::to_vec)
        .collect();

    FlatIndex::build(vectors, texts)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FlatIndex {
        FlatIndex::build(
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap()
    }

    #[test]
    fn texts_path_appends_suffix() {
        assert_eq!(
            texts_path(Path::new("/tmp/repo/index.json")),
            PathBuf::from("/tmp/repo/index.json.texts.json")
        );
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let index = sample_index();

        save(&index, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn artifact_schema_is_flat_row_major() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        save(&sample_index(), &path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["dimension"], 2);
        assert_eq!(
            raw["embeddings"],
            serde_json::json!([1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        );

        let texts: Vec<String> =
            serde_json::from_slice(&std::fs::read(texts_path(&path)).unwrap()).unwrap();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn load_missing_index_reports_not_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, IndexError::RepositoryNotIndexed(_)));
    }

    #[test]
    fn load_rejects_text_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        save(&sample_index(), &path).unwrap();

        // Truncate the text artifact: the pair is now inconsistent.
        std::fs::write(texts_path(&path), "[\"only-one\"]").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, IndexError::CorruptArtifact { .. }));
    }

    #[test]
    fn load_rejects_non_divisible_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, r#"{"dimension":2,"embeddings":[1.0,2.0,3.0]}"#).unwrap();
        std::fs::write(texts_path(&path), r#"["a"]"#).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, IndexError::CorruptArtifact { .. }));
    }

    #[test]
    fn load_missing_texts_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, r#"{"dimension":1,"embeddings":[1.0]}"#).unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        save(&sample_index(), &path).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|n| !n.ends_with(".tmp")), "{names:?}");
    }
}
