//! Repository traversal: walk a tree, dispatch every supported file,
//! aggregate the chunks.

use std::path::Path;

use crate::chunk::Chunk;
use crate::dispatch::ChunkDispatcher;
use crate::error::{ExtractError, Result};
use crate::languages::is_supported;

/// Outcome of walking one repository tree.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub chunks: Vec<Chunk>,
    pub files_scanned: usize,
    /// Files whose extraction failed, with the error rendered. Failures
    /// here never abort the walk.
    pub files_failed: Vec<String>,
}

/// Walk `root` and extract chunks from every supported file.
///
/// Hidden and gitignored entries are skipped. A per-file extraction
/// failure is logged, recorded in the report, and does not stop the walk.
/// Chunk order follows traversal order; it is only meaningful for the
/// positional labels of a single index built from this report.
///
/// # Errors
///
/// Returns an error if `root` does not exist or is not a directory.
pub async fn walk_and_chunk(dispatcher: &ChunkDispatcher, root: &Path) -> Result<WalkReport> {
    let meta = std::fs::metadata(root).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtractError::NotFound(root.display().to_string())
        } else {
            ExtractError::Io(e)
        }
    })?;
    if !meta.is_dir() {
        return Err(ExtractError::NotADirectory(root.display().to_string()));
    }

    let entries: Vec<_> = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build()
        .flatten()
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()) && is_supported(e.path()))
        .collect();

    tracing::info!(root = %root.display(), total = entries.len(), "walk started");

    let mut report = WalkReport::default();
    for entry in &entries {
        report.files_scanned += 1;
        match dispatcher.chunk_file(entry.path()).await {
            Ok(chunks) => {
                tracing::debug!(
                    file = %entry.path().display(),
                    count = chunks.len(),
                    "file chunked"
                );
                report.chunks.extend(chunks);
            }
            Err(e) => {
                tracing::warn!(file = %entry.path().display(), error = %e, "file skipped");
                report
                    .files_failed
                    .push(format!("{}: {e}", entry.path().display()));
            }
        }
    }

    tracing::info!(
        chunks = report.chunks.len(),
        failed = report.files_failed.len(),
        "walk finished"
    );
    Ok(report)
}
