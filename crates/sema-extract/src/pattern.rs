//! Regex-based extractor for TypeScript/JavaScript sources.
//!
//! Operates on raw text without building a syntax tree. Body capture for
//! functions and classes stops at the first closing brace after the match,
//! so a unit containing nested brace-delimited blocks yields truncated
//! `code`. Downstream consumers must tolerate partial chunk bodies.

use std::sync::LazyLock;

use regex::Regex;

use crate::chunk::{Chunk, ChunkKind};
use crate::languages::Lang;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+(?:\{[^}]*\}|\w+)\s+from\s+['"]([^'"]+)['"]"#).expect("import regex")
});

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:function\s+(\w+)\s*\([^)]*\)|const\s+(\w+)\s*=\s*(?:\([^)]*\)\s*=>|function\s*\([^)]*\)))\s*\{[^}]*\}",
    )
    .expect("function regex")
});

static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+(\w+)\s*\{[^}]*\}").expect("class regex"));

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\(").expect("call regex"));

/// Extract function and class chunks from one source text.
///
/// `lang` is the language mapped from the dispatching extension and is
/// stamped on every chunk unchanged. Import module names are collected
/// file-wide and attached identically to every chunk.
#[must_use]
pub fn chunk_source(source: &str, file_path: &str, lang: Lang) -> Vec<Chunk> {
    let imports: Vec<String> = IMPORT_RE
        .captures_iter(source)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();

    let mut chunks = Vec::new();

    for caps in FUNCTION_RE.captures_iter(source) {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("anonymous", |m| m.as_str());
        let body = caps.get(0).map_or("", |m| m.as_str());
        chunks.push(Chunk {
            kind: ChunkKind::Function,
            name: name.to_string(),
            code: body.to_string(),
            language: lang,
            file_path: file_path.to_string(),
            start_line: None,
            end_line: None,
            calls: extract_calls(body),
            imports: imports.clone(),
        });
    }

    for caps in CLASS_RE.captures_iter(source) {
        let name = caps.get(1).map_or("anonymous", |m| m.as_str());
        let body = caps.get(0).map_or("", |m| m.as_str());
        chunks.push(Chunk {
            kind: ChunkKind::Class,
            name: name.to_string(),
            code: body.to_string(),
            language: lang,
            file_path: file_path.to_string(),
            start_line: None,
            end_line: None,
            calls: Vec::new(),
            imports: imports.clone(),
        });
    }

    tracing::debug!(file = file_path, count = chunks.len(), "pattern extraction");
    chunks
}

/// Every textual `identifier(` occurrence in a code block, duplicates kept.
/// A call-site heuristic, not reference resolution.
#[must_use]
pub fn extract_calls(code: &str) -> Vec<String> {
    CALL_RE
        .captures_iter(code)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
