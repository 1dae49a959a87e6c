//! The chunk model shared by every extraction strategy.

use serde::{Deserialize, Serialize};

use crate::languages::Lang;

/// Kind of source unit a chunk represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Function,
    Class,
}

/// One named unit of source text extracted from a file.
///
/// Chunks are transient: they are produced during extraction, consumed by
/// the embedding batcher, and never persisted individually. The serde
/// representation (camelCase, `type` tag) is the wire schema the external
/// parsers emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub name: String,
    pub code: String,
    /// Determined solely by the dispatching file extension.
    pub language: Lang,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    /// Called identifiers found in `code` by a textual heuristic,
    /// duplicates preserved.
    #[serde(default)]
    pub calls: Vec<String>,
    /// Module names imported by the source file, attached identically to
    /// every chunk of that file.
    #[serde(default)]
    pub imports: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_wire_schema() {
        let chunk = Chunk {
            kind: ChunkKind::Function,
            name: "greet".into(),
            code: "function greet() {}".into(),
            language: Lang::TypeScript,
            file_path: "src/app.ts".into(),
            start_line: None,
            end_line: None,
            calls: vec!["log".into()],
            imports: vec!["react".into()],
        };
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"type\":\"function\""));
        assert!(json.contains("\"filePath\":\"src/app.ts\""));
        assert!(json.contains("\"language\":\"typescript\""));
        assert!(!json.contains("startLine"));
    }

    #[test]
    fn deserializes_with_missing_optionals() {
        let json = r#"{
            "type": "class",
            "name": "Person",
            "code": "class Person {}",
            "language": "python",
            "filePath": "app.py"
        }"#;
        let chunk: Chunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.kind, ChunkKind::Class);
        assert!(chunk.calls.is_empty());
        assert!(chunk.imports.is_empty());
        assert!(chunk.start_line.is_none());
    }

    #[test]
    fn line_range_roundtrip() {
        let json = r#"{
            "type": "function",
            "name": "add",
            "code": "add x y = x + y",
            "language": "elm",
            "filePath": "Main.elm",
            "startLine": 4,
            "endLine": 6
        }"#;
        let chunk: Chunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.start_line, Some(4));
        assert_eq!(chunk.end_line, Some(6));
    }
}
