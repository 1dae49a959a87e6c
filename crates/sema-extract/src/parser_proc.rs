//! External-parser extraction over a JSON stdout protocol.
//!
//! A parser is invoked as `<interpreter> <script> <target-file>` and must
//! print a JSON array of chunk objects on stdout. Any stderr output is
//! treated as failure regardless of exit code: subprocess output is never
//! partially trusted.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::process::Command;

use crate::chunk::{Chunk, ChunkKind};
use crate::error::{ExtractError, Result};
use crate::languages::Lang;

/// Bundled Python parser source.
pub const PY_PARSER: &str = include_str!("../parsers/py_ast_parser.py");
/// Bundled Elm parser source.
pub const ELM_PARSER: &str = include_str!("../parsers/elm_ast_parser.py");

/// File name the Python parser is installed under.
pub const PY_PARSER_FILE: &str = "py_ast_parser.py";
/// File name the Elm parser is installed under.
pub const ELM_PARSER_FILE: &str = "elm_ast_parser.py";

const DEFAULT_INTERPRETER: &str = "python3";

/// Write the bundled parser scripts into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory or script files cannot be written.
pub fn install_parsers(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(PY_PARSER_FILE), PY_PARSER)?;
    std::fs::write(dir.join(ELM_PARSER_FILE), ELM_PARSER)?;
    tracing::debug!(dir = %dir.display(), "parser scripts installed");
    Ok(())
}

/// Handle on one out-of-process parser program.
#[derive(Debug, Clone)]
pub struct ParserProcess {
    interpreter: String,
    script: PathBuf,
    lang: Lang,
}

impl ParserProcess {
    #[must_use]
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>, lang: Lang) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            lang,
        }
    }

    /// Python parser installed under `parser_dir`.
    #[must_use]
    pub fn python(parser_dir: &Path) -> Self {
        Self::new(
            DEFAULT_INTERPRETER,
            parser_dir.join(PY_PARSER_FILE),
            Lang::Python,
        )
    }

    /// Elm parser installed under `parser_dir`.
    #[must_use]
    pub fn elm(parser_dir: &Path) -> Self {
        Self::new(
            DEFAULT_INTERPRETER,
            parser_dir.join(ELM_PARSER_FILE),
            Lang::Elm,
        )
    }

    /// Run the parser against `file` and translate its output.
    ///
    /// Validation order: target file exists, parser script exists, spawn,
    /// stderr empty, stdout is JSON, JSON is an array, elements translate
    /// into the shared chunk schema.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation step fails.
    pub async fn extract(&self, file: &Path) -> Result<Vec<Chunk>> {
        if !file.exists() {
            return Err(ExtractError::NotFound(file.display().to_string()));
        }
        if !self.script.exists() {
            return Err(ExtractError::ParserMissing(
                self.script.display().to_string(),
            ));
        }

        let output = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(file)
            .output()
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(ExtractError::ParserFailed {
                file: file.display().to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        let Some(items) = value.as_array() else {
            return Err(ExtractError::NotAnArray(json_kind(&value)));
        };

        let chunks = items
            .iter()
            .map(|item| {
                let raw: RawChunk = serde_json::from_value(item.clone())?;
                Ok(self.translate(raw, file))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            file = %file.display(),
            lang = %self.lang,
            count = chunks.len(),
            "external parser extraction"
        );
        Ok(chunks)
    }

    /// Translate a raw parser object into the shared schema, stamping the
    /// language of the dispatching extension over whatever the parser said.
    fn translate(&self, raw: RawChunk, file: &Path) -> Chunk {
        let kind = match raw.kind.as_deref() {
            Some("class") => ChunkKind::Class,
            _ => ChunkKind::Function,
        };
        Chunk {
            kind,
            name: raw.name.unwrap_or_else(|| "anonymous".to_string()),
            code: raw.code,
            language: self.lang,
            file_path: file.display().to_string(),
            start_line: raw.start_line,
            end_line: raw.end_line,
            calls: raw.calls,
            imports: raw.imports,
        }
    }
}

/// Chunk object as emitted by a parser, before translation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChunk {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    code: String,
    #[serde(default)]
    start_line: Option<usize>,
    #[serde(default)]
    end_line: Option<usize>,
    #[serde(default)]
    calls: Vec<String>,
    #[serde(default)]
    imports: Vec<String>,
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
