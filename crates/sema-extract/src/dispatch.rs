//! Extension-keyed dispatch to an extraction strategy.

use std::path::Path;

use crate::chunk::Chunk;
use crate::error::Result;
use crate::languages::{Lang, detect_language};
use crate::parser_proc::ParserProcess;
use crate::pattern;

/// Routes a file to the extractor bound to its language.
///
/// Unknown extensions yield zero chunks, never an error; a file the
/// extractor cannot handle surfaces as an error for the caller (the
/// directory walker) to tolerate.
#[derive(Debug, Clone)]
pub struct ChunkDispatcher {
    python: ParserProcess,
    elm: ParserProcess,
}

impl ChunkDispatcher {
    /// Dispatcher using the parser scripts installed under `parser_dir`.
    #[must_use]
    pub fn new(parser_dir: &Path) -> Self {
        Self {
            python: ParserProcess::python(parser_dir),
            elm: ParserProcess::elm(parser_dir),
        }
    }

    /// Dispatcher over explicitly constructed parser handles.
    #[must_use]
    pub fn with_parsers(python: ParserProcess, elm: ParserProcess) -> Self {
        Self { python, elm }
    }

    /// Extract all chunks from one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its external parser
    /// fails; unsupported extensions return an empty vec instead.
    pub async fn chunk_file(&self, path: &Path) -> Result<Vec<Chunk>> {
        match detect_language(path) {
            None => Ok(Vec::new()),
            Some(Lang::TypeScript) => {
                let source = tokio::fs::read_to_string(path).await?;
                Ok(pattern::chunk_source(
                    &source,
                    &path.display().to_string(),
                    Lang::TypeScript,
                ))
            }
            Some(Lang::Python) => self.python.extract(path).await,
            Some(Lang::Elm) => self.elm.extract(path).await,
        }
    }
}
