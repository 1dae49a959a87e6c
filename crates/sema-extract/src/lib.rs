//! Source-code chunk extraction.
//!
//! Turns a repository tree into a flat sequence of named chunks
//! (functions and classes). TypeScript/JavaScript files go through a
//! regex-based extractor; Python and Elm files go through bundled
//! out-of-process parsers speaking a JSON protocol on stdout.

pub mod chunk;
pub mod dispatch;
pub mod error;
pub mod languages;
pub mod parser_proc;
pub mod pattern;
pub mod walker;

pub use chunk::{Chunk, ChunkKind};
pub use dispatch::ChunkDispatcher;
pub use error::{ExtractError, Result};
pub use languages::Lang;
pub use walker::WalkReport;
