//! Language detection keyed on file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported source language. Closed set: each variant is bound to
/// exactly one extraction strategy in [`crate::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    TypeScript,
    Python,
    Elm,
}

impl Lang {
    /// Identifier carried in the chunk schema.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Elm => "elm",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Detect language from file extension.
///
/// JavaScript variants map to [`Lang::TypeScript`]: both feed the same
/// pattern extractor and carry the same language tag.
#[must_use]
pub fn detect_language(path: &Path) -> Option<Lang> {
    let ext = path.extension()?.to_str()?;
    match ext {
        "ts" | "tsx" | "js" | "jsx" => Some(Lang::TypeScript),
        "py" => Some(Lang::Python),
        "elm" => Some(Lang::Elm),
        _ => None,
    }
}

/// Check whether a file's extension maps to a supported language.
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    detect_language(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_language_ts_variants() {
        for ext in &["ts", "tsx", "js", "jsx"] {
            let path = format!("file.{ext}");
            assert_eq!(
                detect_language(Path::new(&path)),
                Some(Lang::TypeScript),
                "failed for .{ext}"
            );
        }
    }

    #[test]
    fn detect_language_py() {
        assert_eq!(detect_language(Path::new("script.py")), Some(Lang::Python));
    }

    #[test]
    fn detect_language_elm() {
        assert_eq!(detect_language(Path::new("src/Main.elm")), Some(Lang::Elm));
    }

    #[test]
    fn detect_language_unknown_ext_returns_none() {
        assert_eq!(detect_language(Path::new("file.rs")), None);
        assert_eq!(detect_language(Path::new("file.xyz")), None);
        assert_eq!(detect_language(Path::new("file")), None);
    }

    #[test]
    fn is_supported_known_and_unknown() {
        assert!(is_supported(Path::new("a.ts")));
        assert!(is_supported(Path::new("a.py")));
        assert!(!is_supported(Path::new("a.go")));
    }

    #[test]
    fn lang_id_roundtrip() {
        for lang in [Lang::TypeScript, Lang::Python, Lang::Elm] {
            assert!(!lang.id().is_empty());
            assert_eq!(lang.to_string(), lang.id());
        }
    }

    #[test]
    fn lang_serde_lowercase() {
        let json = serde_json::to_string(&Lang::TypeScript).unwrap();
        assert_eq!(json, "\"typescript\"");
        let back: Lang = serde_json::from_str("\"elm\"").unwrap();
        assert_eq!(back, Lang::Elm);
    }
}
