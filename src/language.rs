//! Source language detection
//!
//! Only the JavaScript family carries the import syntax the extractor and
//! resolver understand, so this is the set of "source" extensions whose
//! content is read during a scan.

use std::path::Path;

use serde::Serialize;

/// Languages whose files are scanned for imports and structural signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl Language {
    /// Detect language from a file extension (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use codeorbit::language::Language;
    ///
    /// assert_eq!(Language::from_extension("tsx"), Some(Language::Tsx));
    /// assert_eq!(Language::from_extension("MJS"), Some(Language::JavaScript));
    /// assert_eq!(Language::from_extension("css"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Language::JavaScript),
            "jsx" => Some(Language::Jsx),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            _ => None,
        }
    }

    /// Detect language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Whether JSX element syntax is expected in this language.
    pub fn supports_jsx(&self) -> bool {
        matches!(self, Language::Jsx | Language::Tsx)
    }
}
