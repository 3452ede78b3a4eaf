//! Import specifier and export name extraction
//!
//! Patterns run over the whole file so statements that span several lines
//! (`import {\n a,\n b\n} from './x'`) are still found. Matches inside string
//! literals or comments are not filtered out.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::Extractor;
use crate::language::Language;

static STATIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)(?:^|;)\s*import\s+(?:[\w$*{},\s]+?\s+from\s*)?['"]([^'"\n]+)['"]"#)
        .expect("STATIC_IMPORT regex is invalid")
});

static DYNAMIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#)
        .expect("DYNAMIC_IMPORT regex is invalid")
});

static REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).expect("REQUIRE regex is invalid")
});

static EXPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)(?:^|;)\s*export\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"]([^'"\n]+)['"]"#,
    )
    .expect("EXPORT_FROM regex is invalid")
});

static EXPORT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*export\s+(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?:async\s+)?(?:class|function\*?|const|let|var|interface|type|enum)\s+([A-Za-z_$][\w$]*)",
    )
    .expect("EXPORT_DECL regex is invalid")
});

static EXPORT_DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*export\s+default\b").expect("EXPORT_DEFAULT regex is invalid")
});

static EXPORT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*export\s+(?:type\s+)?\{([^}]*)\}").expect("EXPORT_LIST regex is invalid")
});

/// Whether a specifier can point into the scanned tree.
///
/// Relative (`./`, `../`) and root-relative (`/`, `@/`, `~/`) specifiers are
/// kept; bare package names are not.
pub fn is_internal_specifier(spec: &str) -> bool {
    spec.starts_with('.')
        || spec.starts_with('/')
        || spec.starts_with("@/")
        || spec.starts_with("~/")
}

/// Offset of the first non-whitespace byte of a line-anchored match.
fn keyword_start(m: regex::Match<'_>) -> usize {
    let text = m.as_str();
    m.start() + (text.len() - text.trim_start().len())
}

/// Keep first occurrences in source order.
fn ordered_unique(mut found: Vec<(usize, String)>) -> Vec<String> {
    found.sort_by_key(|(offset, _)| *offset);
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter_map(|(_, s)| seen.insert(s.clone()).then_some(s))
        .collect()
}

/// Extract internal import specifiers in source order, de-duplicated.
///
/// # Examples
///
/// ```
/// use codeorbit::extractors::extract_imports;
///
/// let src = "import React from 'react';\nimport { b } from './b';\nconst c = require('../c');";
/// assert_eq!(extract_imports(src), vec!["./b", "../c"]);
/// ```
pub fn extract_imports(content: &str) -> Vec<String> {
    let mut found = Vec::new();
    for re in [&*STATIC_IMPORT, &*DYNAMIC_IMPORT, &*REQUIRE, &*EXPORT_FROM] {
        for caps in re.captures_iter(content) {
            if let Some(spec) = caps.get(1) {
                let value = spec.as_str().trim();
                if is_internal_specifier(value) {
                    found.push((spec.start(), value.to_string()));
                }
            }
        }
    }
    ordered_unique(found)
}

/// Extract exported names in source order, de-duplicated.
///
/// Anonymous default exports are reported as `default`; aliased list entries
/// (`export { a as b }`) report the public name.
pub fn extract_exports(content: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut decl_starts = HashSet::new();

    for caps in EXPORT_DECL.captures_iter(content) {
        if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
            decl_starts.insert(keyword_start(whole));
            found.push((name.start(), name.as_str().to_string()));
        }
    }

    for m in EXPORT_DEFAULT.find_iter(content) {
        let start = keyword_start(m);
        if !decl_starts.contains(&start) {
            found.push((start, "default".to_string()));
        }
    }

    for caps in EXPORT_LIST.captures_iter(content) {
        let Some(list) = caps.get(1) else {
            continue;
        };
        for item in list.as_str().split(',') {
            let item = item.trim();
            let item = item.strip_prefix("type ").unwrap_or(item).trim();
            let public = match item.rsplit_once(" as ") {
                Some((_, alias)) => alias.trim(),
                None => item,
            };
            if !public.is_empty() {
                found.push((list.start(), public.to_string()));
            }
        }
    }

    ordered_unique(found)
}

/// Import extractor implementing the [`Extractor`] trait.
pub struct ImportExtractor;

impl Extractor for ImportExtractor {
    type Output = Vec<String>;

    fn extract(&self, content: &str, _language: Language) -> Self::Output {
        extract_imports(content)
    }

    fn name(&self) -> &'static str {
        "imports"
    }
}

/// Export extractor implementing the [`Extractor`] trait.
pub struct ExportExtractor;

impl Extractor for ExportExtractor {
    type Output = Vec<String>;

    fn extract(&self, content: &str, _language: Language) -> Self::Output {
        extract_exports(content)
    }

    fn name(&self) -> &'static str {
        "exports"
    }
}
