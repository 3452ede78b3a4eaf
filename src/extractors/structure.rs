//! Structural signal counts for complexity scoring

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::Extractor;
use crate::language::Language;

static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfunction\b|=>").expect("FUNCTION regex is invalid"));

static CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bclass\s+[A-Za-z_$]").expect("CLASS regex is invalid"));

static CONTROL_FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:if|for|while|switch|catch)\b").expect("CONTROL_FLOW regex is invalid")
});

static JSX_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[A-Za-z][\w.]*(?:\s|/?>)").expect("JSX_ELEMENT regex is invalid")
});

static STATE_HOOK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\buse(?:State|Reducer)\s*\(").expect("STATE_HOOK regex is invalid")
});

static HOOK_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\buse[A-Z]\w*\s*\(").expect("HOOK_CALL regex is invalid"));

/// Counts of structural signals in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMetrics {
    /// Non-blank lines.
    pub lines: usize,
    pub functions: usize,
    pub classes: usize,
    pub control_flow: usize,
    /// Only counted for JSX-capable languages.
    pub jsx_elements: usize,
    /// `useState` / `useReducer` calls.
    pub state_hooks: usize,
    /// Any other `useXxx(` call.
    pub other_hooks: usize,
}

/// Count structural signals in `content`.
pub fn measure(content: &str, language: Language) -> SourceMetrics {
    let state_hooks = STATE_HOOK.find_iter(content).count();
    let all_hooks = HOOK_CALL.find_iter(content).count();

    SourceMetrics {
        lines: content.lines().filter(|l| !l.trim().is_empty()).count(),
        functions: FUNCTION.find_iter(content).count(),
        classes: CLASS.find_iter(content).count(),
        control_flow: CONTROL_FLOW.find_iter(content).count(),
        jsx_elements: if language.supports_jsx() {
            JSX_ELEMENT.find_iter(content).count()
        } else {
            0
        },
        state_hooks,
        other_hooks: all_hooks.saturating_sub(state_hooks),
    }
}

/// Structure extractor implementing the [`Extractor`] trait.
pub struct StructureExtractor;

impl Extractor for StructureExtractor {
    type Output = SourceMetrics;

    fn extract(&self, content: &str, language: Language) -> Self::Output {
        measure(content, language)
    }

    fn name(&self) -> &'static str {
        "structure"
    }
}
