//! Entry exclusion for the scanner

use std::path::Path;

use glob::Pattern;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

enum NamePattern {
    Exact(String),
    Glob(Pattern),
    /// Leading-`*` pattern the glob parser rejected; matched as a plain suffix.
    Suffix(String),
}

impl NamePattern {
    fn parse(pattern: &str) -> Self {
        if !pattern.contains(['*', '?', '[']) {
            return NamePattern::Exact(pattern.to_string());
        }
        match Pattern::new(pattern) {
            Ok(p) => NamePattern::Glob(p),
            Err(_) => match pattern.strip_prefix('*') {
                Some(suffix) => NamePattern::Suffix(suffix.to_string()),
                None => NamePattern::Exact(pattern.to_string()),
            },
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Exact(exact) => name == exact,
            NamePattern::Glob(glob) => glob.matches(name),
            NamePattern::Suffix(suffix) => name.ends_with(suffix.as_str()),
        }
    }
}

/// Decides which directory entries a scan skips.
pub struct ExcludeFilter {
    patterns: Vec<NamePattern>,
    gitignore: Option<Gitignore>,
}

impl ExcludeFilter {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns.iter().map(|p| NamePattern::parse(p)).collect(),
            gitignore: None,
        }
    }

    /// Additionally honour `<root>/.gitignore`. A missing file is not an error.
    pub fn with_gitignore(mut self, root: &Path) -> Self {
        let file = root.join(".gitignore");
        if !file.is_file() {
            debug!(root = %root.display(), "no .gitignore at scan root");
            return self;
        }
        let mut builder = GitignoreBuilder::new(root);
        if let Some(e) = builder.add(&file) {
            warn!(path = %file.display(), error = %e, "ignoring malformed .gitignore lines");
        }
        match builder.build() {
            Ok(gitignore) => self.gitignore = Some(gitignore),
            Err(e) => warn!(path = %file.display(), error = %e, "could not load .gitignore"),
        }
        self
    }

    /// Check whether an entry should be skipped.
    pub fn is_excluded(&self, path: &Path, name: &str, is_dir: bool) -> bool {
        if self.patterns.iter().any(|p| p.matches(name)) {
            return true;
        }
        self.gitignore
            .as_ref()
            .is_some_and(|g| g.matched(path, is_dir).is_ignore())
    }
}
