//! File classification by path and name heuristics
//!
//! A node's [`Category`] comes from an ordered rule list evaluated against its
//! root-relative path. Rules run in priority order and the first match wins;
//! anything unmatched is [`Category::Other`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of node classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Page,
    Layout,
    Route,
    Middleware,
    Component,
    Ui,
    Style,
    Asset,
    Hook,
    Context,
    Store,
    Service,
    Util,
    Api,
    Model,
    Schema,
    Query,
    Types,
    Test,
    Config,
    Env,
    Directory,
    Other,
}

/// Highest value returned by [`Category::layer`].
pub const MAX_LAYER: u8 = 4;

/// Coarse grouping used by the district clustering layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistrictKind {
    Core,
    Ui,
    Logic,
    Data,
    Utility,
}

impl DistrictKind {
    /// All districts in placement order. `Core` is first and sits at the origin.
    pub const ALL: [DistrictKind; 5] = [
        DistrictKind::Core,
        DistrictKind::Ui,
        DistrictKind::Logic,
        DistrictKind::Data,
        DistrictKind::Utility,
    ];
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Page => "page",
            Category::Layout => "layout",
            Category::Route => "route",
            Category::Middleware => "middleware",
            Category::Component => "component",
            Category::Ui => "ui",
            Category::Style => "style",
            Category::Asset => "asset",
            Category::Hook => "hook",
            Category::Context => "context",
            Category::Store => "store",
            Category::Service => "service",
            Category::Util => "util",
            Category::Api => "api",
            Category::Model => "model",
            Category::Schema => "schema",
            Category::Query => "query",
            Category::Types => "types",
            Category::Test => "test",
            Category::Config => "config",
            Category::Env => "env",
            Category::Directory => "directory",
            Category::Other => "other",
        }
    }

    /// Base importance score in `[0, 1]`.
    pub fn importance(&self) -> f64 {
        match self {
            Category::Page => 1.0,
            Category::Layout | Category::Store | Category::Api => 0.9,
            Category::Route
            | Category::Component
            | Category::Hook
            | Category::Service
            | Category::Model => 0.8,
            Category::Middleware
            | Category::Ui
            | Category::Context
            | Category::Schema
            | Category::Query => 0.7,
            Category::Style
            | Category::Util
            | Category::Types
            | Category::Config
            | Category::Env => 0.6,
            Category::Asset | Category::Test => 0.5,
            Category::Directory => 0.4,
            Category::Other => 0.3,
        }
    }

    /// Default vertical layer, higher for entry points. At most [`MAX_LAYER`].
    pub fn layer(&self) -> u8 {
        match self {
            Category::Page => 4,
            Category::Layout
            | Category::Route
            | Category::Hook
            | Category::Context
            | Category::Store
            | Category::Api => 3,
            Category::Middleware
            | Category::Component
            | Category::Ui
            | Category::Service
            | Category::Model
            | Category::Schema
            | Category::Query => 2,
            Category::Style
            | Category::Asset
            | Category::Util
            | Category::Types
            | Category::Test
            | Category::Config
            | Category::Env => 1,
            Category::Directory | Category::Other => 0,
        }
    }

    pub fn district(&self) -> DistrictKind {
        match self {
            Category::Page | Category::Layout | Category::Route | Category::Middleware => {
                DistrictKind::Core
            }
            Category::Component | Category::Ui | Category::Style | Category::Asset => {
                DistrictKind::Ui
            }
            Category::Hook | Category::Context | Category::Store | Category::Service => {
                DistrictKind::Logic
            }
            Category::Api | Category::Model | Category::Schema | Category::Query => {
                DistrictKind::Data
            }
            Category::Util
            | Category::Types
            | Category::Test
            | Category::Config
            | Category::Env
            | Category::Directory
            | Category::Other => DistrictKind::Utility,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercased view of a root-relative file path.
struct PathInfo<'a> {
    /// Directory segments, lowercased.
    dirs: Vec<String>,
    /// File name as written (case preserved).
    name: &'a str,
    lower_name: String,
    /// Final extension without the dot, lowercased.
    ext: String,
}

impl<'a> PathInfo<'a> {
    fn new(rel_path: &'a str) -> Self {
        let mut parts: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();
        let name = parts.pop().unwrap_or("");
        let lower_name = name.to_lowercase();
        let ext = lower_name
            .rsplit_once('.')
            .map(|(_, e)| e.to_string())
            .unwrap_or_default();
        Self {
            dirs: parts.iter().map(|s| s.to_lowercase()).collect(),
            name,
            lower_name,
            ext,
        }
    }

    fn in_dir(&self, names: &[&str]) -> bool {
        self.dirs.iter().any(|d| names.contains(&d.as_str()))
    }

    fn stem(&self) -> &str {
        self.lower_name
            .split_once('.')
            .map(|(s, _)| s)
            .unwrap_or(&self.lower_name)
    }

    fn is_script(&self) -> bool {
        matches!(self.ext.as_str(), "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs")
    }

    fn is_jsx_like(&self) -> bool {
        matches!(self.ext.as_str(), "jsx" | "tsx")
    }

    fn starts_uppercase(&self) -> bool {
        self.name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
    }

    fn in_router(&self) -> bool {
        self.in_dir(&["app", "pages"])
    }
}

struct Rule {
    category: Category,
    matches: fn(&PathInfo) -> bool,
}

const STYLE_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less", "styl"];
const ASSET_EXTENSIONS: &[&str] = &[
    "svg", "png", "jpg", "jpeg", "gif", "webp", "ico", "woff", "woff2", "ttf", "otf", "mp4",
];

static RULES: &[Rule] = &[
    Rule {
        category: Category::Test,
        matches: |p| {
            p.lower_name.contains(".test.")
                || p.lower_name.contains(".spec.")
                || p.in_dir(&["__tests__", "test", "tests", "__mocks__"])
        },
    },
    Rule {
        category: Category::Types,
        matches: |p| p.lower_name.ends_with(".d.ts") || p.in_dir(&["types", "typings"]),
    },
    Rule {
        category: Category::Style,
        matches: |p| STYLE_EXTENSIONS.contains(&p.ext.as_str()),
    },
    Rule {
        category: Category::Asset,
        matches: |p| ASSET_EXTENSIONS.contains(&p.ext.as_str()),
    },
    Rule {
        category: Category::Env,
        matches: |p| p.lower_name.starts_with(".env"),
    },
    Rule {
        category: Category::Config,
        matches: |p| {
            p.lower_name.contains(".config.")
                || (p.lower_name.starts_with('.') && p.lower_name.ends_with("rc"))
                || (p.lower_name.contains("rc.")
                    && matches!(p.ext.as_str(), "js" | "cjs" | "json" | "yml" | "yaml"))
                || matches!(p.ext.as_str(), "json" | "toml" | "yml" | "yaml")
        },
    },
    Rule {
        category: Category::Api,
        matches: |p| p.in_router() && p.in_dir(&["api"]) && p.is_script(),
    },
    Rule {
        category: Category::Page,
        matches: |p| {
            p.is_script()
                && ((p.in_dir(&["app"]) && p.stem() == "page")
                    || (p.in_dir(&["pages"]) && !p.stem().starts_with('_')))
        },
    },
    Rule {
        category: Category::Route,
        matches: |p| p.is_script() && p.in_dir(&["app"]) && p.stem() == "route",
    },
    Rule {
        category: Category::Layout,
        matches: |p| {
            p.is_script()
                && ((p.in_router() && matches!(p.stem(), "layout" | "_app" | "_document"))
                    || p.in_dir(&["layout", "layouts"]))
        },
    },
    Rule {
        category: Category::Middleware,
        matches: |p| p.is_script() && (p.stem() == "middleware" || p.in_dir(&["middleware"])),
    },
    Rule {
        category: Category::Hook,
        matches: |p| {
            p.is_script()
                && (p.in_dir(&["hooks"])
                    || p.name.strip_prefix("use").is_some_and(|rest| {
                        rest.starts_with('-') || rest.starts_with(|c: char| c.is_ascii_uppercase())
                    }))
        },
    },
    Rule {
        category: Category::Context,
        matches: |p| {
            p.is_script()
                && (p.in_dir(&["context", "contexts", "providers"])
                    || p.stem().ends_with("context")
                    || p.stem().ends_with("provider"))
        },
    },
    Rule {
        category: Category::Store,
        matches: |p| {
            p.is_script()
                && (p.in_dir(&["redux", "store", "stores", "features"])
                    || p.stem().ends_with("slice")
                    || p.stem() == "store")
        },
    },
    Rule {
        category: Category::Service,
        matches: |p| {
            p.is_script() && (p.in_dir(&["services"]) || p.stem().ends_with("service"))
        },
    },
    Rule {
        category: Category::Ui,
        matches: |p| p.is_jsx_like() && p.in_dir(&["ui"]),
    },
    Rule {
        category: Category::Component,
        matches: |p| {
            p.is_jsx_like() && (p.in_dir(&["components"]) || p.starts_uppercase())
        },
    },
    Rule {
        category: Category::Model,
        matches: |p| p.is_script() && p.in_dir(&["models", "model", "entities"]),
    },
    Rule {
        category: Category::Schema,
        matches: |p| {
            p.in_dir(&["schema", "schemas", "prisma"]) || p.lower_name.contains(".schema.")
        },
    },
    Rule {
        category: Category::Query,
        matches: |p| p.in_dir(&["queries", "query"]) || p.ext == "sql" || p.ext == "graphql",
    },
    Rule {
        category: Category::Api,
        matches: |p| p.is_script() && p.in_dir(&["api"]),
    },
    Rule {
        category: Category::Util,
        matches: |p| p.is_script() && p.in_dir(&["utils", "util", "helpers", "lib", "shared"]),
    },
];

/// Classify a file by its root-relative, `/`-separated path.
///
/// # Examples
///
/// ```
/// use codeorbit::category::{classify_file, Category};
///
/// assert_eq!(classify_file("src/components/Button.tsx"), Category::Component);
/// assert_eq!(classify_file("hooks/useAuth.ts"), Category::Hook);
/// assert_eq!(classify_file("README.md"), Category::Other);
/// ```
pub fn classify_file(rel_path: &str) -> Category {
    let info = PathInfo::new(rel_path);
    RULES
        .iter()
        .find(|rule| (rule.matches)(&info))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}
