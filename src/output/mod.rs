//! Report assembly and serialization
//!
//! A [`Report`] bundles everything a consumer needs to render a project:
//! the nested node tree, the flat edge lists, optional layout positions,
//! statistics, and diagnostics.
//!
//! # Module Structure
//!
//! - `json` - JSON output

mod json;

use std::path::PathBuf;

use serde::Serialize;

use crate::analysis::Analysis;
use crate::error::Diagnostics;
use crate::graph::{DependencyEdge, TreeNode};
use crate::layout::LayoutResult;
use crate::stats::ProjectStats;

pub use json::{print_json, to_json, write_json};

/// Transport view of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub root: PathBuf,
    pub tree: TreeNode,
    /// Resolved import edges.
    pub edges: Vec<DependencyEdge>,
    /// Parent -> child links.
    pub tree_links: Vec<DependencyEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutResult>,
    pub stats: ProjectStats,
    pub diagnostics: Diagnostics,
}

impl Report {
    pub fn new(analysis: &Analysis, layout: Option<LayoutResult>) -> Self {
        let graph = &analysis.graph;
        Self {
            root: graph.root_node().path.clone(),
            tree: graph.to_tree(),
            edges: graph.edges(),
            tree_links: graph.tree_links(),
            layout,
            stats: analysis.stats(),
            diagnostics: analysis.diagnostics.clone(),
        }
    }
}
