//! codeorbit - scan a JavaScript/TypeScript project into a 3D dependency map
//!
//! The pipeline runs in four passes over one arena-backed [`ProjectGraph`]:
//! [`tree::Scanner`] walks the directory, [`resolver::resolve_imports`] turns
//! specifiers into edges, [`estimator::estimate`] scores every node, and
//! [`layout::LayoutEngine`] places nodes in space. [`Analyzer`] drives the
//! first three; layout is run on demand.

pub mod analysis;
pub mod category;
pub mod config;
pub mod error;
pub mod estimator;
pub mod extractors;
pub mod file_utils;
pub mod graph;
pub mod language;
pub mod layout;
pub mod output;
pub mod resolver;
pub mod stats;
#[cfg(feature = "test-utils")]
pub mod test_utils;
pub mod tree;

pub use analysis::{Analysis, Analyzer};
pub use category::{Category, DistrictKind, classify_file};
pub use config::Settings;
pub use error::{AnalysisError, Diagnostics, Issue, Result};
pub use estimator::ComplexityWeights;
pub use graph::{
    DependencyEdge, EdgeKind, GraphNode, NodeId, NodeIndex, NodeKind, ProjectGraph, TreeNode,
};
pub use layout::{LayoutConfig, LayoutEngine, LayoutResult, LayoutStrategy, layout};
pub use output::{Report, print_json};
pub use resolver::{ResolveStrategy, Resolver, resolve_imports};
pub use stats::{ProjectStats, print_stats};
pub use tree::{ScanConfig, Scanner};
