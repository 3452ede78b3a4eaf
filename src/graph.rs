//! Node arena shared by every pipeline stage
//!
//! Nodes live in a flat `Vec` indexed by [`NodeIndex`]. A parent is always
//! pushed before its children, so iterating the arena in reverse visits every
//! node after all of its descendants. The import graph is stored as id sets on
//! each node and is independent of the parent/child tree.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{Category, classify_file};
use crate::extractors::SourceMetrics;

/// Maximum strength of a dependency edge.
pub const MAX_EDGE_STRENGTH: f64 = 2.0;

/// Strength reported for parent -> child links.
pub const TREE_LINK_STRENGTH: f64 = 0.5;

/// Stable node key: the root's name, then `parent_id/name` below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn child(&self, name: &str) -> Self {
        NodeId(format!("{}/{}", self.0, name))
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One file or directory.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub category: Category,
    pub name: String,
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Root-relative path joined with `/`. Empty for the root.
    pub rel_path: String,
    pub depth: usize,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub size: u64,
    /// Structural score before connectivity rescaling.
    pub raw_complexity: f64,
    pub complexity: f64,
    pub imports: BTreeSet<NodeId>,
    pub imported_by: BTreeSet<NodeId>,
    /// Specifiers as written in the source, before resolution.
    pub raw_imports: Vec<String>,
    pub exports: Vec<String>,
    pub extension: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub metrics: Option<SourceMetrics>,
}

impl GraphNode {
    fn new(
        id: NodeId,
        kind: NodeKind,
        name: String,
        path: PathBuf,
        rel_path: String,
        depth: usize,
        parent: Option<NodeIndex>,
    ) -> Self {
        let category = match kind {
            NodeKind::Directory => Category::Directory,
            NodeKind::File => classify_file(&rel_path),
        };
        Self {
            id,
            kind,
            category,
            name,
            path,
            rel_path,
            depth,
            parent,
            children: Vec::new(),
            size: 0,
            raw_complexity: 0.0,
            complexity: 0.0,
            imports: BTreeSet::new(),
            imported_by: BTreeSet::new(),
            raw_imports: Vec::new(),
            exports: Vec::new(),
            extension: None,
            last_modified: None,
            metrics: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// In-degree plus out-degree in the import graph.
    pub fn degree(&self) -> usize {
        self.imports.len() + self.imported_by.len()
    }
}

/// Kind of a derived edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Import,
    Tree,
}

/// Flat edge view over the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
    pub strength: f64,
}

/// Edge strength scaled by the combined complexity of both endpoints.
pub fn edge_strength(from_complexity: f64, to_complexity: f64) -> f64 {
    let combined = (from_complexity + to_complexity).max(0.0);
    (1.0 + (1.0 + combined).log2() * 0.1).min(MAX_EDGE_STRENGTH)
}

/// The scanned tree plus its import graph.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<NodeId, NodeIndex>,
}

impl ProjectGraph {
    /// Create a graph holding only a root directory node.
    pub fn with_root(name: &str, path: &Path) -> Self {
        let id = NodeId::from(name);
        let root = GraphNode::new(
            id.clone(),
            NodeKind::Directory,
            name.to_string(),
            path.to_path_buf(),
            String::new(),
            0,
            None,
        );
        let mut index = HashMap::new();
        index.insert(id, NodeIndex(0));
        Self {
            nodes: vec![root],
            index,
        }
    }

    /// Append a child under `parent` and return its index.
    pub fn add_child(
        &mut self,
        parent: NodeIndex,
        name: &str,
        kind: NodeKind,
        path: PathBuf,
    ) -> NodeIndex {
        let (id, rel_path, depth) = {
            let p = &self.nodes[parent.0];
            let rel_path = if p.rel_path.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", p.rel_path, name)
            };
            (p.id.child(name), rel_path, p.depth + 1)
        };

        let idx = NodeIndex(self.nodes.len());
        let node = GraphNode::new(
            id.clone(),
            kind,
            name.to_string(),
            path,
            rel_path,
            depth,
            Some(parent),
        );
        self.nodes.push(node);
        self.index.insert(id, idx);
        self.nodes[parent.0].children.push(idx);
        idx
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    pub fn root_node(&self) -> &GraphNode {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.nodes[idx.0]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut GraphNode {
        &mut self.nodes[idx.0]
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).map(|idx| &self.nodes[idx.0])
    }

    pub fn files(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_file())
            .map(|(i, n)| (NodeIndex(i), n))
    }

    pub fn parent_id(&self, idx: NodeIndex) -> Option<&NodeId> {
        self.nodes[idx.0].parent.map(|p| &self.nodes[p.0].id)
    }

    /// Resolved import edges, in arena order then target id order.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges = Vec::new();
        for node in &self.nodes {
            for target in &node.imports {
                let Some(to) = self.get(target.as_str()) else {
                    continue;
                };
                edges.push(DependencyEdge {
                    from: node.id.clone(),
                    to: target.clone(),
                    kind: EdgeKind::Import,
                    strength: edge_strength(node.complexity, to.complexity),
                });
            }
        }
        edges
    }

    /// Parent -> child links, in arena order.
    pub fn tree_links(&self) -> Vec<DependencyEdge> {
        self.nodes
            .iter()
            .filter_map(|node| {
                let parent = node.parent?;
                Some(DependencyEdge {
                    from: self.nodes[parent.0].id.clone(),
                    to: node.id.clone(),
                    kind: EdgeKind::Tree,
                    strength: TREE_LINK_STRENGTH,
                })
            })
            .collect()
    }

    /// Build the nested transport tree without recursion.
    pub fn to_tree(&self) -> TreeNode {
        let mut built: Vec<Option<TreeNode>> = vec![None; self.nodes.len()];
        for i in (0..self.nodes.len()).rev() {
            let node = &self.nodes[i];
            let children = node
                .children
                .iter()
                .filter_map(|c| built[c.0].take())
                .collect();
            built[i] = Some(TreeNode::from_node(
                node,
                self.parent_id(NodeIndex(i)).cloned(),
                children,
            ));
        }
        built[0]
            .take()
            .unwrap_or_else(|| TreeNode::from_node(&self.nodes[0], None, Vec::new()))
    }
}

/// Serialisable nested view of a node and its descendants.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub category: Category,
    pub path: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    pub size: u64,
    pub complexity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    pub imports: Vec<NodeId>,
    pub imported_by: Vec<NodeId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SourceMetrics>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn from_node(node: &GraphNode, parent_id: Option<NodeId>, children: Vec<TreeNode>) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            category: node.category,
            path: node.rel_path.clone(),
            depth: node.depth,
            parent_id,
            size: node.size,
            complexity: node.complexity,
            extension: node.extension.clone(),
            last_modified: node.last_modified,
            imports: node.imports.iter().cloned().collect(),
            imported_by: node.imported_by.iter().cloned().collect(),
            exports: node.exports.clone(),
            metrics: node.metrics.clone(),
            children,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Hand-built graphs for unit tests elsewhere in the crate.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a graph rooted at `proj` from `(rel_path, raw_imports)` pairs.
    /// Intermediate directories are created on first use.
    pub fn graph_with_files(files: &[(&str, &[&str])]) -> ProjectGraph {
        let root_path = PathBuf::from("/proj");
        let mut graph = ProjectGraph::with_root("proj", &root_path);
        for (rel, imports) in files {
            let mut parent = graph.root();
            let parts: Vec<&str> = rel.split('/').collect();
            for (i, part) in parts.iter().enumerate() {
                let is_last = i + 1 == parts.len();
                let id = format!("{}/{}", graph.node(parent).id, part);
                parent = match graph.index_of(&id) {
                    Some(existing) => existing,
                    None => {
                        let kind = if is_last { NodeKind::File } else { NodeKind::Directory };
                        let path = root_path.join(parts[..=i].join("/"));
                        graph.add_child(parent, part, kind, path)
                    }
                };
            }
            graph.node_mut(parent).raw_imports = imports.iter().map(|s| s.to_string()).collect();
        }
        graph
    }
}
