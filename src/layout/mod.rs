//! 3D layout of a resolved project graph
//!
//! A run moves through [`LayoutPhase`]s: `Idle → Placing → Relaxing → Done`.
//! Placement picks starting positions with one [`LayoutStrategy`]; relaxation
//! then refines them with the same force model for every strategy. Results are
//! rebuilt from scratch on every run.

mod config;
pub mod forces;
pub mod placement;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use glam::DVec3;
use serde::Serialize;
use tracing::debug;

use crate::category::{Category, DistrictKind};
use crate::graph::{NodeId, ProjectGraph};

pub use config::{
    BubbleConfig, DistrictConfig, ForceConfig, LayoutConfig, LayoutStrategy, SphereConfig,
};
use forces::{Spring, apply_containment, relax, seeded_offset};
use placement::Placement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    Idle,
    Placing,
    Relaxing,
    Done,
}

impl fmt::Display for LayoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutPhase::Idle => "idle",
            LayoutPhase::Placing => "placing",
            LayoutPhase::Relaxing => "relaxing",
            LayoutPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Position of one node, plus a radius for directories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: NodeId,
    pub position: [f64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// Category cluster used by [`LayoutStrategy::DistrictCluster`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct District {
    pub kind: DistrictKind,
    pub center: [f64; 3],
    pub radius: f64,
    pub member_ids: BTreeSet<NodeId>,
}

/// Final output of a layout run.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    pub strategy: LayoutStrategy,
    pub iterations: usize,
    pub positions: BTreeMap<NodeId, [f64; 3]>,
    pub radii: BTreeMap<NodeId, f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub districts: Vec<District>,
    /// Same data as the maps, in arena order.
    #[serde(skip)]
    pub nodes: Vec<LayoutNode>,
}

impl LayoutResult {
    fn from_nodes(
        strategy: LayoutStrategy,
        iterations: usize,
        nodes: Vec<LayoutNode>,
        districts: Vec<District>,
    ) -> Self {
        let positions = nodes.iter().map(|n| (n.id.clone(), n.position)).collect();
        let radii = nodes
            .iter()
            .filter_map(|n| n.radius.map(|r| (n.id.clone(), r)))
            .collect();
        Self {
            strategy,
            iterations,
            positions,
            radii,
            districts,
            nodes,
        }
    }

    pub fn position(&self, id: &str) -> Option<DVec3> {
        self.positions.get(id).map(|p| DVec3::from_array(*p))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Per-node facts the layout needs, indexed like the graph arena.
#[derive(Debug, Clone)]
pub struct LayoutItem {
    pub id: NodeId,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub is_dir: bool,
    pub depth: usize,
    pub complexity: f64,
    pub degree: usize,
    pub category: Category,
}

/// Read-only snapshot of a graph for layout.
#[derive(Debug, Clone)]
pub struct LayoutGraph {
    pub items: Vec<LayoutItem>,
    /// Import edges as `(from, to, strength)`.
    pub dependencies: Vec<(usize, usize, f64)>,
}

impl LayoutGraph {
    pub fn from_project(graph: &ProjectGraph) -> Self {
        let items = graph
            .nodes()
            .iter()
            .map(|n| LayoutItem {
                id: n.id.clone(),
                parent: n.parent.map(|p| p.0),
                children: n.children.iter().map(|c| c.0).collect(),
                is_dir: n.is_dir(),
                depth: n.depth,
                complexity: n.complexity,
                degree: n.degree(),
                category: n.category,
            })
            .collect();
        let dependencies = graph
            .edges()
            .into_iter()
            .filter_map(|e| {
                let from = graph.index_of(e.from.as_str())?;
                let to = graph.index_of(e.to.as_str())?;
                Some((from.0, to.0, e.strength))
            })
            .collect();
        Self {
            items,
            dependencies,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dependency springs followed by tree springs.
    fn springs(&self, config: &ForceConfig) -> Vec<Spring> {
        let dependency = self.dependencies.iter().map(|&(a, b, strength)| Spring {
            a,
            b,
            length: config.dependency_length,
            stiffness: config.dependency_strength * strength,
        });
        let tree = self.items.iter().enumerate().filter_map(|(b, item)| {
            item.parent.map(|a| Spring {
                a,
                b,
                length: config.tree_length,
                stiffness: config.tree_strength,
            })
        });
        dependency.chain(tree).collect()
    }
}

/// Drives a single layout run.
pub struct LayoutEngine {
    config: LayoutConfig,
    phase: LayoutPhase,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            phase: LayoutPhase::Idle,
        }
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn enter(&mut self, phase: LayoutPhase) {
        debug!(from = %self.phase, to = %phase, "layout phase");
        self.phase = phase;
    }

    /// Lay out `graph` from scratch.
    pub fn run(&mut self, graph: &ProjectGraph) -> LayoutResult {
        self.phase = LayoutPhase::Idle;
        self.run_snapshot(&LayoutGraph::from_project(graph))
    }

    pub fn run_snapshot(&mut self, graph: &LayoutGraph) -> LayoutResult {
        let strategy = self.config.strategy;

        if graph.len() <= 1 {
            self.enter(LayoutPhase::Done);
            let nodes = graph
                .items
                .iter()
                .map(|item| LayoutNode {
                    id: item.id.clone(),
                    position: [0.0; 3],
                    radius: None,
                })
                .collect();
            return LayoutResult::from_nodes(strategy, 0, nodes, Vec::new());
        }

        self.enter(LayoutPhase::Placing);
        let Placement {
            mut positions,
            radii,
            containment,
            districts,
        } = match strategy {
            LayoutStrategy::HierarchicalSphere => {
                placement::hierarchical_sphere(graph, &self.config.sphere)
            }
            LayoutStrategy::DistrictCluster => {
                placement::district_cluster(graph, &self.config.district)
            }
            LayoutStrategy::FolderBubble => placement::folder_bubble(graph, &self.config.bubble),
        };
        if self.config.jitter > 0.0 {
            for (i, position) in positions.iter_mut().enumerate() {
                *position += seeded_offset(self.config.seed, i as u64, self.config.jitter);
            }
            apply_containment(&mut positions, &containment);
        }

        self.enter(LayoutPhase::Relaxing);
        let springs = graph.springs(&self.config.forces);
        relax(
            &mut positions,
            &springs,
            &containment,
            &self.config.forces,
            self.config.iterations,
            self.config.seed,
        );

        self.enter(LayoutPhase::Done);
        let nodes = graph
            .items
            .iter()
            .zip(positions.iter().zip(radii))
            .map(|(item, (position, radius))| LayoutNode {
                id: item.id.clone(),
                position: position.to_array(),
                radius,
            })
            .collect();
        debug!(
            strategy = strategy.name(),
            nodes = graph.len(),
            springs = springs.len(),
            "layout complete"
        );
        LayoutResult::from_nodes(strategy, self.config.iterations, nodes, districts)
    }
}

/// Convenience wrapper for a one-off layout.
pub fn layout(graph: &ProjectGraph, config: &LayoutConfig) -> LayoutResult {
    LayoutEngine::new(config.clone()).run(graph)
}
