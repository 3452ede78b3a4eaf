//! Layout tuning parameters

use serde::{Deserialize, Serialize};

/// Interchangeable initial-placement strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    #[default]
    HierarchicalSphere,
    DistrictCluster,
    FolderBubble,
}

impl LayoutStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutStrategy::HierarchicalSphere => "hierarchical_sphere",
            LayoutStrategy::DistrictCluster => "district_cluster",
            LayoutStrategy::FolderBubble => "folder_bubble",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub strategy: LayoutStrategy,
    /// Relaxation iterations; 0 returns the initial placement.
    pub iterations: usize,
    pub seed: u64,
    /// Half-width of the seeded random offset added after placement.
    pub jitter: f64,
    pub forces: ForceConfig,
    pub sphere: SphereConfig,
    pub district: DistrictConfig,
    pub bubble: BubbleConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: LayoutStrategy::default(),
            iterations: 50,
            seed: 0,
            jitter: 0.0,
            forces: ForceConfig::default(),
            sphere: SphereConfig::default(),
            district: DistrictConfig::default(),
            bubble: BubbleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub repulsion_strength: f64,
    /// Pairs farther apart than this do not repel.
    pub repulsion_threshold: f64,
    /// Floor on squared distance in the repulsion denominator.
    pub min_distance_sq: f64,
    pub dependency_length: f64,
    pub dependency_strength: f64,
    pub tree_length: f64,
    pub tree_strength: f64,
    pub center_pull: f64,
    pub damping: f64,
    pub initial_temperature: f64,
    pub cooling: f64,
    /// Largest distance a node may move in one iteration.
    pub max_step: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            repulsion_strength: 1.0,
            repulsion_threshold: 10.0,
            min_distance_sq: 0.1,
            dependency_length: 5.0,
            dependency_strength: 0.05,
            tree_length: 3.0,
            tree_strength: 0.1,
            center_pull: 0.6,
            damping: 0.98,
            initial_temperature: 0.1,
            cooling: 0.98,
            max_step: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub layer_distance: f64,
    pub child_spread: f64,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            layer_distance: 5.0,
            child_spread: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistrictConfig {
    /// Distance of non-core district centers from the origin.
    pub base_radius: f64,
    /// District radius is `sqrt(members) * member_spacing`.
    pub member_spacing: f64,
    pub layer_height: f64,
    pub importance_divisor: f64,
}

impl Default for DistrictConfig {
    fn default() -> Self {
        Self {
            base_radius: 40.0,
            member_spacing: 5.0,
            layer_height: 15.0,
            importance_divisor: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub min_size: f64,
    pub file_spacing: f64,
    pub padding: f64,
    pub sibling_spacing: f64,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            min_size: 2.0,
            file_spacing: 1.5,
            padding: 0.5,
            sibling_spacing: 2.0,
        }
    }
}
