//! Complexity scoring
//!
//! Two passes over a resolved graph:
//!
//! 1. every file gets a raw structural score, rescaled by its import degree
//! 2. every directory gets the sum of its children, bottom-up
//!
//! The rescaled value feeds node sizing and importance in the layout.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::extractors::SourceMetrics;
use crate::graph::{NodeIndex, ProjectGraph};

/// Weights applied to each structural signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityWeights {
    pub function: f64,
    pub class: f64,
    pub control_flow: f64,
    pub jsx_element: f64,
    pub state_hook: f64,
    pub other_hook: f64,
    /// `k` in `complexity *= 1 + log2(1 + in + out) * k`.
    pub connectivity: f64,
    /// Score for files whose content was not scanned.
    pub default_score: f64,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            function: 2.0,
            class: 2.0,
            control_flow: 1.5,
            jsx_element: 1.2,
            state_hook: 2.0,
            other_hook: 1.0,
            connectivity: 0.2,
            default_score: 1.0,
        }
    }
}

/// Structural score before connectivity rescaling.
///
/// # Examples
///
/// ```
/// use codeorbit::estimator::{raw_score, ComplexityWeights};
/// use codeorbit::extractors::SourceMetrics;
///
/// let metrics = SourceMetrics { lines: 3, control_flow: 2, ..Default::default() };
/// assert_eq!(raw_score(&metrics, &ComplexityWeights::default()), 2.0 + 3.0);
/// ```
pub fn raw_score(metrics: &SourceMetrics, weights: &ComplexityWeights) -> f64 {
    (1.0 + metrics.lines as f64).log2()
        + metrics.functions as f64 * weights.function
        + metrics.classes as f64 * weights.class
        + metrics.control_flow as f64 * weights.control_flow
        + metrics.jsx_elements as f64 * weights.jsx_element
        + metrics.state_hooks as f64 * weights.state_hook
        + metrics.other_hooks as f64 * weights.other_hook
}

/// Connectivity multiplier for a node with the given total degree.
pub fn connectivity_factor(degree: usize, k: f64) -> f64 {
    1.0 + (1.0 + degree as f64).log2() * k
}

/// Score every node in place. Run after import resolution.
pub fn estimate(graph: &mut ProjectGraph, weights: &ComplexityWeights) {
    graph.nodes_mut().par_iter_mut().for_each(|node| {
        if node.is_file() {
            let raw = node
                .metrics
                .as_ref()
                .map(|m| raw_score(m, weights))
                .unwrap_or(weights.default_score);
            node.raw_complexity = raw;
            node.complexity = raw * connectivity_factor(node.degree(), weights.connectivity);
        } else {
            node.raw_complexity = 0.0;
            node.complexity = 0.0;
        }
    });

    for i in (1..graph.len()).rev() {
        let (raw, complexity, parent) = {
            let node = graph.node(NodeIndex(i));
            (node.raw_complexity, node.complexity, node.parent)
        };
        if let Some(parent) = parent {
            let dir = graph.node_mut(parent);
            dir.raw_complexity += raw;
            dir.complexity += complexity;
        }
    }
}

/// Importance used for vertical placement in the district layout.
pub fn importance(degree: usize, complexity: f64) -> f64 {
    (1.0 + degree as f64).log2() * complexity
}
