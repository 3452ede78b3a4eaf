//! Initial placement strategies
//!
//! Every strategy gives each node a starting position and each directory a
//! radius. Strategies may also attach a [`Containment`] that relaxation
//! re-applies after every step.

use std::collections::BTreeSet;
use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::category::{DistrictKind, MAX_LAYER};
use crate::estimator::importance;

use super::config::{BubbleConfig, DistrictConfig, SphereConfig};
use super::{District, LayoutGraph, LayoutItem};

/// Angle between successive points of a golden-angle distribution.
pub const GOLDEN_ANGLE: f64 = PI * (3.0 - 2.236_067_977_499_79);

/// Spatial constraint applied after each relaxation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Containment {
    Free,
    /// Stay within `radius` of a fixed center.
    Within { center: DVec3, radius: f64 },
    /// Stay within `radius` of the parent's current position.
    InsideParent { parent: usize, radius: f64 },
}

/// Output of a placement strategy, indexed like the layout graph.
#[derive(Debug, Clone)]
pub struct Placement {
    pub positions: Vec<DVec3>,
    pub radii: Vec<Option<f64>>,
    pub containment: Vec<Containment>,
    pub districts: Vec<District>,
}

impl Placement {
    fn new(len: usize) -> Self {
        Self {
            positions: vec![DVec3::ZERO; len],
            radii: vec![None; len],
            containment: vec![Containment::Free; len],
            districts: Vec::new(),
        }
    }
}

/// Direction of point `i` of `n` on a Fibonacci sphere.
///
/// A single point lies on the equator.
pub fn fibonacci_direction(i: usize, n: usize) -> DVec3 {
    let y = if n <= 1 {
        0.0
    } else {
        1.0 - 2.0 * i as f64 / (n - 1) as f64
    };
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = i as f64 * GOLDEN_ANGLE;
    DVec3::new(theta.cos() * ring, y, theta.sin() * ring)
}

/// Project `position` back inside the ball around `center`.
pub fn clamp_to_ball(position: DVec3, center: DVec3, radius: f64) -> DVec3 {
    let offset = position - center;
    let distance = offset.length();
    if distance > radius && distance > 0.0 {
        center + offset * (radius / distance)
    } else {
        position
    }
}

/// Children on Fibonacci shells around their parent, shell radius growing with depth.
pub fn hierarchical_sphere(graph: &LayoutGraph, config: &SphereConfig) -> Placement {
    let mut placement = Placement::new(graph.len());

    for (i, item) in graph.items.iter().enumerate() {
        let shell = config.layer_distance * (item.depth + 1) as f64 * config.child_spread;
        if item.is_dir {
            placement.radii[i] = Some(shell);
        }
        let origin = placement.positions[i];
        let n = item.children.len();
        for (k, &child) in item.children.iter().enumerate() {
            placement.positions[child] = origin + fibonacci_direction(k, n) * shell;
        }
    }
    placement
}

/// Height above the district plane: the category's layer, plus its weighted importance.
fn district_lift(item: &LayoutItem, config: &DistrictConfig) -> f64 {
    let layer = item.category.layer() as f64 / MAX_LAYER as f64;
    let weight = item.category.importance() * importance(item.degree, item.complexity)
        / config.importance_divisor;
    (layer + weight) * config.layer_height
}

/// Nodes grouped by district; districts spread around the origin with `core` at the center.
pub fn district_cluster(graph: &LayoutGraph, config: &DistrictConfig) -> Placement {
    let mut placement = Placement::new(graph.len());
    let step = TAU / DistrictKind::ALL.len() as f64;

    for (d, kind) in DistrictKind::ALL.iter().enumerate() {
        let members: Vec<usize> = (0..graph.len())
            .filter(|&i| graph.items[i].category.district() == *kind)
            .collect();
        if members.is_empty() {
            continue;
        }

        let center = if *kind == DistrictKind::Core {
            DVec3::ZERO
        } else {
            let angle = d as f64 * step;
            DVec3::new(angle.cos(), 0.0, angle.sin()) * config.base_radius
        };
        let n = members.len();
        let radius = (n as f64).sqrt() * config.member_spacing;

        for (k, &i) in members.iter().enumerate() {
            let item = &graph.items[i];
            let theta = k as f64 * GOLDEN_ANGLE;
            let distance = radius * k as f64 / n as f64;
            let lift = district_lift(item, config);
            let position =
                center + DVec3::new(theta.cos() * distance, lift, theta.sin() * distance);

            placement.positions[i] = clamp_to_ball(position, center, radius);
            placement.containment[i] = Containment::Within { center, radius };
            if item.is_dir {
                placement.radii[i] = Some(config.member_spacing);
            }
        }

        placement.districts.push(District {
            kind: *kind,
            center: center.to_array(),
            radius,
            member_ids: members.iter().map(|&i| graph.items[i].id.clone()).collect::<BTreeSet<_>>(),
        });
    }
    placement
}

/// Bubble size of a directory holding `files` direct files.
pub fn bubble_size(files: usize, config: &BubbleConfig) -> f64 {
    let packed = (files as f64).sqrt() * config.file_spacing + 2.0 * config.padding;
    packed.max(config.min_size)
}

/// Directories as bubbles ringed around their parent; files in a spiral inside.
pub fn folder_bubble(graph: &LayoutGraph, config: &BubbleConfig) -> Placement {
    let mut placement = Placement::new(graph.len());

    let sizes: Vec<f64> = graph
        .items
        .iter()
        .map(|item| {
            let files = item.children.iter().filter(|&&c| !graph.items[c].is_dir).count();
            bubble_size(files, config)
        })
        .collect();

    for (i, item) in graph.items.iter().enumerate() {
        if !item.is_dir {
            continue;
        }
        placement.radii[i] = Some(sizes[i]);
        let origin = placement.positions[i];

        let (dirs, files): (Vec<usize>, Vec<usize>) =
            item.children.iter().partition(|&&c| graph.items[c].is_dir);

        for (k, &child) in dirs.iter().enumerate() {
            let angle = TAU * k as f64 / dirs.len() as f64;
            let ring = sizes[i] + sizes[child] + config.sibling_spacing;
            placement.positions[child] = origin + DVec3::new(angle.cos(), 0.0, angle.sin()) * ring;
        }

        let inner = sizes[i] - config.padding;
        let n = files.len();
        for (k, &child) in files.iter().enumerate() {
            let fraction = ((k as f64 + 0.5) / n as f64).cbrt();
            placement.positions[child] = origin + fibonacci_direction(k, n) * (fraction * inner);
            placement.containment[child] = Containment::InsideParent {
                parent: i,
                radius: inner,
            };
        }
    }
    placement
}
