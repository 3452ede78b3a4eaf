//! Force-directed relaxation
//!
//! Each iteration accumulates repulsion, spring and center forces, integrates
//! them into damped velocities, then re-applies placement containment. Node
//! forces are summed in fixed index order so the output does not depend on
//! the number of rayon threads.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::DVec3;
use rayon::prelude::*;

use super::config::ForceConfig;
use super::placement::{Containment, clamp_to_ball};

/// Spring between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    pub length: f64,
    pub stiffness: f64,
}

fn hash_u64(parts: &[u64]) -> u64 {
    let mut h = DefaultHasher::new();
    parts.hash(&mut h);
    h.finish()
}

fn unit_interval(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

/// Deterministic pseudo-random unit vector.
pub fn seeded_direction(seed: u64, a: u64, b: u64) -> DVec3 {
    let h = hash_u64(&[seed, a, b]);
    let y = unit_interval(h) * 2.0 - 1.0;
    let theta = unit_interval(hash_u64(&[h, seed])) * std::f64::consts::TAU;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    DVec3::new(theta.cos() * ring, y, theta.sin() * ring)
}

/// Deterministic offset in `[-amplitude, amplitude]` per axis.
pub fn seeded_offset(seed: u64, index: u64, amplitude: f64) -> DVec3 {
    let axis = |k: u64| (unit_interval(hash_u64(&[seed, index, k])) * 2.0 - 1.0) * amplitude;
    DVec3::new(axis(0), axis(1), axis(2))
}

/// Repulsion felt by node `i` from every other node within range.
fn repulsion_on(i: usize, positions: &[DVec3], config: &ForceConfig, seed: u64) -> DVec3 {
    let mut force = DVec3::ZERO;
    let here = positions[i];
    for (j, &there) in positions.iter().enumerate() {
        if j == i {
            continue;
        }
        let delta = here - there;
        let distance_sq = delta.length_squared();
        if distance_sq > config.repulsion_threshold * config.repulsion_threshold {
            continue;
        }
        let direction = if distance_sq > 1e-18 {
            delta / distance_sq.sqrt()
        } else {
            // Coincident pair: push apart along a seeded axis, opposite for each side
            let (lo, hi) = (i.min(j) as u64, i.max(j) as u64);
            let axis = seeded_direction(seed, lo, hi);
            if i < j { axis } else { -axis }
        };
        force += direction * (config.repulsion_strength / distance_sq.max(config.min_distance_sq));
    }
    force
}

fn center_pull(position: DVec3, pull: f64) -> DVec3 {
    let distance = position.length();
    if distance < 1e-12 {
        return DVec3::ZERO;
    }
    -position / distance * (pull / distance.max(1.0))
}

/// Clamp every constrained node, parents before children.
pub fn apply_containment(positions: &mut [DVec3], containment: &[Containment]) {
    for i in 0..positions.len() {
        positions[i] = match containment[i] {
            Containment::Free => positions[i],
            Containment::Within { center, radius } => clamp_to_ball(positions[i], center, radius),
            Containment::InsideParent { parent, radius } => {
                clamp_to_ball(positions[i], positions[parent], radius)
            }
        };
    }
}

/// Run `iterations` relaxation steps in place.
pub fn relax(
    positions: &mut [DVec3],
    springs: &[Spring],
    containment: &[Containment],
    config: &ForceConfig,
    iterations: usize,
    seed: u64,
) {
    let n = positions.len();
    let mut velocities = vec![DVec3::ZERO; n];
    let mut temperature = config.initial_temperature;

    for _ in 0..iterations {
        let snapshot: &[DVec3] = positions;
        let mut forces: Vec<DVec3> = (0..n)
            .into_par_iter()
            .map(|i| {
                repulsion_on(i, snapshot, config, seed)
                    + center_pull(snapshot[i], config.center_pull)
            })
            .collect();

        for spring in springs {
            let delta = positions[spring.b] - positions[spring.a];
            let distance = delta.length();
            if distance < 1e-12 {
                continue;
            }
            let pull = delta / distance * (spring.stiffness * (distance - spring.length));
            forces[spring.a] += pull;
            forces[spring.b] -= pull;
        }

        for i in 0..n {
            let mut velocity = (velocities[i] + forces[i] * temperature) * config.damping;
            let speed = velocity.length();
            if speed > config.max_step {
                velocity *= config.max_step / speed;
            }
            velocities[i] = velocity;
            positions[i] += velocity;
        }

        apply_containment(positions, containment);
        temperature *= config.cooling;
    }
}
