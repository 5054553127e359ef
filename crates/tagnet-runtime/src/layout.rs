//! Force-directed layout (Fruchterman-Reingold) for tag graphs.
//!
//! Initial positions are drawn from a seeded RNG in node order, so the
//! same graph and seed always produce the same coordinates. Every pair
//! of nodes repels with `k² / d`; every edge attracts with
//! `weight · d² / k`. Each step moves a node by at most the current
//! temperature, which cools linearly to zero over the iteration budget.
//! The result is centred on the origin and scaled so the largest
//! absolute coordinate equals `scale`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tagnet_core::error::{Result, TagnetError};
use tagnet_core::graph::TagGraph;
use tagnet_core::types::Position;
use tracing::debug;

/// Distances are clipped to this to keep forces finite.
const MIN_DISTANCE: f64 = 0.01;

/// Layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub iterations: usize,
    /// Optimal distance between connected nodes (`k`).
    pub ideal_edge_length: f64,
    pub seed: u64,
    /// Half-width of the output square.
    pub scale: f64,
    /// Stop early once the mean node movement drops below this.
    pub threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            ideal_edge_length: 0.8,
            seed: 42,
            scale: 1.0,
            threshold: 1e-4,
        }
    }
}

impl LayoutConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Reject non-finite or non-positive lengths and scales.
    pub fn validate(&self) -> Result<()> {
        check_positive("layout.ideal_edge_length", self.ideal_edge_length)?;
        check_positive("layout.scale", self.scale)?;
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(TagnetError::invalid_config(
                "layout.threshold",
                self.threshold.to_string(),
                "must be a finite, non-negative number",
            ));
        }
        Ok(())
    }
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TagnetError::invalid_config(
            field,
            value.to_string(),
            "must be a finite, positive number",
        ))
    }
}

/// Node positions keyed by tag name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    positions: BTreeMap<String, Position>,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
        self.positions.iter().map(|(id, p)| (id.as_str(), *p))
    }

    /// Largest absolute coordinate, 0 for an empty layout.
    pub fn extent(&self) -> f64 {
        self.positions
            .values()
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(0.0, f64::max)
    }
}

/// Lay out a graph with default parameters and the given seed.
pub fn layout<G: TagGraph + ?Sized>(graph: &G, seed: u64) -> Layout {
    compute(graph, &LayoutConfig::with_seed(seed))
}

/// Lay out a graph with explicit parameters.
pub fn layout_with<G: TagGraph + ?Sized>(graph: &G, config: &LayoutConfig) -> Result<Layout> {
    config.validate()?;
    Ok(compute(graph, config))
}

fn compute<G: TagGraph + ?Sized>(graph: &G, config: &LayoutConfig) -> Layout {
    let nodes = graph.nodes();
    let n = nodes.len();
    match n {
        0 => return Layout::default(),
        1 => {
            let mut positions = BTreeMap::new();
            positions.insert(nodes[0].id.clone(), Position::new(0.0, 0.0));
            return Layout { positions };
        }
        _ => {}
    }

    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();
    let mut adjacency = vec![vec![0.0f64; n]; n];
    for edge in graph.edges() {
        if let (Some(&a), Some(&b)) = (index.get(edge.u.as_str()), index.get(edge.v.as_str())) {
            adjacency[a][b] = edge.weight as f64;
            adjacency[b][a] = edge.weight as f64;
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();

    let k = config.ideal_edge_length;
    let mut t = 0.1 * span(&pos);
    let dt = t / (config.iterations as f64 + 1.0);
    let mut steps = 0;

    for _ in 0..config.iterations {
        steps += 1;
        let mut displacement = vec![[0.0f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let d = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / (d * d) - adjacency[i][j] * d / k;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }

        let mut moved = 0.0;
        for (p, disp) in pos.iter_mut().zip(&displacement) {
            let mut length = (disp[0] * disp[0] + disp[1] * disp[1]).sqrt();
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            let step = [disp[0] * t / length, disp[1] * t / length];
            p[0] += step[0];
            p[1] += step[1];
            moved += step[0] * step[0] + step[1] * step[1];
        }
        t -= dt;

        if moved.sqrt() / (n as f64) < config.threshold {
            break;
        }
    }

    rescale(&mut pos, config.scale);
    debug!(nodes = n, steps, seed = config.seed, "layout computed");

    let positions = nodes
        .iter()
        .zip(pos)
        .map(|(node, [x, y])| (node.id.clone(), Position::new(x, y)))
        .collect();
    Layout { positions }
}

/// Larger of the x and y extents.
fn span(pos: &[[f64; 2]]) -> f64 {
    let extent = |axis: usize| {
        let (lo, hi) = pos.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
            (lo.min(p[axis]), hi.max(p[axis]))
        });
        hi - lo
    };
    extent(0).max(extent(1))
}

fn rescale(pos: &mut [[f64; 2]], scale: f64) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
    }
    let lim = pos
        .iter()
        .map(|p| p[0].abs().max(p[1].abs()))
        .fold(0.0, f64::max);
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] *= scale / lim;
            p[1] *= scale / lim;
        }
    }
}
