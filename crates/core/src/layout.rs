//! Force-directed node placement
//!
//! The simulation itself is `fdg-sim`'s Fruchterman-Reingold force run in two
//! dimensions. Its raw coordinates are then rescaled so every node lies in
//! `[-1, 1]` on both axes, keeping the aspect ratio.

use fdg_sim::{force, Dimensions, ForceGraph, ForceGraphHelper, Simulation, SimulationParameters};
use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::graph::ImportGraph;

/// Time step handed to each simulation update
const STEP: f32 = 0.035;

/// Side length of the square new nodes are scattered in before simulating
const START_SIZE: f32 = 200.0;

/// Node positions keyed by node id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: HashMap<String, (f64, f64)>,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lay out every node of `graph`
pub fn compute_layout(graph: &ImportGraph, config: &LayoutConfig) -> Layout {
    match graph.node_count() {
        0 => return Layout::default(),
        1 => {
            let positions = graph.nodes().map(|n| (n.id.clone(), (0.0, 0.0))).collect();
            return Layout { positions };
        }
        _ => {}
    }

    let mut force_graph: ForceGraph<(), ()> = ForceGraph::default();
    let mut indices = HashMap::new();
    for node in graph.nodes() {
        let idx = force_graph.add_force_node(node.id.clone(), ());
        indices.insert(node.id.as_str(), idx);
    }
    for (from, to) in graph.edges() {
        // Self-loops exert no force
        if from == to {
            continue;
        }
        if let (Some(&a), Some(&b)) = (indices.get(from), indices.get(to)) {
            force_graph.add_edge(a, b, ());
        }
    }

    let parameters = SimulationParameters::new(
        START_SIZE,
        Dimensions::Two,
        force::fruchterman_reingold(config.scale, config.cooloff),
    );
    let mut simulation = Simulation::from_graph(force_graph, parameters);
    for _ in 0..config.iterations {
        simulation.update(STEP);
    }

    let raw: Vec<(String, (f64, f64))> = simulation
        .get_graph()
        .node_weights()
        .map(|node| {
            (
                node.name.clone(),
                (f64::from(node.location.x), f64::from(node.location.y)),
            )
        })
        .collect();

    Layout {
        positions: rescale(raw),
    }
}

/// Center on the bounding box and scale the larger extent to `[-1, 1]`
///
/// Non-finite coordinates collapse to the origin.
fn rescale(raw: Vec<(String, (f64, f64))>) -> HashMap<String, (f64, f64)> {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    let raw: Vec<(String, (f64, f64))> = raw
        .into_iter()
        .map(|(id, (x, y))| (id, (finite(x), finite(y))))
        .collect();

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for (_, (x, y)) in &raw {
        min_x = min_x.min(*x);
        max_x = max_x.max(*x);
        min_y = min_y.min(*y);
        max_y = max_y.max(*y);
    }

    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;
    let half_extent = ((max_x - min_x).max(max_y - min_y)) / 2.0;

    raw.into_iter()
        .map(|(id, (x, y))| {
            let position = if half_extent > f64::EPSILON {
                (
                    ((x - center_x) / half_extent).clamp(-1.0, 1.0),
                    ((y - center_y) / half_extent).clamp(-1.0, 1.0),
                )
            } else {
                (0.0, 0.0)
            };
            (id, position)
        })
        .collect()
}
