use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::errors::{Error, Result};
use crate::random::RandomSource;
use crate::types::{
    graph::{Graph, Node, NodeId},
    typescript_types::{Label, Position, Weight, WeightedGraph, MAX_WEIGHT},
};

/// Added to the edge chance after every disconnected sample.
pub const CONNECT_CHANCE_STEP: f64 = 0.1;

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Topology {
    // right and down neighbours
    AxisAligned,
    // axis aligned plus both diagonals of every cell
    Diagonal,
    // axis aligned plus the down-right diagonal of every cell
    Triangulated,
}

impl Topology {
    fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Topology::AxisAligned => &[(0, 1), (1, 0)],
            Topology::Diagonal => &[(0, 1), (1, 0), (1, 1), (1, -1)],
            Topology::Triangulated => &[(0, 1), (1, 0), (1, 1)],
        }
    }
}

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum WeightMode {
    /// Pairwise distinct weights, so the minimum spanning tree is unique.
    Unique,
    /// Independent weights in `1..=max_weight`, ties allowed.
    Random,
}

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct GridOptions {
    pub width: usize,
    pub height: usize,
    pub edge_chance: f64,
    pub topology: Topology,
    pub weight_mode: Option<WeightMode>,
    pub max_weight: Weight,
    pub directed: bool,
    pub weighted: bool,
    pub connected: bool,
    pub max_attempts: usize,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            width: 3,
            height: 3,
            edge_chance: 0.7,
            topology: Topology::AxisAligned,
            weight_mode: Some(WeightMode::Random),
            max_weight: 10,
            directed: false,
            weighted: true,
            connected: true,
            max_attempts: 32,
        }
    }
}

impl GridOptions {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Err(Error::InvalidOptions(reason.to_string()));
        if self.width == 0 || self.height == 0 {
            return invalid("grid dimensions must be positive");
        }
        if !(self.edge_chance > 0.0 && self.edge_chance <= 1.0) {
            return invalid("edge chance must be in (0, 1]");
        }
        if !(1..=MAX_WEIGHT).contains(&self.max_weight) {
            return invalid("max weight must be positive and at most 2^32");
        }
        if self.max_attempts == 0 {
            return invalid("at least one attempt is needed");
        }
        match (self.weighted, self.weight_mode) {
            (true, None) => invalid("weighted graph needs a weight mode"),
            (false, Some(_)) => invalid("unweighted graph can not have a weight mode"),
            _ => Ok(()),
        }
    }
}

/// Spreadsheet style labels: A, B, ..., Z, AA, AB, ...
pub fn grid_label(index: usize) -> String {
    let mut i = index;
    let mut reversed = String::new();
    loop {
        reversed.push(char::from(b'A' + (i % 26) as u8));
        if i < 26 {
            break;
        }
        i = i / 26 - 1;
    }
    reversed.chars().rev().collect()
}

/// Lattice-shaped graph, see [`GridOptions`]. The result may be disconnected.
pub fn grid(random: &mut impl RandomSource, options: &GridOptions) -> Result<WeightedGraph> {
    options.validate()?;
    sample_grid(random, options, options.edge_chance)
}

/// Like [`grid`] but resamples until the graph is connected, raising the edge chance
/// after every failure. Fails once `options.max_attempts` samples were disconnected.
pub fn connected_grid(
    random: &mut impl RandomSource,
    options: &GridOptions,
) -> Result<WeightedGraph> {
    let _span = tracing::info_span!("connected_grid").entered();
    options.validate()?;
    let mut edge_chance = options.edge_chance;
    for attempt in 1..=options.max_attempts {
        let graph = sample_grid(random, options, edge_chance)?;
        if graph.is_connected() {
            tracing::debug!(attempt, edge_chance, "connected sample");
            return Ok(graph);
        }
        edge_chance = (edge_chance + CONNECT_CHANCE_STEP).min(1.0);
    }
    Err(Error::GenerationFailed {
        attempts: options.max_attempts,
    })
}

/// [`connected_grid`] or [`grid`] depending on `options.connected`.
pub fn generate(random: &mut impl RandomSource, options: &GridOptions) -> Result<WeightedGraph> {
    if options.connected {
        connected_grid(random, options)
    } else {
        grid(random, options)
    }
}

fn sample_grid(
    random: &mut impl RandomSource,
    options: &GridOptions,
    edge_chance: f64,
) -> Result<WeightedGraph> {
    let _span = tracing::debug_span!("sample_grid", edge_chance).entered();
    let mut graph = Graph::new(options.directed, options.weighted);
    for row in 0..options.height {
        for col in 0..options.width {
            let id = graph.add_node(Node {
                label: Some(Label::new(&grid_label(row * options.width + col))),
                position: Some(Position {
                    x: col as f64,
                    y: row as f64,
                }),
                ..Default::default()
            });
            debug_assert_eq!(id, row * options.width + col);
        }
    }

    let mut endpoints: Vec<(NodeId, NodeId)> = Vec::new();
    for (u, v) in lattice_candidates(options) {
        if !random.bool(edge_chance) {
            continue;
        }
        if options.directed && random.bool(0.5) {
            endpoints.push((v, u));
        } else {
            endpoints.push((u, v));
        }
    }

    let weights: Vec<Option<Weight>> = match options.weight_mode {
        Some(WeightMode::Unique) => distinct_weights(random, endpoints.len(), options.max_weight)
            .into_iter()
            .map(Some)
            .collect(),
        Some(WeightMode::Random) => endpoints
            .iter()
            .map(|_| Some(random.int(1, options.max_weight)))
            .collect(),
        None => vec![None; endpoints.len()],
    };

    for ((source, target), weight) in endpoints.into_iter().zip(weights) {
        graph.add_edge(source, target, weight)?;
    }
    Ok(graph)
}

// `count` distinct weights from `1..=max(max_weight, count)` in random order.
// Floyd's sampling, one draw per weight regardless of the range size.
fn distinct_weights(random: &mut impl RandomSource, count: usize, max_weight: Weight) -> Vec<Weight> {
    let max = max_weight.max(count as Weight);
    let mut chosen = BTreeSet::new();
    for j in (max - count as Weight + 1)..=max {
        let t = random.int(1, j);
        if !chosen.insert(t) {
            chosen.insert(j);
        }
    }
    let mut weights: Vec<Weight> = chosen.into_iter().collect();
    random.shuffle(&mut weights);
    weights
}

// Lattice-adjacent pairs in row-major order, offsets in topology order.
fn lattice_candidates(options: &GridOptions) -> Vec<(NodeId, NodeId)> {
    let (width, height) = (options.width as isize, options.height as isize);
    let mut candidates = Vec::new();
    for row in 0..height {
        for col in 0..width {
            for (d_row, d_col) in options.topology.offsets() {
                let (r, c) = (row + d_row, col + d_col);
                if r < height && c >= 0 && c < width {
                    candidates.push(((row * width + col) as NodeId, (r * width + c) as NodeId));
                }
            }
        }
    }
    candidates
}
