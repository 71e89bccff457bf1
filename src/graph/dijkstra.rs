use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::errors::{Error, Result};
use crate::types::{
    graph::NodeId,
    typescript_types::{Weight, WeightedGraph},
};

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ShortestPaths {
    pub start: NodeId,
    /// `None` for nodes that can not be reached from `start`.
    pub distances: Vec<Option<Weight>>,
    /// `None` for `start` and for unreached nodes.
    pub predecessors: Vec<Option<NodeId>>,
    /// Nodes in the order they were taken from the frontier.
    pub order: Vec<NodeId>,
}

impl ShortestPaths {
    /// Nodes on a shortest path from `start` to `target`, both included.
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        self.distances.get(target).copied().flatten()?;
        let mut path = vec![target];
        let mut current = target;
        while let Some(Some(predecessor)) = self.predecessors.get(current) {
            path.push(*predecessor);
            current = *predecessor;
        }
        path.reverse();
        Some(path)
    }
}

/// State right after `node` was extracted and its edges were relaxed.
#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct DijkstraStep {
    pub node: NodeId,
    /// Visited nodes in extraction order, `node` last.
    pub visited: Vec<NodeId>,
    pub distances: Vec<Option<Weight>>,
    pub predecessors: Vec<Option<NodeId>>,
}

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct DijkstraTrace {
    pub result: ShortestPaths,
    pub steps: Vec<DijkstraStep>,
}

// Frontier entry. Ordered so that BinaryHeap (a max-heap) pops the smallest distance,
// and among equal distances the entry that was inserted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    distance: Weight,
    sequence: usize,
    node: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest paths from `start`.
pub fn dijkstra(graph: &WeightedGraph, start: NodeId) -> Result<ShortestPaths> {
    let _span = tracing::info_span!("dijkstra", start).entered();
    run(graph, start, |_| ())
}

/// Same run as [`dijkstra`], additionally recording one [`DijkstraStep`] per extraction.
pub fn generate_dijkstra_steps(graph: &WeightedGraph, start: NodeId) -> Result<DijkstraTrace> {
    let _span = tracing::info_span!("generate_dijkstra_steps", start).entered();
    let mut steps = Vec::new();
    let result = run(graph, start, |search| {
        steps.push(DijkstraStep {
            node: search.order[search.order.len() - 1],
            visited: search.order.clone(),
            distances: search.distances.clone(),
            predecessors: search.predecessors.clone(),
        })
    })?;
    Ok(DijkstraTrace { result, steps })
}

fn check_input(graph: &WeightedGraph, start: NodeId) -> Result<()> {
    if graph.node_count() == 0 {
        return Err(Error::EmptyGraph);
    }
    graph.check_node(start)?;
    graph.check_weights(false)
}

fn run(
    graph: &WeightedGraph,
    start: NodeId,
    mut on_extract: impl FnMut(&ShortestPaths),
) -> Result<ShortestPaths> {
    check_input(graph, start)?;
    let mut search = ShortestPaths {
        start,
        distances: vec![None; graph.node_count()],
        predecessors: vec![None; graph.node_count()],
        order: Vec::with_capacity(graph.node_count()),
    };
    let mut visited = vec![false; graph.node_count()];
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0;

    search.distances[start] = Some(0);
    frontier.push(FrontierEntry {
        distance: 0,
        sequence,
        node: start,
    });

    while let Some(FrontierEntry { distance, node, .. }) = frontier.pop() {
        // stale entry, node was extracted with a smaller distance before
        if visited[node] {
            continue;
        }
        visited[node] = true;
        search.order.push(node);
        tracing::debug!(node, distance, "extract");

        for neighbor in graph.neighbors(node) {
            let candidate = distance + neighbor.edge.weight();
            let improves = match search.distances[neighbor.node] {
                Some(current) => candidate < current,
                None => true,
            };
            if improves {
                search.distances[neighbor.node] = Some(candidate);
                search.predecessors[neighbor.node] = Some(node);
                sequence += 1;
                frontier.push(FrontierEntry {
                    distance: candidate,
                    sequence,
                    node: neighbor.node,
                });
            }
        }
        on_extract(&search);
    }

    Ok(search)
}
