use std::collections::BTreeSet;

use bitvec::prelude::*;
use itertools::Itertools;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::errors::{Error, Result};
use crate::types::{
    graph::{Edge, EdgeId, NodeId},
    typescript_types::{Weight, WeightedGraph},
};

/// Set of edges, keyed by discovery position, used for memoization.
type EdgeSet = BitVec;

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct SpanningTree {
    // sorted, so two trees with the same edges compare equal
    pub edge_ids: Vec<EdgeId>,
    pub edges: Vec<Edge<Weight>>,
    pub weight: Weight,
}

impl SpanningTree {
    fn new(graph: &WeightedGraph, mut edge_ids: Vec<EdgeId>) -> Self {
        edge_ids.sort();
        let edges: Vec<_> = edge_ids
            .iter()
            .filter_map(|id| graph.edge(*id).cloned())
            .collect();
        let weight = edges.iter().map(Edge::weight).sum();
        Self {
            edge_ids,
            edges,
            weight,
        }
    }
}

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct KruskalResult {
    pub tree: SpanningTree,
    /// Edges in the order Kruskal's algorithm accepted them.
    pub order: Vec<EdgeId>,
    /// First edge that was rejected because it closes a cycle. `None` if the graph is a tree.
    pub cycle_witness: Option<EdgeId>,
}

// Spanning trees only make sense for non-empty, undirected, connected graphs.
fn check_spanning_input(graph: &WeightedGraph) -> Result<()> {
    if graph.node_count() == 0 {
        return Err(Error::EmptyGraph);
    }
    if graph.is_directed() {
        return Err(Error::DirectedGraph);
    }
    let unreachable = graph.unreachable_from(0);
    if !unreachable.is_empty() {
        return Err(Error::Disconnected(unreachable));
    }
    graph.check_weights(true)
}

/// Kruskal's algorithm. Edges of equal weight are considered in discovery order.
pub fn kruskal(graph: &WeightedGraph) -> Result<KruskalResult> {
    let _span = tracing::info_span!("kruskal").entered();
    check_spanning_input(graph)?;
    let tree_size = graph.node_count() - 1;
    let mut components = UnionFind::new(graph.node_count());
    let mut order = Vec::with_capacity(tree_size);
    let mut cycle_witness = None;

    // sorted_by_key is stable, ties keep discovery order
    for (id, edge) in graph.edge_references().sorted_by_key(|(_, e)| e.weight()) {
        if components.union(edge.source, edge.target) {
            tracing::debug!(%id, weight = edge.weight(), "accept");
            order.push(id);
        } else if cycle_witness.is_none() {
            tracing::debug!(%id, weight = edge.weight(), "closes cycle");
            cycle_witness = Some(id);
        }
        if order.len() == tree_size && cycle_witness.is_some() {
            break;
        }
    }

    Ok(KruskalResult {
        tree: SpanningTree::new(graph, order.clone()),
        order,
        cycle_witness,
    })
}

/// Every minimum spanning tree of `graph`, each exactly once.
///
/// Prim's algorithm grown from `start`, branching on every frontier edge of minimum
/// weight. Any minimum spanning tree has a minimum frontier edge for every subtree of
/// it that contains `start`, so following those branches reaches every such tree.
/// Partial trees are memoized by their edge set so no subtree is expanded twice.
/// Trees are returned sorted by their edge ids.
pub fn compute_all_mst(graph: &WeightedGraph, start: NodeId) -> Result<Vec<SpanningTree>> {
    let _span = tracing::info_span!("compute_all_mst", start).entered();
    check_spanning_input(graph)?;
    graph.check_node(start)?;

    let edges: Vec<(EdgeId, &Edge<Weight>)> = graph.edge_references().collect();
    let node_count = graph.node_count();

    let mut start_nodes = bitvec![0; node_count];
    start_nodes.set(start, true);
    let mut stack: Vec<(EdgeSet, BitVec)> = vec![(bitvec![0; edges.len()], start_nodes)];
    let mut visited: BTreeSet<EdgeSet> = BTreeSet::new();
    let mut complete: BTreeSet<EdgeSet> = BTreeSet::new();

    while let Some((chosen, nodes)) = stack.pop() {
        if nodes.count_ones() == node_count {
            complete.insert(chosen);
            continue;
        }
        let frontier: Vec<usize> = edges
            .iter()
            .enumerate()
            .filter(|(_, (_, e))| nodes[e.source] != nodes[e.target])
            .map(|(position, _)| position)
            .collect();
        let Some(min_weight) = frontier.iter().map(|p| edges[*p].1.weight()).min() else {
            // connected graphs always have a frontier edge until every node is reached
            return Err(Error::Disconnected(nodes.iter_zeros().collect()));
        };
        for position in frontier {
            let edge = edges[position].1;
            if edge.weight() != min_weight {
                continue;
            }
            let mut next_chosen = chosen.clone();
            next_chosen.set(position, true);
            if !visited.insert(next_chosen.clone()) {
                continue;
            }
            let mut next_nodes = nodes.clone();
            next_nodes.set(edge.source, true);
            next_nodes.set(edge.target, true);
            stack.push((next_chosen, next_nodes));
        }
    }

    let trees: Vec<SpanningTree> = complete
        .into_iter()
        .map(|chosen| {
            let ids = chosen.iter_ones().map(|p| edges[p].0).collect();
            SpanningTree::new(graph, ids)
        })
        .sorted_by(|a, b| a.edge_ids.cmp(&b.edge_ids))
        .collect();
    tracing::debug!(count = trees.len(), partial_trees = visited.len(), "enumerated");
    debug_assert!(trees.iter().map(|t| t.weight).all_equal());
    Ok(trees)
}

/// `true` iff `edges` has `num_nodes - 1` elements, is acyclic and connects all nodes.
/// Out of range endpoints make the answer `false`.
pub fn is_spanning_tree(num_nodes: usize, edges: &[(NodeId, NodeId)]) -> bool {
    if num_nodes == 0 || edges.len() != num_nodes - 1 {
        return false;
    }
    let mut components = UnionFind::new(num_nodes);
    for &(u, v) in edges {
        if u >= num_nodes || v >= num_nodes || !components.union(u, v) {
            return false;
        }
    }
    // n - 1 edges without a cycle always connect n nodes
    true
}

/// Check a submitted edge set: it must be a spanning tree of `graph` of minimum weight.
pub fn is_minimum_spanning_tree(graph: &WeightedGraph, edge_ids: &[EdgeId]) -> Result<bool> {
    let minimum = kruskal(graph)?.tree.weight;
    let Some(endpoints) = edge_ids
        .iter()
        .map(|id| graph.edge(*id).map(|e| (e.source, e.target)))
        .collect::<Option<Vec<_>>>()
    else {
        return Ok(false);
    };
    Ok(edge_ids.iter().all_unique()
        && is_spanning_tree(graph.node_count(), &endpoints)
        && graph.total_weight(edge_ids) == minimum)
}
