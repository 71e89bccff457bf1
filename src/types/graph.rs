use std::{collections::BTreeSet, fmt};

use petgraph::unionfind::UnionFind;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tsify::Tsify;

use crate::errors::{Error, Result};
use crate::types::typescript_types::{Label, Position, Weight, DEFAULT_WEIGHT, MAX_WEIGHT};

/// Index into the node sequence of a graph.
pub type NodeId = usize;

/// Position of an edge in the adjacency list: `edges[source][index]`.
#[derive(Tsify, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct EdgeId {
    pub source: NodeId,
    pub index: usize,
}

impl EdgeId {
    pub fn new(source: NodeId, index: usize) -> Self {
        Self { source, index }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.source, self.index)
    }
}

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub is_start: bool,
    #[serde(default)]
    pub is_end: bool,
    // highlight group, only read by the UI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,
}

impl Node {
    pub fn labelled(label: &str) -> Self {
        Self {
            label: Some(Label::new(label)),
            ..Default::default()
        }
    }

    pub fn state(label: &str, is_start: bool, is_end: bool) -> Self {
        Self {
            label: Some(Label::new(label)),
            is_start,
            is_end,
            ..Default::default()
        }
    }
}

#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Edge<V> {
    pub source: NodeId,
    pub target: NodeId,
    // missing means None; `default` here would demand `V: Default`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<V>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,
}

impl<V> Edge<V> {
    pub fn new(source: NodeId, target: NodeId, value: Option<V>) -> Self {
        Self {
            source,
            target,
            value,
            group: None,
        }
    }
}

impl Edge<Weight> {
    pub fn weight(&self) -> Weight {
        self.value.unwrap_or(DEFAULT_WEIGHT)
    }
}

/// A neighbor of some node together with the edge leading to it.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a, V> {
    pub node: NodeId,
    pub id: EdgeId,
    pub edge: &'a Edge<V>,
}

// Nodes live in an arena, edges are kept in an adjacency list keyed by source index.
// An undirected edge is stored once, under its source.
#[derive(Tsify, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Graph<V> {
    nodes: Vec<Node>,
    edges: Vec<Vec<Edge<V>>>,
    directed: bool,
    weighted: bool,
}

impl<V> Graph<V> {
    pub fn new(directed: bool, weighted: bool) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            directed,
            weighted,
        }
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.edges.push(Vec::new());
        self.nodes.len() - 1
    }

    pub fn add_edge(&mut self, source: NodeId, target: NodeId, value: Option<V>) -> Result<EdgeId> {
        self.check_node(source)?;
        self.check_node(target)?;
        self.edges[source].push(Edge::new(source, target, value));
        Ok(EdgeId::new(source, self.edges[source].len() - 1))
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node)
    }

    pub fn node_ids(&self) -> std::ops::Range<NodeId> {
        0..self.nodes.len()
    }

    /// Edges stored under `node`, in insertion order.
    pub fn edges_from(&self, node: NodeId) -> &[Edge<V>] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge<V>> {
        self.edges.get(id.source).and_then(|edges| edges.get(id.index))
    }

    /// All edges in discovery order: by source, then by insertion.
    pub fn edge_references(&self) -> impl Iterator<Item = (EdgeId, &Edge<V>)> + '_ {
        self.edges.iter().enumerate().flat_map(|(source, edges)| {
            edges
                .iter()
                .enumerate()
                .map(move |(index, edge)| (EdgeId::new(source, index), edge))
        })
    }

    /// Neighbors of `node`: edges stored under `node` first, then for undirected
    /// graphs the edges stored under other sources that end in `node`, by ascending source.
    pub fn neighbors(&self, node: NodeId) -> Vec<Neighbor<'_, V>> {
        let mut neighbors: Vec<_> = self
            .edges_from(node)
            .iter()
            .enumerate()
            .map(|(index, edge)| Neighbor {
                node: edge.target,
                id: EdgeId::new(node, index),
                edge,
            })
            .collect();
        if !self.directed {
            neighbors.extend(
                self.edge_references()
                    .filter(|(id, edge)| id.source != node && edge.target == node)
                    .map(|(id, edge)| Neighbor {
                        node: edge.source,
                        id,
                        edge,
                    }),
            );
        }
        neighbors
    }

    pub fn check_node(&self, node: NodeId) -> Result<()> {
        if node < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::NodeOutOfRange {
                node,
                node_count: self.nodes.len(),
            })
        }
    }

    /// Check the structural invariants. Graphs built through [`Graph::add_edge`] always
    /// satisfy them, deserialized graphs might not.
    pub fn validate(&self) -> Result<()> {
        if self.edges.len() != self.nodes.len() {
            return Err(Error::EdgeListMismatch {
                edge_lists: self.edges.len(),
                node_count: self.nodes.len(),
            });
        }
        for (id, edge) in self.edge_references() {
            if edge.source != id.source {
                return Err(Error::EdgeSourceMismatch {
                    edge: id,
                    source: edge.source,
                });
            }
            self.check_node(edge.target)?;
        }
        let mut labels = BTreeSet::new();
        for label in self.nodes.iter().filter_map(|n| n.label.as_ref()) {
            if !labels.insert(label) {
                return Err(Error::DuplicateLabel(label.to_string()));
            }
        }
        Ok(())
    }

    pub fn node_name(&self, node: NodeId) -> String {
        match self.node(node).and_then(|n| n.label.as_ref()) {
            Some(label) => label.to_string(),
            None => node.to_string(),
        }
    }

    pub fn find_node(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.label.as_deref() == Some(label))
    }

    /// Nodes not connected to `start` when edge directions are ignored.
    pub fn unreachable_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut components = UnionFind::new(self.nodes.len());
        for (_, edge) in self.edge_references() {
            components.union(edge.source, edge.target);
        }
        self.node_ids()
            .filter(|n| !components.equiv(start, *n))
            .collect()
    }

    pub fn is_connected(&self) -> bool {
        self.nodes.is_empty() || self.unreachable_from(0).is_empty()
    }

    /// Copy of this graph with `edges` and their endpoints put in highlight `group`.
    pub fn highlighted(&self, edges: &[EdgeId], group: u32) -> Self
    where
        V: Clone,
    {
        let mut copy = self.clone();
        for id in edges {
            let endpoints = match copy.edges.get_mut(id.source).and_then(|e| e.get_mut(id.index)) {
                Some(edge) => {
                    edge.group = Some(group);
                    (edge.source, edge.target)
                }
                None => continue,
            };
            copy.nodes[endpoints.0].group = Some(group);
            copy.nodes[endpoints.1].group = Some(group);
        }
        copy
    }

    pub fn from_json(json: &str) -> Result<Self>
    where
        V: DeserializeOwned,
    {
        let graph = serde_json::from_str::<Self>(json).map_err(|e| Error::Parse(e.to_string()))?;
        graph.validate()?;
        Ok(graph)
    }
}

impl Graph<Weight> {
    pub fn total_weight<'a>(&self, edges: impl IntoIterator<Item = &'a EdgeId>) -> Weight {
        edges
            .into_iter()
            .filter_map(|id| self.edge(*id))
            .map(Edge::weight)
            .fold(0, Weight::saturating_add)
    }

    /// Every weight must lie in `-MAX_WEIGHT..=MAX_WEIGHT`, and be non-negative
    /// unless `allow_negative` is set.
    pub fn check_weights(&self, allow_negative: bool) -> Result<()> {
        for (id, edge) in self.edge_references() {
            let weight = edge.weight();
            if weight < 0 && !allow_negative {
                return Err(Error::NegativeWeight(id));
            }
            if !(-MAX_WEIGHT..=MAX_WEIGHT).contains(&weight) {
                return Err(Error::WeightOutOfRange(id));
            }
        }
        Ok(())
    }

    /// Same graph as a petgraph digraph with node indices preserved.
    /// Undirected edges are added in both directions.
    pub fn to_petgraph(&self) -> petgraph::Graph<NodeId, Weight> {
        let mut graph = petgraph::Graph::new();
        let indices: Vec<_> = self.node_ids().map(|n| graph.add_node(n)).collect();
        for (_, edge) in self.edge_references() {
            graph.add_edge(indices[edge.source], indices[edge.target], edge.weight());
            if !self.directed {
                graph.add_edge(indices[edge.target], indices[edge.source], edge.weight());
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use pretty_assertions::assert_eq;

    #[test]
    fn undirected_neighbors_from_both_ends() {
        test_utils::setup_logger();
        let graph = test_utils::get_square_graph();
        let a = graph.find_node("A").unwrap();
        let c = graph.find_node("C").unwrap();
        let names = |node| {
            graph
                .neighbors(node)
                .into_iter()
                .map(|n| graph.node_name(n.node))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(a), vec!["B", "D", "C"]);
        assert_eq!(names(c), vec!["D", "A", "B"]);
    }

    #[test]
    fn directed_neighbors_only_outgoing() {
        let mut graph = Graph::<Weight>::new(true, true);
        let a = graph.add_node(Node::labelled("A"));
        let b = graph.add_node(Node::labelled("B"));
        graph.add_edge(a, b, Some(2)).unwrap();
        assert_eq!(graph.neighbors(a).len(), 1);
        assert!(graph.neighbors(b).is_empty());
    }

    #[test]
    fn add_edge_out_of_range() {
        let mut graph = Graph::<Weight>::new(false, false);
        graph.add_node(Node::default());
        assert_eq!(
            graph.add_edge(0, 3, None),
            Err(Error::NodeOutOfRange {
                node: 3,
                node_count: 1
            })
        );
    }

    #[test]
    fn validate_rejects_misplaced_edge() {
        let json = r#"{
            "nodes": [{ "label": "A" }, { "label": "B" }],
            "edges": [[], [{ "source": 0, "target": 1 }]],
            "directed": false,
            "weighted": false
        }"#;
        assert_eq!(
            Graph::<Weight>::from_json(json),
            Err(Error::EdgeSourceMismatch {
                edge: EdgeId::new(1, 0),
                source: 0
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_label() {
        let json = r#"{
            "nodes": [{ "label": "A" }, { "label": "A" }],
            "edges": [[], []],
            "directed": false,
            "weighted": false
        }"#;
        assert_eq!(
            Graph::<Weight>::from_json(json),
            Err(Error::DuplicateLabel(String::from("A")))
        );
    }

    #[test]
    fn unweighted_edge_counts_as_one() {
        let json = r#"{
            "nodes": [{ "label": "A" }, { "label": "B" }],
            "edges": [[{ "source": 0, "target": 1 }], []],
            "directed": false,
            "weighted": false
        }"#;
        let graph = Graph::<Weight>::from_json(json).unwrap();
        assert_eq!(graph.total_weight(&[EdgeId::new(0, 0)]), 1);
    }

    #[test]
    fn weights_outside_bound_are_rejected() {
        let mut graph = Graph::<Weight>::new(false, true);
        let a = graph.add_node(Node::labelled("A"));
        let b = graph.add_node(Node::labelled("B"));
        graph.add_edge(a, b, Some(-MAX_WEIGHT)).unwrap();
        assert_eq!(graph.check_weights(true), Ok(()));
        assert_eq!(graph.check_weights(false), Err(Error::NegativeWeight(EdgeId::new(0, 0))));
        let huge = graph.add_edge(b, a, Some(Weight::MIN)).unwrap();
        assert_eq!(graph.check_weights(true), Err(Error::WeightOutOfRange(huge)));
    }

    #[test]
    fn total_weight_saturates() {
        let mut graph = Graph::<Weight>::new(false, true);
        let a = graph.add_node(Node::labelled("A"));
        let b = graph.add_node(Node::labelled("B"));
        let first = graph.add_edge(a, b, Some(Weight::MAX)).unwrap();
        let second = graph.add_edge(a, b, Some(Weight::MAX)).unwrap();
        assert_eq!(graph.total_weight(&[first, second]), Weight::MAX);
    }

    #[test]
    fn highlighted_leaves_original_untouched() {
        let graph = test_utils::get_square_graph();
        let copy = graph.highlighted(&[EdgeId::new(0, 0)], 1);
        assert_eq!(copy.edge(EdgeId::new(0, 0)).unwrap().group, Some(1));
        assert_eq!(copy.nodes()[0].group, Some(1));
        assert_eq!(copy.nodes()[1].group, Some(1));
        assert_eq!(copy.nodes()[2].group, None);
        assert!(graph.edge_references().all(|(_, e)| e.group.is_none()));
    }

    #[test]
    fn connectivity_ignores_direction() {
        let mut graph = Graph::<Weight>::new(true, false);
        let a = graph.add_node(Node::labelled("A"));
        let b = graph.add_node(Node::labelled("B"));
        let c = graph.add_node(Node::labelled("C"));
        graph.add_edge(b, a, None).unwrap();
        assert_eq!(graph.unreachable_from(a), vec![c]);
        graph.add_edge(c, b, None).unwrap();
        assert!(graph.is_connected());
    }
}
