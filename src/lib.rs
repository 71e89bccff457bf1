use wasm_bindgen::prelude::*;

pub mod automaton;
pub mod errors;
pub mod graph;
pub mod random;
pub mod types;

#[cfg(test)]
mod test_utils;

use automaton::NfaOptions;
use graph::{DijkstraTrace, GridOptions, KruskalResult, SpanningTree};
use random::SeededRandom;
use types::{
    graph::{EdgeId, NodeId},
    typescript_types::{Alphabet, Automaton, CheckResult, DataResult, EdgePair, WeightedGraph},
};

// Parse a json argument or return an ERROR result naming it.
macro_rules! parse_arg {
    ($json:expr, $t:ty, $what:literal) => {
        match serde_json::from_str::<$t>(&$json) {
            Ok(value) => value,
            Err(e) => {
                return CheckResult::ERROR {
                    errors: vec![format!("parsing {}: {}", $what, e)],
                }
            }
        }
    };
}

fn check_result(result: errors::Result<bool>, failure: impl FnOnce() -> String) -> CheckResult {
    match result {
        Ok(true) => CheckResult::OK,
        Ok(false) => CheckResult::ERROR {
            errors: vec![failure()],
        },
        Err(e) => CheckResult::ERROR {
            errors: vec![e.to_string()],
        },
    }
}

#[wasm_bindgen]
pub fn random_grid(seed: u32, options: GridOptions) -> DataResult<WeightedGraph> {
    let mut random = SeededRandom::new(seed.into());
    graph::generate(&mut random, &options).into()
}

#[wasm_bindgen]
pub fn random_automaton(seed: u32, options: NfaOptions) -> DataResult<Automaton> {
    let mut random = SeededRandom::new(seed.into());
    automaton::random_nfa(&mut random, &options).into()
}

#[wasm_bindgen]
pub fn kruskal_mst(graph: WeightedGraph) -> DataResult<KruskalResult> {
    graph
        .validate()
        .and_then(|_| graph::kruskal(&graph))
        .into()
}

#[wasm_bindgen]
pub fn all_minimum_spanning_trees(graph: WeightedGraph, start: NodeId) -> DataResult<Vec<SpanningTree>> {
    graph
        .validate()
        .and_then(|_| graph::compute_all_mst(&graph, start))
        .into()
}

/// `edges` is a json array of `[source, target]` pairs.
#[wasm_bindgen]
pub fn check_spanning_tree(num_nodes: usize, edges: String) -> CheckResult {
    let pairs = parse_arg!(edges, Vec<EdgePair>, "edges");
    let pairs: Vec<(NodeId, NodeId)> = pairs.into_iter().map(|EdgePair(u, v)| (u, v)).collect();
    check_result(Ok(graph::is_spanning_tree(num_nodes, &pairs)), || {
        format!("edges do not form a spanning tree on {num_nodes} nodes")
    })
}

/// `edge_ids` is a json array of `{ source, index }` edge ids of `graph`.
#[wasm_bindgen]
pub fn check_minimum_spanning_tree(graph: WeightedGraph, edge_ids: String) -> CheckResult {
    let edge_ids = parse_arg!(edge_ids, Vec<EdgeId>, "edge ids");
    let result = graph
        .validate()
        .and_then(|_| graph::is_minimum_spanning_tree(&graph, &edge_ids));
    check_result(result, || String::from("edges are not a minimum spanning tree"))
}

#[wasm_bindgen]
pub fn dijkstra_steps(graph: WeightedGraph, start: NodeId) -> DataResult<DijkstraTrace> {
    graph
        .validate()
        .and_then(|_| graph::generate_dijkstra_steps(&graph, start))
        .into()
}

#[wasm_bindgen]
pub fn nfa_to_dfa(nfa: Automaton, alphabet: Alphabet) -> DataResult<Automaton> {
    nfa.validate()
        .and_then(|_| automaton::convert_nfa_to_dfa(&nfa, &alphabet))
        .into()
}

#[wasm_bindgen]
pub fn minimize(dfa: Automaton, alphabet: Alphabet) -> DataResult<Automaton> {
    dfa.validate()
        .and_then(|_| automaton::minimize_dfa(&dfa, &alphabet))
        .into()
}
