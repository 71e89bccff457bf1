use crate::types::{
    graph::{Graph, Node},
    typescript_types::{Alphabet, Automaton, WeightedGraph},
};

use tracing_subscriber::{fmt, fmt::format::FmtSpan, EnvFilter};
pub fn setup_logger() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .try_init()
        .ok();
}

pub fn binary() -> Alphabet {
    Alphabet::from_iter(["0", "1"])
}

// Same graph with its nodes replaced, edges kept.
pub fn with_nodes<V: Clone>(graph: Graph<V>, nodes: Vec<Node>) -> Graph<V> {
    let mut copy = Graph::new(graph.is_directed(), graph.is_weighted());
    for node in nodes {
        copy.add_node(node);
    }
    for (_, edge) in graph.edge_references() {
        copy.add_edge(edge.source, edge.target, edge.value.clone()).unwrap();
    }
    copy
}

// A-B 1, B-C 1, C-D 1, A-C 3, A-D 5
pub fn get_square_graph() -> WeightedGraph {
    serde_json::from_str::<WeightedGraph>(
        r#"{
            "nodes": [
                { "label": "A", "position": { "x": 0.0, "y": 0.0 } },
                { "label": "B", "position": { "x": 1.0, "y": 0.0 } },
                { "label": "C", "position": { "x": 1.0, "y": 1.0 } },
                { "label": "D", "position": { "x": 0.0, "y": 1.0 } }
            ],
            "edges": [
                [
                    { "source": 0, "target": 1, "value": 1 },
                    { "source": 0, "target": 3, "value": 5 },
                    { "source": 0, "target": 2, "value": 3 }
                ],
                [{ "source": 1, "target": 2, "value": 1 }],
                [{ "source": 2, "target": 3, "value": 1 }],
                []
            ],
            "directed": false,
            "weighted": true
        }"#,
    )
    .unwrap()
}

pub fn get_k4_graph() -> WeightedGraph {
    serde_json::from_str::<WeightedGraph>(
        r#"{
            "nodes": [{ "label": "A" }, { "label": "B" }, { "label": "C" }, { "label": "D" }],
            "edges": [
                [
                    { "source": 0, "target": 1, "value": 1 },
                    { "source": 0, "target": 2, "value": 1 },
                    { "source": 0, "target": 3, "value": 1 }
                ],
                [
                    { "source": 1, "target": 2, "value": 1 },
                    { "source": 1, "target": 3, "value": 1 }
                ],
                [{ "source": 2, "target": 3, "value": 1 }],
                []
            ],
            "directed": false,
            "weighted": true
        }"#,
    )
    .unwrap()
}

pub fn get_disconnected_graph() -> WeightedGraph {
    serde_json::from_str::<WeightedGraph>(
        r#"{
            "nodes": [{ "label": "A" }, { "label": "B" }, { "label": "C" }, { "label": "D" }],
            "edges": [
                [{ "source": 0, "target": 1, "value": 2 }],
                [],
                [{ "source": 2, "target": 3, "value": 4 }],
                []
            ],
            "directed": false,
            "weighted": true
        }"#,
    )
    .unwrap()
}

// q0 -0-> {q0, q1}, q0 -1-> q0, q1 accepting
pub fn get_two_state_nfa() -> Automaton {
    serde_json::from_str::<Automaton>(
        r#"{
            "nodes": [
                { "label": "q0", "isStart": true },
                { "label": "q1", "isEnd": true }
            ],
            "edges": [
                [
                    { "source": 0, "target": 0, "value": "0" },
                    { "source": 0, "target": 1, "value": "0" },
                    { "source": 0, "target": 0, "value": "1" }
                ],
                []
            ],
            "directed": true,
            "weighted": false
        }"#,
    )
    .unwrap()
}

// words over {0, 1} ending in 0, same shape as the two state nfa with the loops listed first
pub fn get_ends_in_zero_nfa() -> Automaton {
    serde_json::from_str::<Automaton>(
        r#"{
            "nodes": [
                { "label": "q0", "isStart": true },
                { "label": "q1", "isEnd": true }
            ],
            "edges": [
                [
                    { "source": 0, "target": 0, "value": "0" },
                    { "source": 0, "target": 0, "value": "1" },
                    { "source": 0, "target": 1, "value": "0" }
                ],
                []
            ],
            "directed": true,
            "weighted": false
        }"#,
    )
    .unwrap()
}

pub fn get_single_a_nfa() -> Automaton {
    serde_json::from_str::<Automaton>(
        r#"{
            "nodes": [
                { "label": "q0", "isStart": true },
                { "label": "q1", "isEnd": true }
            ],
            "edges": [[{ "source": 0, "target": 1, "value": "a" }], []],
            "directed": true,
            "weighted": false
        }"#,
    )
    .unwrap()
}

// s1 and s2 are both accepting and behave the same
pub fn get_redundant_dfa() -> Automaton {
    serde_json::from_str::<Automaton>(
        r#"{
            "nodes": [
                { "label": "s0", "isStart": true },
                { "label": "s1", "isEnd": true },
                { "label": "s2", "isEnd": true }
            ],
            "edges": [
                [
                    { "source": 0, "target": 1, "value": "a" },
                    { "source": 0, "target": 2, "value": "b" }
                ],
                [
                    { "source": 1, "target": 1, "value": "a" },
                    { "source": 1, "target": 2, "value": "b" }
                ],
                [
                    { "source": 2, "target": 1, "value": "a" },
                    { "source": 2, "target": 2, "value": "b" }
                ]
            ],
            "directed": true,
            "weighted": false
        }"#,
    )
    .unwrap()
}

pub fn get_length_three_dfa() -> Automaton {
    serde_json::from_str::<Automaton>(
        r#"{
            "nodes": [
                { "label": "q0", "isStart": true },
                { "label": "q1" },
                { "label": "q2" },
                { "label": "q3", "isEnd": true }
            ],
            "edges": [
                [{ "source": 0, "target": 1, "value": "a" }],
                [{ "source": 1, "target": 2, "value": "a" }],
                [{ "source": 2, "target": 3, "value": "a" }],
                [{ "source": 3, "target": 3, "value": "a" }]
            ],
            "directed": true,
            "weighted": false
        }"#,
    )
    .unwrap()
}
