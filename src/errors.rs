use std::fmt;

use itertools::Itertools;

use crate::types::{
    graph::{EdgeId, NodeId},
    typescript_types::{Symbol, MAX_WEIGHT},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Error {
    EmptyGraph,
    NodeOutOfRange { node: NodeId, node_count: usize },
    EdgeSourceMismatch { edge: EdgeId, source: NodeId },
    EdgeListMismatch { edge_lists: usize, node_count: usize },
    DuplicateLabel(String),
    DirectedGraph,
    UndirectedAutomaton,
    Disconnected(Vec<NodeId>),
    NegativeWeight(EdgeId),
    WeightOutOfRange(EdgeId),
    EmptyAlphabet,
    DuplicateSymbol(Symbol),
    SymbolNotInAlphabet(EdgeId, Symbol),
    MissingSymbol(EdgeId),
    NoStartState,
    MultipleStartStates(Vec<NodeId>),
    NonDeterministic(NodeId, Symbol),
    MissingTransition(NodeId, Symbol),
    InvalidOptions(String),
    GenerationFailed { attempts: usize },
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyGraph => write!(f, "graph has no nodes"),
            Error::NodeOutOfRange { node, node_count } => {
                write!(f, "node {node} out of range, graph has {node_count} nodes")
            }
            Error::EdgeSourceMismatch { edge, source } => {
                write!(f, "edge {edge} is stored under node {} but has source {source}", edge.source)
            }
            Error::EdgeListMismatch { edge_lists, node_count } => {
                write!(f, "{edge_lists} edge lists for {node_count} nodes")
            }
            Error::DuplicateLabel(label) => write!(f, "label {label} used by more than one node"),
            Error::DirectedGraph => write!(f, "spanning trees are only defined for undirected graphs"),
            Error::UndirectedAutomaton => write!(f, "automaton transitions must be directed"),
            Error::Disconnected(unreached) => write!(
                f,
                "graph is not connected, nodes {} can not be reached",
                unreached.iter().join(", ")
            ),
            Error::NegativeWeight(edge) => write!(f, "edge {edge} has a negative weight"),
            Error::WeightOutOfRange(edge) => {
                write!(f, "edge {edge} has a weight beyond {MAX_WEIGHT} in magnitude")
            }
            Error::EmptyAlphabet => write!(f, "alphabet is empty"),
            Error::DuplicateSymbol(symbol) => write!(f, "symbol {symbol} appears more than once in alphabet"),
            Error::SymbolNotInAlphabet(edge, symbol) => {
                write!(f, "transition {edge} uses symbol {symbol} which is not in the alphabet")
            }
            Error::MissingSymbol(edge) => write!(f, "transition {edge} has no symbol"),
            Error::NoStartState => write!(f, "automaton has no start state"),
            Error::MultipleStartStates(nodes) => write!(
                f,
                "deterministic automaton must have exactly one start state, found {}",
                nodes.iter().join(", ")
            ),
            Error::NonDeterministic(node, symbol) => {
                write!(f, "state {node} has more than one transition on {symbol}")
            }
            Error::MissingTransition(node, symbol) => {
                write!(f, "state {node} has no transition on {symbol}")
            }
            Error::InvalidOptions(reason) => write!(f, "invalid options: {reason}"),
            Error::GenerationFailed { attempts } => {
                write!(f, "no graph satisfying the constraints after {attempts} attempts")
            }
            Error::Parse(reason) => write!(f, "parsing graph: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
