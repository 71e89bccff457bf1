pub mod graph;
pub mod typescript_types;

pub use graph::{Edge, EdgeId, Graph, Node, NodeId};
pub use typescript_types::{Alphabet, Automaton, Label, Symbol, Weight, WeightedGraph};
