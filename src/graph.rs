pub mod construction;
pub mod dijkstra;
pub mod spanning_tree;

pub use construction::{connected_grid, generate, grid, GridOptions, Topology, WeightMode};
pub use dijkstra::{dijkstra, generate_dijkstra_steps, DijkstraStep, DijkstraTrace, ShortestPaths};
pub use spanning_tree::{
    compute_all_mst, is_minimum_spanning_tree, is_spanning_tree, kruskal, KruskalResult, SpanningTree,
};
