//! Pheromone graph.
//!
//! Directed edges between patients and hospitals, each holding a static
//! Manhattan distance and a pheromone level that ants reinforce and decay.

mod edge;
mod pheromone_graph;

pub use edge::{Edge, Pheromone};
pub use pheromone_graph::PheromoneGraph;
