//! Ant colony optimization for ambulance dispatch.
//!
//! - [`ColonyConfig`]: Colony parameters with builder methods
//! - [`RouteBuilder`]: Deadline- and capacity-aware next-stop choice
//! - [`Ant`] / [`HospitalAnt`]: One full-fleet construction attempt
//! - [`AntColony`]: Parallel generations, pheromone update, time-boxed run

mod ant;
mod config;
mod coordinator;
mod heuristic;

pub use ant::{Ant, HospitalAnt};
pub use config::ColonyConfig;
pub use coordinator::AntColony;
pub use heuristic::{roulette_select, Hop, RouteBuilder};
