//! # u-dispatch
//!
//! Ambulance dispatch planning with ant colony optimization: route a fleet
//! stationed at hospitals so that as many patients as possible reach a
//! hospital before their deadline.
//!
//! ## Modules
//!
//! - [`models`]: Domain model types (Location, Patient, Ambulance, Route, Plan, Instance)
//! - [`graph`]: Pheromone-weighted travel graph with lock-free cells
//! - [`colony`]: Route construction, ants, and the parallel colony coordinator
//! - [`placement`]: K-means hospital placement
//! - [`error`]: Error type for instance setup and colony execution
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use u_dispatch::colony::{AntColony, ColonyConfig};
//! use u_dispatch::models::{Instance, Location, Patient};
//!
//! let instance = Instance::new(
//!     vec![
//!         Patient::new(Location::new(1, 1), 30),
//!         Patient::new(Location::new(2, 0), 30),
//!     ],
//!     vec![Location::new(0, 0)],
//!     vec![1],
//! )
//! .unwrap();
//!
//! let config = ColonyConfig::default()
//!     .with_num_ants(4)
//!     .with_time_limit(Duration::from_secs(5))
//!     .with_max_generations(10)
//!     .with_seed(7);
//! let plan = AntColony::for_instance(instance, config).unwrap().run().unwrap();
//! assert_eq!(plan.score(), 2);
//! ```

pub mod colony;
pub mod error;
pub mod graph;
pub mod models;
pub mod placement;

pub use error::{DispatchError, Result};
