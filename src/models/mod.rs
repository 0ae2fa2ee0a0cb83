//! Domain model types for ambulance dispatch.
//!
//! Patients with deadlines on a street/avenue grid, ambulances carrying at
//! most four patients at a time, graph node identifiers, and the routes and
//! plans produced by the colony.

mod ambulance;
mod instance;
mod location;
mod node;
mod plan;
mod route;

pub use ambulance::{Ambulance, SERVICE_TIME};
pub use instance::Instance;
pub use location::{Location, Patient, Time};
pub use node::NodeId;
pub use plan::Plan;
pub use route::{Route, Step};
