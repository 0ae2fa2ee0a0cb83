//! Ants: independent construction attempts over the shared graph.

use std::sync::Arc;

use bit_set::BitSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::graph::PheromoneGraph;
use crate::models::{Ambulance, Instance, NodeId, Route, Step, Time};

use super::heuristic::RouteBuilder;

/// One construction agent of the colony.
///
/// Each generation the colony calls [`reset`](Ant::reset),
/// [`compute_solution`](Ant::compute_solution) and
/// [`compute_fitness`](Ant::compute_fitness) in that order, on a worker
/// thread of its own. All per-attempt state belongs to the ant; only the
/// graph is shared.
pub trait Ant: Send {
    /// Clears all per-attempt state.
    fn reset(&mut self);

    /// Builds one route per ambulance, in fleet order.
    fn compute_solution(&mut self, alpha: f64, beta: f64, graph: &PheromoneGraph) -> Vec<Route>;

    /// Number of patients delivered on time by the last attempt.
    fn compute_fitness(&self) -> usize;
}

/// An ant that dispatches the whole ambulance fleet.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_dispatch::colony::{Ant, HospitalAnt};
/// use u_dispatch::graph::PheromoneGraph;
/// use u_dispatch::models::{Instance, Location, Patient};
///
/// let patients = vec![
///     Patient::new(Location::new(0, 0), 100),
///     Patient::new(Location::new(0, 5), 100),
/// ];
/// let instance = Arc::new(Instance::new(patients, vec![Location::new(0, 0)], vec![1]).unwrap());
/// let graph = PheromoneGraph::from_instance(&instance, 1.0);
///
/// let mut ant = HospitalAnt::new(instance, 42);
/// ant.reset();
/// let routes = ant.compute_solution(1.0, 3.0, &graph);
/// assert_eq!(routes.len(), 1);
/// assert_eq!(ant.compute_fitness(), 2);
/// ```
#[derive(Debug)]
pub struct HospitalAnt {
    instance: Arc<Instance>,
    ambulances: Vec<Ambulance>,
    visited: BitSet,
    delivered_at: Vec<Time>,
    rng: StdRng,
}

impl HospitalAnt {
    /// Creates an ant for `instance` with its own seeded RNG.
    pub fn new(instance: Arc<Instance>, seed: u64) -> Self {
        let n = instance.num_patients();
        Self {
            ambulances: instance.ambulances(),
            visited: BitSet::with_capacity(n),
            delivered_at: vec![0; n],
            rng: StdRng::seed_from_u64(seed),
            instance,
        }
    }

    /// Delivery time per patient in the last attempt (zero = not delivered).
    pub fn delivered_at(&self) -> &[Time] {
        &self.delivered_at
    }

    /// Returns `true` if the last attempt picked up `patient`.
    pub fn has_visited(&self, patient: usize) -> bool {
        self.visited.contains(patient)
    }

    /// Ambulance states as left by the last attempt.
    pub fn ambulances(&self) -> &[Ambulance] {
        &self.ambulances
    }
}

impl Ant for HospitalAnt {
    fn reset(&mut self) {
        self.visited.clear();
        self.delivered_at.iter_mut().for_each(|t| *t = 0);
        self.ambulances.iter_mut().for_each(Ambulance::reset);
    }

    fn compute_solution(&mut self, alpha: f64, beta: f64, graph: &PheromoneGraph) -> Vec<Route> {
        let instance = Arc::clone(&self.instance);
        let builder = RouteBuilder::new(&instance, graph, alpha, beta);
        let horizon = instance.time_horizon();
        let mut routes = Vec::with_capacity(self.ambulances.len());

        for ambulance in &mut self.ambulances {
            let mut route = Route::new(ambulance.id());

            while ambulance.elapsed() < horizon {
                let draw = self.rng.random::<f64>();
                let Some(hop) = builder.next_stop(ambulance, &self.visited, draw) else {
                    break;
                };

                let from = ambulance.location();
                let start_time = ambulance.elapsed();
                ambulance.move_to(hop.to, hop.distance);

                match hop.to {
                    NodeId::Patient(p) => {
                        self.visited.insert(p);
                        ambulance.pick_up(p);
                    }
                    NodeId::Hospital(_) => {
                        let now = ambulance.elapsed();
                        for p in ambulance.drop_off() {
                            self.delivered_at[p] = now;
                        }
                    }
                }

                route.push_step(Step {
                    from,
                    to: hop.to,
                    start_time,
                    end_time: ambulance.elapsed(),
                });
            }

            trace!(ambulance = ambulance.id(), steps = route.len(), "route built");
            routes.push(route);
        }
        routes
    }

    fn compute_fitness(&self) -> usize {
        self.instance
            .patients()
            .iter()
            .zip(&self.delivered_at)
            .filter(|(patient, &time)| patient.is_saved_at(time))
            .count()
    }
}
