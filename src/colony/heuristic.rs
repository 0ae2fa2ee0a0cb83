//! Probabilistic next-stop selection for one ambulance.
//!
//! # Algorithm
//!
//! A full ambulance heads straight to its nearest hospital. Otherwise every
//! unvisited, still-feasible patient `n` gets the score
//!
//! ```text
//! pheromone(here, n)^alpha * (1 / timeLeft(n)^2 + 1 / distance(here, n))^beta
//! ```
//!
//! and one is drawn by roulette wheel. With no feasible patient (or a
//! degenerate score sum) the ambulance heads to its nearest hospital.
//!
//! A patient is infeasible when its deadline has been reached, or when reaching
//! it and then the hospital nearest the *current* node would overrun the
//! earliest deadline of the whole instance.

use bit_set::BitSet;

use crate::graph::PheromoneGraph;
use crate::models::{Ambulance, Instance, NodeId, Time, SERVICE_TIME};

/// A chosen move: destination and travel distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    /// Destination node.
    pub to: NodeId,
    /// Travel distance to the destination.
    pub distance: Time,
}

/// Picks from `candidates` with probability proportional to score, using a
/// single uniform `draw` in `[0, 1)`.
///
/// Candidates are walked in the given order and the first whose cumulative
/// normalized weight reaches `draw` wins. Returns `None` when the candidate
/// list is empty, the score sum is zero or not finite, or rounding leaves
/// the cumulative weight short of `draw`.
///
/// # Examples
///
/// ```
/// use u_dispatch::colony::roulette_select;
///
/// let candidates = [(7, 3.0), (9, 1.0)];
/// assert_eq!(roulette_select(&candidates, 0.5), Some(7));
/// assert_eq!(roulette_select(&candidates, 0.9), Some(9));
/// assert_eq!(roulette_select(&[(1, 0.0)], 0.1), None);
/// ```
pub fn roulette_select(candidates: &[(usize, f64)], draw: f64) -> Option<usize> {
    let total: f64 = candidates.iter().map(|&(_, s)| s).sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let mut cumulative = 0.0;
    for &(id, score) in candidates {
        let weight = score / total;
        if draw <= cumulative + weight {
            return Some(id);
        }
        cumulative += weight;
    }
    None
}

/// Next-stop chooser for ambulances of one instance.
///
/// Borrowed read-only by an ant for the length of one attempt; pheromone is
/// read from the shared graph at decision time.
pub struct RouteBuilder<'a> {
    instance: &'a Instance,
    graph: &'a PheromoneGraph,
    alpha: f64,
    beta: f64,
}

impl<'a> RouteBuilder<'a> {
    /// Creates a chooser with pheromone exponent `alpha` and heuristic
    /// exponent `beta`.
    pub fn new(instance: &'a Instance, graph: &'a PheromoneGraph, alpha: f64, beta: f64) -> Self {
        Self {
            instance,
            graph,
            alpha,
            beta,
        }
    }

    /// Scores every feasible, unvisited patient from the ambulance's
    /// current position, in patient index order.
    pub fn candidates(&self, ambulance: &Ambulance, visited: &BitSet) -> Vec<(usize, f64)> {
        let here = ambulance.location();
        let elapsed = ambulance.elapsed();
        let to_hospital = match self.graph.nearest_hospital(here) {
            Some((_, d)) => d,
            None => return Vec::new(),
        };
        let min_deadline = self.instance.min_deadline();

        let mut scored = Vec::new();
        for (n, patient) in self.instance.patients().iter().enumerate() {
            if visited.contains(n) {
                continue;
            }
            let Some(edge) = self.graph.edge(here, NodeId::Patient(n)) else {
                continue;
            };

            let time_left = patient.deadline() - elapsed;
            if time_left <= 0 {
                continue;
            }
            if elapsed + edge.distance() + to_hospital + 2 * SERVICE_TIME > min_deadline {
                continue;
            }

            let exploitation = edge.pheromone().powf(self.alpha);
            let urgency = 1.0 / (time_left as f64).powi(2);
            let proximity = 1.0 / edge.distance().max(1) as f64;
            let exploration = (urgency + proximity).powf(self.beta);
            scored.push((n, exploitation * exploration));
        }
        scored
    }

    /// Chooses the ambulance's next move using the uniform `draw`.
    ///
    /// Returns `None` when there is nothing left to do: no feasible patient
    /// remains and the ambulance already stands at its nearest hospital.
    pub fn next_stop(&self, ambulance: &Ambulance, visited: &BitSet, draw: f64) -> Option<Hop> {
        let here = ambulance.location();
        let (hospital, to_hospital) = self.graph.nearest_hospital(here)?;
        let fallback = Hop {
            to: NodeId::Hospital(hospital),
            distance: to_hospital,
        };
        let fallback = (fallback.to != here).then_some(fallback);

        if ambulance.is_full() {
            return fallback;
        }

        let candidates = self.candidates(ambulance, visited);
        match roulette_select(&candidates, draw) {
            Some(n) => {
                let to = NodeId::Patient(n);
                let distance = self.graph.edge(here, to).map(|e| e.distance())?;
                Some(Hop { to, distance })
            }
            None => fallback,
        }
    }
}
