//! Directed edges with atomically updated pheromone.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::Time;

/// A pheromone level shared between concurrently running ants.
///
/// The value lives in an `AtomicU64` holding the `f64` bit pattern; every
/// update is a compare-and-swap loop, so two ants decaying the same edge
/// never lose each other's writes. Scaling clamps at `f64::MIN_POSITIVE`,
/// keeping the level strictly positive.
///
/// # Examples
///
/// ```
/// use u_dispatch::graph::Pheromone;
///
/// let p = Pheromone::new(1.0);
/// p.scale(0.5);
/// assert_eq!(p.get(), 0.5);
/// ```
#[derive(Debug)]
pub struct Pheromone(AtomicU64);

impl Pheromone {
    /// Creates a pheromone cell with the given level.
    pub fn new(level: f64) -> Self {
        Self(AtomicU64::new(level.to_bits()))
    }

    /// Current level.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Overwrites the level.
    pub fn set(&self, level: f64) {
        self.0.store(level.to_bits(), Ordering::Relaxed);
    }

    /// Multiplies the level by `factor`, returning the new level.
    pub fn scale(&self, factor: f64) -> f64 {
        let update = |bits: u64| {
            let scaled = (f64::from_bits(bits) * factor).max(f64::MIN_POSITIVE);
            Some(scaled.to_bits())
        };
        let previous = match self.0.fetch_update(Ordering::AcqRel, Ordering::Acquire, update) {
            Ok(bits) | Err(bits) => bits,
        };
        (f64::from_bits(previous) * factor).max(f64::MIN_POSITIVE)
    }
}

impl Clone for Pheromone {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

/// A directed edge: static travel distance plus a mutable pheromone level.
#[derive(Debug, Clone)]
pub struct Edge {
    distance: Time,
    pheromone: Pheromone,
}

impl Edge {
    /// Creates an edge.
    pub fn new(distance: Time, pheromone: f64) -> Self {
        Self {
            distance,
            pheromone: Pheromone::new(pheromone),
        }
    }

    /// Travel distance along this edge.
    pub fn distance(&self) -> Time {
        self.distance
    }

    /// Current pheromone level.
    pub fn pheromone(&self) -> f64 {
        self.pheromone.get()
    }

    /// Multiplies the pheromone level by `factor`.
    pub fn scale_pheromone(&self, factor: f64) -> f64 {
        self.pheromone.scale(factor)
    }
}
