//! Ambulance state during one construction attempt.

use super::{NodeId, Time};

/// Fixed service time spent at every stop (pickup or drop-off).
pub const SERVICE_TIME: Time = 1;

/// An ambulance based at a hospital.
///
/// Holds the mutable state of one ambulance inside a single ant's attempt:
/// where it is, how much time has elapsed, and which patients are aboard.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Ambulance, NodeId};
///
/// let mut a = Ambulance::new(0, 1);
/// assert_eq!(a.location(), NodeId::Hospital(1));
/// a.move_to(NodeId::Patient(3), 5);
/// a.pick_up(3);
/// assert_eq!(a.elapsed(), 6);
/// assert_eq!(a.carried(), &[3]);
/// ```
#[derive(Debug, Clone)]
pub struct Ambulance {
    id: usize,
    home: usize,
    location: NodeId,
    elapsed: Time,
    carried: Vec<usize>,
}

impl Ambulance {
    /// Maximum number of patients aboard at once.
    pub const CAPACITY: usize = 4;

    /// Creates an ambulance parked at hospital `home`.
    pub fn new(id: usize, home: usize) -> Self {
        Self {
            id,
            home,
            location: NodeId::Hospital(home),
            elapsed: 0,
            carried: Vec::with_capacity(Self::CAPACITY),
        }
    }

    /// Returns the ambulance to its home hospital at time zero, empty.
    pub fn reset(&mut self) {
        self.location = NodeId::Hospital(self.home);
        self.elapsed = 0;
        self.carried.clear();
    }

    /// Ambulance ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Home hospital index.
    pub fn home(&self) -> usize {
        self.home
    }

    /// Current node.
    pub fn location(&self) -> NodeId {
        self.location
    }

    /// Elapsed time in this attempt.
    pub fn elapsed(&self) -> Time {
        self.elapsed
    }

    /// Patients aboard, in pickup order.
    pub fn carried(&self) -> &[usize] {
        &self.carried
    }

    /// Returns `true` when no further patient fits.
    pub fn is_full(&self) -> bool {
        self.carried.len() >= Self::CAPACITY
    }

    /// Travels to `to`, spending `distance` plus the service time.
    pub fn move_to(&mut self, to: NodeId, distance: Time) {
        self.location = to;
        self.elapsed += distance + SERVICE_TIME;
    }

    /// Takes a patient aboard.
    pub fn pick_up(&mut self, patient: usize) {
        debug_assert!(!self.is_full(), "ambulance {} over capacity", self.id);
        self.carried.push(patient);
    }

    /// Unloads every patient aboard, returning them in pickup order.
    pub fn drop_off(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.carried)
    }
}
