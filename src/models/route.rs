//! Route step and route types.

use serde::{Deserialize, Serialize};

use super::{NodeId, Time};

/// One hop taken by one ambulance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Node the hop leaves from.
    pub from: NodeId,
    /// Node the hop arrives at.
    pub to: NodeId,
    /// Elapsed time when the hop starts.
    pub start_time: Time,
    /// Elapsed time after arrival and service.
    pub end_time: Time,
}

/// The ordered hops of a single ambulance.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{NodeId, Route, Step};
///
/// let mut route = Route::new(0);
/// route.push_step(Step {
///     from: NodeId::Hospital(0),
///     to: NodeId::Patient(2),
///     start_time: 0,
///     end_time: 4,
/// });
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.stops(), vec![NodeId::Hospital(0), NodeId::Patient(2)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    ambulance_id: usize,
    steps: Vec<Step>,
}

impl Route {
    /// Creates an empty route for the given ambulance.
    pub fn new(ambulance_id: usize) -> Self {
        Self {
            ambulance_id,
            steps: Vec::new(),
        }
    }

    /// Appends a hop.
    pub fn push_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Ambulance that drives this route.
    pub fn ambulance_id(&self) -> usize {
        self.ambulance_id
    }

    /// Hops in travel order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the ambulance never left.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Visited nodes in order, starting with the origin of the first hop.
    pub fn stops(&self) -> Vec<NodeId> {
        let mut stops = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            stops.push(first.from);
        }
        stops.extend(self.steps.iter().map(|s| s.to));
        stops
    }

    /// Elapsed time at the end of the last hop (zero for an empty route).
    pub fn end_time(&self) -> Time {
        self.steps.last().map_or(0, |s| s.end_time)
    }

    /// Splits the route into trips, each ending at a hospital.
    ///
    /// Trailing hops that never reach a hospital form a final partial trip.
    pub fn trips(&self) -> Vec<&[Step]> {
        let mut trips = Vec::new();
        let mut start = 0;
        for (i, step) in self.steps.iter().enumerate() {
            if step.to.is_hospital() {
                trips.push(&self.steps[start..=i]);
                start = i + 1;
            }
        }
        if start < self.steps.len() {
            trips.push(&self.steps[start..]);
        }
        trips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(from: NodeId, to: NodeId, start_time: Time, end_time: Time) -> Step {
        Step {
            from,
            to,
            start_time,
            end_time,
        }
    }

    fn sample_route() -> Route {
        let mut r = Route::new(3);
        r.push_step(step(NodeId::Hospital(0), NodeId::Patient(1), 0, 3));
        r.push_step(step(NodeId::Patient(1), NodeId::Hospital(0), 3, 6));
        r.push_step(step(NodeId::Hospital(0), NodeId::Patient(4), 6, 10));
        r
    }

    #[test]
    fn test_route_empty() {
        let r = Route::new(0);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert!(r.stops().is_empty());
        assert_eq!(r.end_time(), 0);
        assert!(r.trips().is_empty());
    }

    #[test]
    fn test_route_stops() {
        let r = sample_route();
        assert_eq!(r.ambulance_id(), 3);
        assert_eq!(
            r.stops(),
            vec![
                NodeId::Hospital(0),
                NodeId::Patient(1),
                NodeId::Hospital(0),
                NodeId::Patient(4),
            ]
        );
        assert_eq!(r.end_time(), 10);
    }

    #[test]
    fn test_route_trips() {
        let r = sample_route();
        let trips = r.trips();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].len(), 2);
        assert_eq!(trips[1].len(), 1);
        assert_eq!(trips[1][0].to, NodeId::Patient(4));
    }
}
