//! Scored multi-ambulance plans.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use super::{Location, Route};

/// A complete attempt: one route per ambulance plus the number of patients
/// delivered before their deadline.
///
/// The default plan has a zero score and no routes; it stands in for "no
/// generation finished yet".
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Plan, Route};
///
/// let plan = Plan::new(2, vec![Route::new(0), Route::new(1)]);
/// assert_eq!(plan.score(), 2);
/// assert_eq!(plan.routes().len(), 2);
/// assert!(Plan::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    score: usize,
    routes: Vec<Route>,
}

impl Plan {
    /// Creates a plan with the given score and per-ambulance routes.
    pub fn new(score: usize, routes: Vec<Route>) -> Self {
        Self { score, routes }
    }

    /// Number of patients saved.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Routes in fleet order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns `true` if the plan holds no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Total hops across all routes.
    pub fn num_steps(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    /// Returns `true` if this plan scores strictly higher than `other`.
    pub fn improves_on(&self, other: &Plan) -> bool {
        self.score > other.score
    }

    /// Renders the plan as an itinerary listing.
    ///
    /// One `H<n>:<street>,<avenue>` line per hospital, a blank line, then
    /// one line per trip: its start time followed by the stops it visits.
    /// Trips are listed round by round: every ambulance's first trip, then
    /// every second trip, and so on.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dispatch::models::{Location, NodeId, Plan, Route, Step};
    ///
    /// let mut route = Route::new(0);
    /// route.push_step(Step { from: NodeId::Hospital(0), to: NodeId::Patient(0), start_time: 0, end_time: 3 });
    /// route.push_step(Step { from: NodeId::Patient(0), to: NodeId::Hospital(0), start_time: 3, end_time: 6 });
    /// let plan = Plan::new(1, vec![route]);
    ///
    /// assert_eq!(plan.itinerary(&[Location::new(1, 1)]), "H1:1,1\n\n0 H1 P1 H1\n");
    /// ```
    pub fn itinerary(&self, hospitals: &[Location]) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_itinerary(hospitals, &mut out);
        out
    }

    /// Writes the listing of [`itinerary`](Plan::itinerary) to `out`.
    pub fn write_itinerary<W: Write>(&self, hospitals: &[Location], out: &mut W) -> fmt::Result {
        for (h, location) in hospitals.iter().enumerate() {
            writeln!(out, "H{}:{},{}", h + 1, location.street(), location.avenue())?;
        }
        writeln!(out)?;

        let trips: Vec<_> = self.routes.iter().map(Route::trips).collect();
        let rounds = trips.iter().map(Vec::len).max().unwrap_or(0);
        for round in 0..rounds {
            for trip in trips.iter().filter_map(|t| t.get(round)) {
                let Some(first) = trip.first() else {
                    continue;
                };
                write!(out, "{} {}", first.start_time, first.from)?;
                for step in trip.iter() {
                    write!(out, " {}", step.to)?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
