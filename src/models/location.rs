//! Grid locations and patients.

use serde::{Deserialize, Serialize};

/// Elapsed time, deadlines, and travel distances share one integer unit.
pub type Time = i64;

/// A point on the street/avenue grid.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::Location;
///
/// let a = Location::new(0, 0);
/// let b = Location::new(3, 4);
/// assert_eq!(a.distance_to(&b), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    street: i32,
    avenue: i32,
}

impl Location {
    /// Creates a location at the given street and avenue.
    pub fn new(street: i32, avenue: i32) -> Self {
        Self { street, avenue }
    }

    /// Street coordinate.
    pub fn street(&self) -> i32 {
        self.street
    }

    /// Avenue coordinate.
    pub fn avenue(&self) -> i32 {
        self.avenue
    }

    /// Manhattan distance to another location.
    pub fn distance_to(&self, other: &Location) -> Time {
        let ds = (self.street as Time - other.street as Time).abs();
        let da = (self.avenue as Time - other.avenue as Time).abs();
        ds + da
    }
}

/// A patient waiting for pickup, reachable until its deadline.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Location, Patient};
///
/// let p = Patient::new(Location::new(2, 5), 40);
/// assert_eq!(p.deadline(), 40);
/// assert!(p.is_saved_at(40));
/// assert!(!p.is_saved_at(41));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    location: Location,
    deadline: Time,
}

impl Patient {
    /// Creates a patient at `location` who must reach a hospital by `deadline`.
    pub fn new(location: Location, deadline: Time) -> Self {
        Self { location, deadline }
    }

    /// Pickup location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Latest delivery time that still counts as saved.
    pub fn deadline(&self) -> Time {
        self.deadline
    }

    /// Returns `true` if delivery at `time` saves this patient.
    ///
    /// A time of zero means "never delivered".
    pub fn is_saved_at(&self, time: Time) -> bool {
        time > 0 && time <= self.deadline
    }
}
