//! Graph node identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node in the pheromone graph: either a patient or a hospital.
///
/// Ordering puts every patient before every hospital, each group sorted by
/// index, so iteration over node-keyed maps is deterministic.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::NodeId;
///
/// let h = NodeId::Hospital(0);
/// assert_eq!(h.to_signed(), -1);
/// assert_eq!(NodeId::from_signed(-1), h);
/// assert_eq!(NodeId::Patient(4).to_string(), "P5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    /// Patient index into the instance catalog.
    Patient(usize),
    /// Hospital index into the instance catalog.
    Hospital(usize),
}

impl NodeId {
    /// Converts from the signed encoding where hospital `h` is `-h-1`.
    pub fn from_signed(id: i64) -> Self {
        if id >= 0 {
            NodeId::Patient(id as usize)
        } else {
            NodeId::Hospital((-(id + 1)) as usize)
        }
    }

    /// Converts to the signed encoding where hospital `h` is `-h-1`.
    pub fn to_signed(self) -> i64 {
        match self {
            NodeId::Patient(p) => p as i64,
            NodeId::Hospital(h) => -(h as i64) - 1,
        }
    }

    /// Patient index, if this node is a patient.
    pub fn patient(self) -> Option<usize> {
        match self {
            NodeId::Patient(p) => Some(p),
            NodeId::Hospital(_) => None,
        }
    }

    /// Hospital index, if this node is a hospital.
    pub fn hospital(self) -> Option<usize> {
        match self {
            NodeId::Hospital(h) => Some(h),
            NodeId::Patient(_) => None,
        }
    }

    /// Returns `true` for hospital nodes.
    pub fn is_hospital(self) -> bool {
        matches!(self, NodeId::Hospital(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Patient(p) => write!(f, "P{}", p + 1),
            NodeId::Hospital(h) => write!(f, "H{}", h + 1),
        }
    }
}
