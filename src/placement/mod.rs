//! Hospital placement.
//!
//! Clusters patient locations into one group per hospital, then hands the
//! largest cluster to the hospital with the most ambulances, the second
//! largest to the second best-equipped, and so on.

mod kmeans;

pub use kmeans::{kmeans, Cluster};

use std::cmp::Reverse;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{DispatchError, Result};
use crate::models::{Location, Patient};

/// Places one hospital per `fleet` entry.
///
/// `fleet[h]` is the ambulance count of hospital `h`; the returned vector
/// holds the location of hospital `h` at index `h`.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Location, Patient};
/// use u_dispatch::placement::place_hospitals;
///
/// let patients = vec![
///     Patient::new(Location::new(0, 0), 10),
///     Patient::new(Location::new(0, 2), 10),
///     Patient::new(Location::new(40, 40), 10),
/// ];
/// let hospitals = place_hospitals(&patients, &[1, 3], 42).unwrap();
/// assert_eq!(hospitals, vec![Location::new(40, 40), Location::new(0, 1)]);
/// ```
pub fn place_hospitals(patients: &[Patient], fleet: &[usize], seed: u64) -> Result<Vec<Location>> {
    if fleet.is_empty() {
        return Err(DispatchError::NoHospitals);
    }
    if patients.is_empty() {
        return Err(DispatchError::NoPatients);
    }

    let points: Vec<Location> = patients.iter().map(Patient::location).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    let clusters = kmeans(&points, fleet.len(), &mut rng);
    Ok(assign_by_rank(&clusters, fleet))
}

/// Matches clusters to hospitals rank for rank: clusters by member count
/// and hospitals by ambulance count, both descending, ties in index order.
///
/// Hospitals beyond the number of clusters stay at the origin.
pub fn assign_by_rank(clusters: &[Cluster], fleet: &[usize]) -> Vec<Location> {
    let mut cluster_rank: Vec<usize> = (0..clusters.len()).collect();
    cluster_rank.sort_by_key(|&c| Reverse(clusters[c].len()));

    let mut hospital_rank: Vec<usize> = (0..fleet.len()).collect();
    hospital_rank.sort_by_key(|&h| Reverse(fleet[h]));

    let mut hospitals = vec![Location::default(); fleet.len()];
    for (&h, &c) in hospital_rank.iter().zip(&cluster_rank) {
        hospitals[h] = clusters[c].location();
    }
    hospitals
}
