//! Dispatch problem instance.

use crate::error::{DispatchError, Result};
use crate::placement::place_hospitals;

use super::{Ambulance, Location, Patient, Time};

/// The read-only catalogs every ant works from: patients, hospital
/// locations, and the number of ambulances stationed at each hospital.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Instance, Location, Patient};
///
/// let patients = vec![
///     Patient::new(Location::new(0, 0), 100),
///     Patient::new(Location::new(0, 5), 60),
/// ];
/// let instance = Instance::new(patients, vec![Location::new(0, 0)], vec![2]).unwrap();
/// assert_eq!(instance.time_horizon(), 100);
/// assert_eq!(instance.min_deadline(), 60);
/// assert_eq!(instance.ambulances().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    patients: Vec<Patient>,
    hospitals: Vec<Location>,
    fleet: Vec<usize>,
    time_horizon: Time,
    min_deadline: Time,
}

impl Instance {
    /// Creates an instance.
    ///
    /// `fleet[h]` is the number of ambulances based at `hospitals[h]`.
    pub fn new(patients: Vec<Patient>, hospitals: Vec<Location>, fleet: Vec<usize>) -> Result<Self> {
        if hospitals.is_empty() {
            return Err(DispatchError::NoHospitals);
        }
        if fleet.len() != hospitals.len() {
            return Err(DispatchError::FleetMismatch {
                fleet: fleet.len(),
                hospitals: hospitals.len(),
            });
        }

        let time_horizon = patients.iter().map(Patient::deadline).max().unwrap_or(0);
        let min_deadline = patients
            .iter()
            .map(Patient::deadline)
            .min()
            .unwrap_or(Time::MAX);

        Ok(Self {
            patients,
            hospitals,
            fleet,
            time_horizon,
            min_deadline,
        })
    }

    /// Creates an instance, placing one hospital per fleet entry by
    /// clustering the patient locations.
    pub fn with_placed_hospitals(patients: Vec<Patient>, fleet: Vec<usize>, seed: u64) -> Result<Self> {
        let hospitals = place_hospitals(&patients, &fleet, seed)?;
        Self::new(patients, hospitals, fleet)
    }

    /// All patients.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Hospital locations.
    pub fn hospitals(&self) -> &[Location] {
        &self.hospitals
    }

    /// Ambulance count per hospital.
    pub fn fleet(&self) -> &[usize] {
        &self.fleet
    }

    /// Number of patients.
    pub fn num_patients(&self) -> usize {
        self.patients.len()
    }

    /// Number of hospitals.
    pub fn num_hospitals(&self) -> usize {
        self.hospitals.len()
    }

    /// Latest deadline over all patients; routes stop growing past it.
    pub fn time_horizon(&self) -> Time {
        self.time_horizon
    }

    /// Earliest deadline over all patients.
    pub fn min_deadline(&self) -> Time {
        self.min_deadline
    }

    /// One fresh ambulance per fleet unit, in hospital order.
    pub fn ambulances(&self) -> Vec<Ambulance> {
        self.fleet
            .iter()
            .enumerate()
            .flat_map(|(h, &count)| std::iter::repeat(h).take(count))
            .enumerate()
            .map(|(id, h)| Ambulance::new(id, h))
            .collect()
    }
}
