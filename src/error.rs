//! Error types for instance setup and colony execution.

use thiserror::Error;

/// Result type alias for fallible dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors raised while building an instance or driving the colony.
///
/// The optimization loop itself never fails; the worst outcome there is a
/// zero-score plan.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No hospital locations were supplied.
    #[error("instance has no hospitals")]
    NoHospitals,

    /// Fleet sizes and hospital locations disagree in length.
    #[error("fleet lists {fleet} hospitals but {hospitals} hospital locations were given")]
    FleetMismatch {
        /// Entries in the fleet list.
        fleet: usize,
        /// Hospital locations supplied.
        hospitals: usize,
    },

    /// Hospital placement needs at least one patient to cluster.
    #[error("cannot place hospitals without patients")]
    NoPatients,

    /// A colony parameter is out of range.
    #[error("invalid colony configuration: {0}")]
    InvalidConfig(String),

    /// The optimization worker thread could not be started.
    #[error("failed to spawn optimization worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The optimization worker thread panicked.
    #[error("optimization worker panicked")]
    WorkerPanicked,
}
