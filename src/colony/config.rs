//! Colony configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};

/// Parameters for the ant colony.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_dispatch::colony::ColonyConfig;
///
/// let config = ColonyConfig::default()
///     .with_num_ants(20)
///     .with_time_limit(Duration::from_secs(5))
///     .with_seed(42);
/// assert_eq!(config.num_ants, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Ants per generation.
    pub num_ants: usize,
    /// Exponent on pheromone desirability.
    pub alpha: f64,
    /// Exponent on the urgency/proximity heuristic.
    pub beta: f64,
    /// Wall-clock budget for [`AntColony::run`](super::AntColony::run).
    pub time_limit: Duration,
    /// Stop after this many generations, even if time remains.
    pub max_generations: Option<usize>,
    /// Pheromone level of every edge before the first generation.
    pub initial_pheromone: f64,
    /// Factor applied to each traversed edge as an ant finishes.
    pub local_decay: f64,
    /// Factor applied to the best plan's edges after each generation.
    pub reinforcement: f64,
    /// Factor applied to every edge after each generation.
    pub evaporation: f64,
    /// Base RNG seed; ant `i` is seeded with `seed + i`. `None` draws one
    /// from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            num_ants: 50,
            alpha: 1.0,
            beta: 3.0,
            time_limit: Duration::from_secs(110),
            max_generations: None,
            initial_pheromone: 1.0,
            local_decay: 0.7,
            reinforcement: 1.4,
            evaporation: 0.6,
            seed: None,
        }
    }
}

impl ColonyConfig {
    /// Sets the number of ants.
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    /// Sets pheromone and heuristic exponents.
    pub fn with_weights(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Caps the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Sets the starting pheromone level.
    pub fn with_initial_pheromone(mut self, level: f64) -> Self {
        self.initial_pheromone = level;
        self
    }

    /// Sets local decay, best-plan reinforcement, and global evaporation.
    pub fn with_pheromone_factors(mut self, local_decay: f64, reinforcement: f64, evaporation: f64) -> Self {
        self.local_decay = local_decay;
        self.reinforcement = reinforcement;
        self.evaporation = evaporation;
        self
    }

    /// Fixes the base RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every parameter is usable.
    ///
    /// Exponents must be finite; pheromone levels and factors must be finite
    /// and strictly positive so pheromone never reaches zero.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() {
                return Err(DispatchError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }
        for (name, value) in [
            ("initial_pheromone", self.initial_pheromone),
            ("local_decay", self.local_decay),
            ("reinforcement", self.reinforcement),
            ("evaporation", self.evaporation),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DispatchError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
