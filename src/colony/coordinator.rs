//! Generational colony coordinator.
//!
//! # Generation
//!
//! 1. Every ant resets and builds a full plan, all ants in parallel.
//! 2. As each ant finishes, the edges of its plan are scaled by the local
//!    decay factor. Pheromone cells are atomic, so overlapping decays from
//!    different ants compose instead of racing.
//! 3. After all ants finish, any plan scoring strictly above the running
//!    best replaces it (ties keep the incumbent).
//! 4. Each distinct edge of the running best is reinforced once, then every
//!    edge evaporates.
//!
//! [`AntColony::run`] repeats generations on a worker thread until the time
//! limit (or the optional generation cap) is hit. On timeout the best plan
//! is read at the deadline, then the worker is cancelled and joined: ants
//! not yet started are skipped, a cancelled generation never updates the
//! best plan, and the graph is never touched after `run` returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::error::{DispatchError, Result};
use crate::graph::PheromoneGraph;
use crate::models::{Instance, Plan};

use super::ant::{Ant, HospitalAnt};
use super::config::ColonyConfig;

/// Ant colony optimizer over a shared pheromone graph.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_dispatch::colony::{AntColony, ColonyConfig};
/// use u_dispatch::models::{Instance, Location, Patient};
///
/// let patients = vec![
///     Patient::new(Location::new(0, 0), 100),
///     Patient::new(Location::new(0, 5), 100),
/// ];
/// let instance = Instance::new(patients, vec![Location::new(0, 0)], vec![1]).unwrap();
/// let config = ColonyConfig::default()
///     .with_num_ants(4)
///     .with_max_generations(5)
///     .with_time_limit(Duration::from_secs(10))
///     .with_seed(42);
///
/// let plan = AntColony::for_instance(instance, config).unwrap().run().unwrap();
/// assert_eq!(plan.score(), 2);
/// ```
pub struct AntColony<A = HospitalAnt> {
    config: ColonyConfig,
    graph: Arc<PheromoneGraph>,
    ants: Vec<A>,
    best: Arc<Mutex<Plan>>,
    generation: usize,
}

impl AntColony<HospitalAnt> {
    /// Builds the graph and a population of [`HospitalAnt`]s for `instance`.
    pub fn for_instance(instance: Instance, config: ColonyConfig) -> Result<Self> {
        config.validate()?;
        let graph = PheromoneGraph::from_instance(&instance, config.initial_pheromone);
        let instance = Arc::new(instance);
        let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let ants = (0..config.num_ants)
            .map(|i| HospitalAnt::new(Arc::clone(&instance), base_seed.wrapping_add(i as u64)))
            .collect();
        Self::new(config, graph, ants)
    }
}

impl<A: Ant> AntColony<A> {
    /// Creates a colony from a prepared graph and population.
    pub fn new(config: ColonyConfig, graph: PheromoneGraph, ants: Vec<A>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            graph: Arc::new(graph),
            ants,
            best: Arc::new(Mutex::new(Plan::default())),
            generation: 0,
        })
    }

    /// The shared pheromone graph.
    pub fn graph(&self) -> &PheromoneGraph {
        &self.graph
    }

    /// Colony parameters.
    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Snapshot of the best plan found so far.
    pub fn best(&self) -> Plan {
        snapshot(&self.best)
    }

    /// Runs one generation and returns the running-best score.
    pub fn run_generation(&mut self) -> usize {
        let never = AtomicBool::new(false);
        match self.try_generation(&never) {
            Some(score) => score,
            None => self.best().score(),
        }
    }

    /// Runs generations until `cancel` is raised or the generation cap is
    /// reached. Returns the number of generations completed.
    pub fn optimize(&mut self, cancel: &AtomicBool) -> usize {
        while !cancel.load(Ordering::Acquire) {
            if self.config.max_generations.is_some_and(|max| self.generation >= max) {
                break;
            }
            if self.try_generation(cancel).is_none() {
                break;
            }
        }
        self.generation
    }

    /// One generation. Ants that have not started when `cancel` is raised
    /// are skipped, and a cancelled generation leaves the best plan alone.
    fn try_generation(&mut self, cancel: &AtomicBool) -> Option<usize> {
        let graph: &PheromoneGraph = &self.graph;
        let (alpha, beta) = (self.config.alpha, self.config.beta);
        let local_decay = self.config.local_decay;

        let plans: Vec<Option<Plan>> = self
            .ants
            .par_iter_mut()
            .map(|ant| {
                if cancel.load(Ordering::Acquire) {
                    return None;
                }
                ant.reset();
                let routes = ant.compute_solution(alpha, beta, graph);
                let plan = Plan::new(ant.compute_fitness(), routes);
                graph.scale_plan(&plan, local_decay);
                trace!(score = plan.score(), steps = plan.num_steps(), "ant finished");
                Some(plan)
            })
            .collect();

        if cancel.load(Ordering::Acquire) {
            debug!(generation = self.generation + 1, "generation cancelled");
            return None;
        }

        let generation_best = plans.iter().flatten().map(Plan::score).max().unwrap_or(0);
        let best_score = {
            let mut best = self.best.lock().unwrap_or_else(PoisonError::into_inner);
            for plan in plans.into_iter().flatten() {
                if plan.improves_on(&best) {
                    *best = plan;
                }
            }
            graph.reinforce_plan(&best, self.config.reinforcement);
            best.score()
        };
        graph.evaporate(self.config.evaporation);

        self.generation += 1;
        debug!(
            generation = self.generation,
            best = best_score,
            generation_best,
            "generation complete"
        );
        Some(best_score)
    }
}

impl<A: Ant + 'static> AntColony<A> {
    /// Optimizes on a worker thread until the time limit or generation cap,
    /// then returns the best plan.
    ///
    /// On timeout the result is the best plan as of the deadline; work still
    /// in flight is cancelled and joined but never reported. If no
    /// generation finishes in time the plan has a zero score and no routes.
    pub fn run(mut self) -> Result<Plan> {
        let time_limit = self.config.time_limit;
        let best = Arc::clone(&self.best);
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let worker = {
            let cancel = Arc::clone(&cancel);
            thread::Builder::new()
                .name("ant-colony".to_string())
                .spawn(move || {
                    let generations = self.optimize(&cancel);
                    // The receiver is gone only if `run` already timed out.
                    let _ = tx.send(generations);
                })?
        };

        let at_deadline = match rx.recv_timeout(time_limit) {
            Ok(generations) => {
                debug!(generations, "generation cap reached");
                None
            }
            Err(RecvTimeoutError::Timeout) => {
                debug!(?time_limit, "time limit reached");
                Some(snapshot(&best))
            }
            Err(RecvTimeoutError::Disconnected) => None,
        };
        cancel.store(true, Ordering::Release);
        worker.join().map_err(|_| DispatchError::WorkerPanicked)?;

        let plan = at_deadline.unwrap_or_else(|| snapshot(&best));
        info!(score = plan.score(), routes = plan.routes().len(), "optimization finished");
        Ok(plan)
    }
}

fn snapshot(best: &Mutex<Plan>) -> Plan {
    best.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, NodeId, Patient, Route, Step};
    use std::time::{Duration, Instant};

    fn grid_instance() -> Instance {
        let patients = vec![
            Patient::new(Location::new(1, 1), 40),
            Patient::new(Location::new(2, 6), 35),
            Patient::new(Location::new(7, 3), 50),
            Patient::new(Location::new(8, 8), 60),
            Patient::new(Location::new(3, 9), 45),
            Patient::new(Location::new(6, 0), 55),
        ];
        Instance::new(
            patients,
            vec![Location::new(2, 2), Location::new(7, 7)],
            vec![1, 1],
        )
        .expect("valid")
    }

    fn config() -> ColonyConfig {
        ColonyConfig::default()
            .with_num_ants(8)
            .with_seed(7)
            .with_time_limit(Duration::from_secs(30))
    }

    /// An ant that replays a fixed plan.
    struct ScriptedAnt {
        routes: Vec<Route>,
        score: usize,
    }

    impl Ant for ScriptedAnt {
        fn reset(&mut self) {}

        fn compute_solution(&mut self, _alpha: f64, _beta: f64, _graph: &PheromoneGraph) -> Vec<Route> {
            self.routes.clone()
        }

        fn compute_fitness(&self) -> usize {
            self.score
        }
    }

    fn single_hop_route(patient: usize) -> Route {
        let mut r = Route::new(0);
        r.push_step(Step {
            from: NodeId::Hospital(0),
            to: NodeId::Patient(patient),
            start_time: 0,
            end_time: 2,
        });
        r
    }

    #[test]
    fn test_best_score_monotonic() {
        let mut colony = AntColony::for_instance(grid_instance(), config()).expect("valid");
        let mut previous = 0;
        for _ in 0..15 {
            let score = colony.run_generation();
            assert!(score >= previous);
            assert!(score <= 6);
            previous = score;
        }
        assert_eq!(colony.generation(), 15);
        assert_eq!(colony.best().score(), previous);
    }

    #[test]
    fn test_zero_ants_keeps_empty_best() {
        let mut colony =
            AntColony::for_instance(grid_instance(), config().with_num_ants(0)).expect("valid");
        assert_eq!(colony.run_generation(), 0);
        let best = colony.best();
        assert_eq!(best.score(), 0);
        assert!(best.is_empty());
        assert!(colony.graph().edges().all(|(_, _, e)| (e.pheromone() - 0.6).abs() < 1e-12));
    }

    #[test]
    fn test_ties_keep_incumbent() {
        let mut g = PheromoneGraph::new();
        g.upsert_edge(NodeId::Hospital(0), NodeId::Patient(0), 1, 1.0);
        g.upsert_edge(NodeId::Hospital(0), NodeId::Patient(1), 1, 1.0);
        let ants = vec![
            ScriptedAnt {
                routes: vec![single_hop_route(0)],
                score: 1,
            },
            ScriptedAnt {
                routes: vec![single_hop_route(1)],
                score: 1,
            },
        ];
        let mut colony = AntColony::new(config(), g, ants).expect("valid");
        colony.run_generation();
        let best = colony.best();
        assert_eq!(best.routes()[0].steps()[0].to, NodeId::Patient(0));
    }

    #[test]
    fn test_pheromone_update_factors() {
        let mut g = PheromoneGraph::new();
        g.upsert_edge(NodeId::Hospital(0), NodeId::Patient(0), 1, 1.0);
        g.upsert_edge(NodeId::Hospital(0), NodeId::Patient(1), 1, 1.0);
        g.upsert_edge(NodeId::Hospital(0), NodeId::Patient(2), 1, 1.0);
        let ants = vec![
            ScriptedAnt {
                routes: vec![single_hop_route(0)],
                score: 2,
            },
            ScriptedAnt {
                routes: vec![single_hop_route(1)],
                score: 1,
            },
        ];
        let mut colony = AntColony::new(config(), g, ants).expect("valid");
        colony.run_generation();

        let level = |p| {
            colony
                .graph()
                .edge(NodeId::Hospital(0), NodeId::Patient(p))
                .expect("edge")
                .pheromone()
        };
        // best: decayed, reinforced, evaporated
        assert!((level(0) - 0.7 * 1.4 * 0.6).abs() < 1e-12);
        // other ant: decayed, evaporated
        assert!((level(1) - 0.7 * 0.6).abs() < 1e-12);
        // untouched: evaporated only
        assert!((level(2) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_concurrent_decay_composes() {
        let mut g = PheromoneGraph::new();
        g.upsert_edge(NodeId::Hospital(0), NodeId::Patient(0), 1, 1.0);
        let ants: Vec<_> = (0..16)
            .map(|_| ScriptedAnt {
                routes: vec![single_hop_route(0)],
                score: 0,
            })
            .collect();
        let mut colony = AntColony::new(config(), g, ants).expect("valid");
        colony.run_generation();
        let level = colony
            .graph()
            .edge(NodeId::Hospital(0), NodeId::Patient(0))
            .expect("edge")
            .pheromone();
        assert!((level - 0.7f64.powi(16) * 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_evaporation_bound() {
        let mut colony = AntColony::for_instance(grid_instance(), config()).expect("valid");
        for _ in 0..3 {
            let before: Vec<f64> = colony.graph().edges().map(|(_, _, e)| e.pheromone()).collect();
            colony.run_generation();
            let after: Vec<f64> = colony.graph().edges().map(|(_, _, e)| e.pheromone()).collect();
            for (b, a) in before.iter().zip(&after) {
                assert!(*a > 0.0);
                let ratio = a / b;
                let explained = (0..200).any(|k| {
                    [1.0, 1.4].iter().any(|r| {
                        let expected = 0.6 * 0.7f64.powi(k) * r;
                        (ratio - expected).abs() <= 1e-9 * expected
                    })
                });
                assert!(explained, "ratio {ratio} not a product of update factors");
            }
        }
    }

    #[test]
    fn test_run_respects_generation_cap() {
        let colony = AntColony::for_instance(grid_instance(), config().with_max_generations(4))
            .expect("valid");
        let start = Instant::now();
        let plan = colony.run().expect("run");
        assert!(start.elapsed() < Duration::from_secs(30));
        assert!(plan.score() > 0 && plan.score() <= 6);
        assert_eq!(plan.routes().len(), 2);
    }

    #[test]
    fn test_run_stops_at_time_limit() {
        let colony = AntColony::for_instance(
            grid_instance(),
            config().with_time_limit(Duration::from_millis(200)),
        )
        .expect("valid");
        let start = Instant::now();
        let plan = colony.run().expect("run");
        assert!(start.elapsed() < Duration::from_secs(10));
        assert!(plan.score() <= 6);
    }

    #[test]
    fn test_run_zero_budget_returns_empty_or_best() {
        let colony = AntColony::for_instance(
            grid_instance(),
            config().with_num_ants(0).with_time_limit(Duration::ZERO),
        )
        .expect("valid");
        let plan = colony.run().expect("run");
        assert_eq!(plan.score(), 0);
        assert!(plan.is_empty());
    }

    fn large_instance() -> Instance {
        let patients = (0..300)
            .map(|i| Patient::new(Location::new((i * 37) % 100, (i * 53) % 100), 500 + i as i64))
            .collect();
        Instance::new(
            patients,
            vec![Location::new(10, 10), Location::new(50, 50), Location::new(90, 20)],
            vec![1, 1, 1],
        )
        .expect("valid")
    }

    #[test]
    fn test_run_reports_best_as_of_deadline() {
        let colony = AntColony::for_instance(
            large_instance(),
            config().with_num_ants(50).with_time_limit(Duration::from_millis(1)),
        )
        .expect("valid");
        let plan = colony.run().expect("run");
        assert_eq!(plan.score(), 0);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_optimize_with_raised_cancel_does_nothing() {
        let mut colony = AntColony::for_instance(grid_instance(), config()).expect("valid");
        let before: Vec<f64> = colony.graph().edges().map(|(_, _, e)| e.pheromone()).collect();
        let cancel = AtomicBool::new(true);
        assert_eq!(colony.optimize(&cancel), 0);
        assert!(colony.best().is_empty());
        let after: Vec<f64> = colony.graph().edges().map(|(_, _, e)| e.pheromone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_cancelled_generation_keeps_best() {
        let mut colony = AntColony::for_instance(grid_instance(), config()).expect("valid");
        let cancel = AtomicBool::new(true);
        assert!(colony.try_generation(&cancel).is_none());
        assert_eq!(colony.generation(), 0);
        assert!(colony.best().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = config().with_pheromone_factors(0.7, 1.4, 0.0);
        assert!(matches!(
            AntColony::for_instance(grid_instance(), bad),
            Err(DispatchError::InvalidConfig(_))
        ));
    }
}
