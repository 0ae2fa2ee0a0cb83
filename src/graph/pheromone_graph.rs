//! Directed pheromone graph over patients and hospitals.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Instance, NodeId, Plan, Time};

use super::Edge;

/// A directed graph whose edges carry a static distance and a pheromone
/// level.
///
/// Built once per instance with an edge for every ordered patient pair and
/// every hospital→patient pair. There are no patient→hospital or
/// hospital→hospital edges: a hop back to a hospital reads and reinforces
/// the hospital→patient edge of the same pair.
///
/// Distances never change after construction. Pheromone levels are atomic,
/// so a shared `&PheromoneGraph` can be decayed by many ants at once.
///
/// # Examples
///
/// ```
/// use u_dispatch::graph::PheromoneGraph;
/// use u_dispatch::models::NodeId;
///
/// let mut g = PheromoneGraph::new();
/// g.upsert_edge(NodeId::Hospital(0), NodeId::Patient(0), 5, 1.0);
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge(NodeId::Hospital(0), NodeId::Patient(0)).map(|e| e.distance()), Some(5));
/// assert!(g.edge(NodeId::Patient(0), NodeId::Hospital(0)).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PheromoneGraph {
    nodes: BTreeSet<NodeId>,
    edges: BTreeMap<NodeId, BTreeMap<NodeId, Edge>>,
    num_hospitals: usize,
}

impl PheromoneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full graph for an instance, every edge starting at
    /// `initial_pheromone`.
    pub fn from_instance(instance: &Instance, initial_pheromone: f64) -> Self {
        let mut graph = Self::new();
        let patients = instance.patients();
        for (i, p1) in patients.iter().enumerate() {
            for (j, p2) in patients.iter().enumerate() {
                if i == j {
                    continue;
                }
                let distance = p1.location().distance_to(&p2.location());
                graph.upsert_edge(NodeId::Patient(i), NodeId::Patient(j), distance, initial_pheromone);
            }
            for (h, hospital) in instance.hospitals().iter().enumerate() {
                let distance = p1.location().distance_to(hospital);
                graph.upsert_edge(NodeId::Hospital(h), NodeId::Patient(i), distance, initial_pheromone);
            }
        }
        for h in 0..instance.num_hospitals() {
            graph.add_node(NodeId::Hospital(h));
        }
        graph
    }

    fn add_node(&mut self, node: NodeId) {
        if self.nodes.insert(node) {
            if let NodeId::Hospital(h) = node {
                self.num_hospitals = self.num_hospitals.max(h + 1);
            }
        }
    }

    /// Stores the directed edge `from → to`, replacing any existing one and
    /// registering both endpoints.
    pub fn upsert_edge(&mut self, from: NodeId, to: NodeId, distance: Time, pheromone: f64) {
        self.add_node(from);
        self.add_node(to);
        self.edges
            .entry(from)
            .or_default()
            .insert(to, Edge::new(distance, pheromone));
    }

    /// Returns the edge `from → to`, if stored.
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.edges.get(&from).and_then(|tos| tos.get(&to))
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Iterates over all edges as `(from, to, edge)` in node order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &Edge)> + '_ {
        self.edges
            .iter()
            .flat_map(|(&from, tos)| tos.iter().map(move |(&to, edge)| (from, to, edge)))
    }

    /// Closest hospital to `from` and its distance.
    ///
    /// A hospital is its own nearest hospital at distance zero. Ties go to
    /// the lowest hospital index. Returns `None` if `from` is a patient with
    /// no hospital edges.
    pub fn nearest_hospital(&self, from: NodeId) -> Option<(usize, Time)> {
        match from {
            NodeId::Hospital(h) => Some((h, 0)),
            NodeId::Patient(_) => (0..self.num_hospitals)
                .filter_map(|h| {
                    self.edge(NodeId::Hospital(h), from)
                        .map(|e| (h, e.distance()))
                })
                .min_by_key(|&(h, d)| (d, h)),
        }
    }

    /// Scales the pheromone of the edges a hop `from → to` traversed.
    ///
    /// The forward edge is scaled when `to` is a patient; the reverse edge
    /// `to → from` is scaled when `from` is a patient. A patient→patient hop
    /// touches both directions, a hospital→patient hop only the forward
    /// edge, and a patient→hospital hop the hospital→patient edge.
    pub fn scale_hop(&self, from: NodeId, to: NodeId, factor: f64) {
        for (a, b) in hop_edges(from, to).into_iter().flatten() {
            if let Some(edge) = self.edge(a, b) {
                edge.scale_pheromone(factor);
            }
        }
    }

    /// Scales every hop of every route in `plan`; an edge traversed twice is
    /// scaled twice.
    pub fn scale_plan(&self, plan: &Plan, factor: f64) {
        for route in plan.routes() {
            for step in route.steps() {
                self.scale_hop(step.from, step.to, factor);
            }
        }
    }

    /// Scales each distinct edge touched by `plan` exactly once.
    pub fn reinforce_plan(&self, plan: &Plan, factor: f64) {
        let touched: BTreeSet<(NodeId, NodeId)> = plan
            .routes()
            .iter()
            .flat_map(|r| r.steps())
            .flat_map(|s| hop_edges(s.from, s.to).into_iter().flatten())
            .collect();
        for (from, to) in touched {
            if let Some(edge) = self.edge(from, to) {
                edge.scale_pheromone(factor);
            }
        }
    }

    /// Multiplies the pheromone of every edge by `factor`.
    pub fn evaporate(&self, factor: f64) {
        for (_, _, edge) in self.edges() {
            edge.scale_pheromone(factor);
        }
    }
}

/// Stored edges a hop `from → to` reads: the forward edge when heading to a
/// patient, the reverse edge when leaving one.
fn hop_edges(from: NodeId, to: NodeId) -> [Option<(NodeId, NodeId)>; 2] {
    [
        to.patient().map(|_| (from, to)),
        from.patient().map(|_| (to, from)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Patient, Route, Step};

    fn sample_instance() -> Instance {
        let patients = vec![
            Patient::new(Location::new(0, 0), 50),
            Patient::new(Location::new(0, 5), 50),
            Patient::new(Location::new(3, 3), 50),
        ];
        Instance::new(
            patients,
            vec![Location::new(0, 1), Location::new(4, 4)],
            vec![1, 1],
        )
        .expect("valid")
    }

    #[test]
    fn test_upsert_creates_nodes_and_overwrites() {
        let mut g = PheromoneGraph::new();
        g.upsert_edge(NodeId::Patient(0), NodeId::Patient(1), 3, 1.0);
        g.upsert_edge(NodeId::Patient(0), NodeId::Patient(1), 7, 2.0);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        let e = g.edge(NodeId::Patient(0), NodeId::Patient(1)).expect("edge");
        assert_eq!(e.distance(), 7);
        assert_eq!(e.pheromone(), 2.0);
        assert!(g.edge(NodeId::Patient(1), NodeId::Patient(0)).is_none());
    }

    #[test]
    fn test_from_instance_edge_counts() {
        let inst = sample_instance();
        let g = PheromoneGraph::from_instance(&inst, 1.0);
        // 3 * 2 patient pairs + 2 * 3 hospital edges
        assert_eq!(g.edge_count(), 12);
        assert_eq!(g.node_count(), 5);
        assert!(g.edges().all(|(_, _, e)| e.pheromone() == 1.0));
        assert!(g.edge(NodeId::Hospital(0), NodeId::Hospital(1)).is_none());
        assert_eq!(
            g.edge(NodeId::Patient(1), NodeId::Patient(2)).map(Edge::distance),
            Some(5)
        );
        assert_eq!(
            g.edge(NodeId::Hospital(1), NodeId::Patient(0)).map(Edge::distance),
            Some(8)
        );
    }

    #[test]
    fn test_nearest_hospital() {
        let g = PheromoneGraph::from_instance(&sample_instance(), 1.0);
        assert_eq!(g.nearest_hospital(NodeId::Patient(0)), Some((0, 1)));
        assert_eq!(g.nearest_hospital(NodeId::Patient(2)), Some((1, 2)));
        assert_eq!(g.nearest_hospital(NodeId::Hospital(1)), Some((1, 0)));
    }

    #[test]
    fn test_nearest_hospital_tie_prefers_lower_index() {
        let mut g = PheromoneGraph::new();
        g.upsert_edge(NodeId::Hospital(0), NodeId::Patient(0), 4, 1.0);
        g.upsert_edge(NodeId::Hospital(1), NodeId::Patient(0), 4, 1.0);
        assert_eq!(g.nearest_hospital(NodeId::Patient(0)), Some((0, 4)));
    }

    #[test]
    fn test_scale_hop_patient_pair_touches_both_directions() {
        let g = PheromoneGraph::from_instance(&sample_instance(), 1.0);
        g.scale_hop(NodeId::Patient(0), NodeId::Patient(1), 0.5);
        let fwd = g.edge(NodeId::Patient(0), NodeId::Patient(1)).expect("edge");
        let rev = g.edge(NodeId::Patient(1), NodeId::Patient(0)).expect("edge");
        assert_eq!(fwd.pheromone(), 0.5);
        assert_eq!(rev.pheromone(), 0.5);
    }

    #[test]
    fn test_scale_hop_hospital_edges() {
        let g = PheromoneGraph::from_instance(&sample_instance(), 1.0);
        g.scale_hop(NodeId::Hospital(0), NodeId::Patient(2), 0.5);
        g.scale_hop(NodeId::Patient(2), NodeId::Hospital(0), 0.5);
        let e = g.edge(NodeId::Hospital(0), NodeId::Patient(2)).expect("edge");
        assert_eq!(e.pheromone(), 0.25);
        let untouched = g
            .edges()
            .filter(|&(from, to, _)| !(from == NodeId::Hospital(0) && to == NodeId::Patient(2)))
            .all(|(_, _, e)| e.pheromone() == 1.0);
        assert!(untouched);
    }

    #[test]
    fn test_pheromone_asymmetric_after_one_way_update() {
        let mut g = PheromoneGraph::new();
        g.upsert_edge(NodeId::Patient(0), NodeId::Patient(1), 3, 1.0);
        g.upsert_edge(NodeId::Patient(1), NodeId::Patient(0), 3, 1.0);
        g.edge(NodeId::Patient(0), NodeId::Patient(1))
            .expect("edge")
            .scale_pheromone(1.4);
        let fwd = g.edge(NodeId::Patient(0), NodeId::Patient(1)).expect("edge");
        let rev = g.edge(NodeId::Patient(1), NodeId::Patient(0)).expect("edge");
        assert!(fwd.pheromone() > rev.pheromone());
        assert_eq!(fwd.distance(), rev.distance());
    }

    #[test]
    fn test_scale_plan_and_evaporate() {
        let g = PheromoneGraph::from_instance(&sample_instance(), 1.0);
        let mut route = Route::new(0);
        route.push_step(Step {
            from: NodeId::Hospital(0),
            to: NodeId::Patient(0),
            start_time: 0,
            end_time: 2,
        });
        route.push_step(Step {
            from: NodeId::Patient(0),
            to: NodeId::Hospital(0),
            start_time: 2,
            end_time: 4,
        });
        let plan = Plan::new(1, vec![route]);
        g.scale_plan(&plan, 2.0);
        g.evaporate(0.5);
        let e = g.edge(NodeId::Hospital(0), NodeId::Patient(0)).expect("edge");
        assert_eq!(e.pheromone(), 2.0);
        let other = g.edge(NodeId::Patient(1), NodeId::Patient(2)).expect("edge");
        assert_eq!(other.pheromone(), 0.5);

        g.reinforce_plan(&plan, 3.0);
        let e = g.edge(NodeId::Hospital(0), NodeId::Patient(0)).expect("edge");
        assert_eq!(e.pheromone(), 6.0);
        assert_eq!(other.pheromone(), 0.5);
    }
}
