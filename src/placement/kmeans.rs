//! Lloyd's k-means over grid locations with the Manhattan metric.

use rand::seq::index::sample;
use rand::Rng;

use crate::models::Location;

/// Stop once fewer than this fraction of points change cluster.
const DELTA_THRESHOLD: f64 = 0.01;

/// Hard cap on assignment/update rounds.
const MAX_ITERATIONS: usize = 96;

/// A cluster of points with its mean center.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    center: (f64, f64),
    members: Vec<usize>,
}

impl Cluster {
    /// Creates a cluster from a center and member indices.
    pub fn new(center: (f64, f64), members: Vec<usize>) -> Self {
        Self { center, members }
    }

    /// Mean street/avenue of the members.
    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    /// Indices of the member points.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of member points.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the cluster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Center rounded to the nearest grid location.
    pub fn location(&self) -> Location {
        Location::new(self.center.0.round() as i32, self.center.1.round() as i32)
    }
}

fn manhattan(p: &Location, c: (f64, f64)) -> f64 {
    (p.street() as f64 - c.0).abs() + (p.avenue() as f64 - c.1).abs()
}

fn as_center(p: &Location) -> (f64, f64) {
    (p.street() as f64, p.avenue() as f64)
}

/// Partitions `points` into `k` clusters.
///
/// Initial centers are `k` distinct points drawn from `rng` (with repeats
/// only when `k` exceeds the number of points). Points join the center with
/// the smallest Manhattan distance, lowest index on ties; centers move to
/// the mean of their members; a center left without members jumps to a
/// random point.
///
/// Returns an empty vector when `points` is empty or `k` is zero.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_dispatch::models::Location;
/// use u_dispatch::placement::kmeans;
///
/// let points = vec![Location::new(0, 0), Location::new(1, 1), Location::new(50, 50)];
/// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
/// let clusters = kmeans(&points, 2, &mut rng);
/// let mut sizes: Vec<usize> = clusters.iter().map(|c| c.len()).collect();
/// sizes.sort();
/// assert_eq!(sizes, vec![1, 2]);
/// ```
pub fn kmeans<R: Rng + ?Sized>(points: &[Location], k: usize, rng: &mut R) -> Vec<Cluster> {
    let n = points.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }

    let mut centers: Vec<(f64, f64)> = sample(rng, n, k.min(n))
        .into_iter()
        .map(|i| as_center(&points[i]))
        .collect();
    while centers.len() < k {
        centers.push(as_center(&points[rng.random_range(0..n)]));
    }

    let mut assignment = vec![usize::MAX; n];
    for _ in 0..MAX_ITERATIONS {
        let mut changed = 0usize;
        for (i, p) in points.iter().enumerate() {
            let nearest = centers
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| manhattan(p, **a).total_cmp(&manhattan(p, **b)))
                .map_or(0, |(c, _)| c);
            if assignment[i] != nearest {
                assignment[i] = nearest;
                changed += 1;
            }
        }

        let mut sums = vec![(0.0, 0.0, 0usize); k];
        for (p, &c) in points.iter().zip(&assignment) {
            sums[c].0 += p.street() as f64;
            sums[c].1 += p.avenue() as f64;
            sums[c].2 += 1;
        }
        for (center, &(sx, sy, count)) in centers.iter_mut().zip(&sums) {
            *center = if count > 0 {
                (sx / count as f64, sy / count as f64)
            } else {
                as_center(&points[rng.random_range(0..n)])
            };
        }

        if (changed as f64) / (n as f64) < DELTA_THRESHOLD {
            break;
        }
    }

    let mut clusters: Vec<Cluster> = centers
        .into_iter()
        .map(|center| Cluster {
            center,
            members: Vec::new(),
        })
        .collect();
    for (i, &c) in assignment.iter().enumerate() {
        clusters[c].members.push(i);
    }
    clusters
}
