//! 2-opt tour improvement.
//!
//! # Algorithm
//!
//! For each pair of positions `i < j` in the open tour (start city fixed),
//! reversing `path[i..=j]` changes the length by
//!
//! ```text
//! delta = d(prev, path[j]) + d(path[i], next) - d(prev, path[i]) - d(path[j], next)
//!       + (reversed inner legs - forward inner legs)
//! ```
//!
//! The inner-leg term is zero for symmetric matrices and is skipped for them. Moves with
//! `delta < -1e-10` are applied immediately (first improvement) until a
//! full pass finds none.
//!
//! # Complexity
//!
//! O(n²) per pass on symmetric instances, O(n³) on asymmetric ones where the
//! inner-leg term is O(n).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use tracing::trace;

use super::instance::{Tour, TspInstance};

/// Improves `tour` with first-improvement 2-opt, keeping city 0 first.
///
/// The result is never longer than the input.
///
/// # Examples
///
/// ```
/// use u_mathprog::tsp::{two_opt_improve, Tour, TspInstance};
///
/// // Unit square, corners in order 0,1,2,3; tour 0→2→1→3→0 crosses itself.
/// let s = 2f64.sqrt();
/// let inst = TspInstance::from_distances(vec![
///     vec![0.0, 1.0, s, 1.0],
///     vec![1.0, 0.0, 1.0, s],
///     vec![s, 1.0, 0.0, 1.0],
///     vec![1.0, s, 1.0, 0.0],
/// ])
/// .unwrap();
/// let crossing = Tour::from_path(vec![0, 2, 1, 3, 0], &inst);
/// let improved = two_opt_improve(&crossing, &inst);
/// assert!((improved.total_distance - 4.0).abs() < 1e-10);
/// ```
pub fn two_opt_improve(tour: &Tour, instance: &TspInstance) -> Tour {
    if tour.path.len() < 4 {
        return tour.clone();
    }
    let start = tour.path[0];
    // Interior cities only; start city stays at both ends.
    let mut inner: Vec<usize> = tour.path[1..tour.path.len() - 1].to_vec();
    let n = inner.len();
    let symmetric = instance.is_symmetric();
    let mut improved = true;

    while improved {
        improved = false;
        for i in 0..n.saturating_sub(1) {
            for j in i + 1..n {
                let delta = two_opt_delta(&inner, start, instance, symmetric, i, j);
                if delta < -1e-10 {
                    trace!(i, j, delta, "2-opt move");
                    inner[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    let mut path = Vec::with_capacity(n + 2);
    path.push(start);
    path.extend(inner);
    path.push(start);
    Tour::from_path(path, instance)
}

/// Length change from reversing `route[i..=j]` between `start` endpoints.
fn two_opt_delta(
    route: &[usize],
    start: usize,
    instance: &TspInstance,
    symmetric: bool,
    i: usize,
    j: usize,
) -> f64 {
    let n = route.len();
    let prev = if i == 0 { start } else { route[i - 1] };
    let next = if j == n - 1 { start } else { route[j + 1] };

    let old_cost = instance.distance(prev, route[i]) + instance.distance(route[j], next);
    let new_cost = instance.distance(prev, route[j]) + instance.distance(route[i], next);

    if symmetric {
        return new_cost - old_cost;
    }
    let inner: f64 = route[i..=j]
        .windows(2)
        .map(|w| instance.distance(w[1], w[0]) - instance.distance(w[0], w[1]))
        .sum();

    new_cost - old_cost + inner
}
