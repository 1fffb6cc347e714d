//! Nearest-neighbor tour construction.
//!
//! Starts at city 0 and always moves to the nearest unvisited city, then
//! returns to the start. Ties go to the lowest city index.
//!
//! # Complexity
//!
//! O(n²) where n = number of cities.
//!
//! # Reference
//!
//! The simplest constructive heuristic for the TSP; tours are typically
//! 20-25% above optimal on random Euclidean instances.

use tracing::debug;

use super::instance::{Tour, TspInstance};

/// Builds a tour with the nearest-neighbor heuristic.
///
/// An empty instance yields an empty tour; a single city yields `[0, 0]`
/// with distance 0.
///
/// # Examples
///
/// ```
/// use u_mathprog::tsp::{nearest_neighbor, TspInstance};
///
/// let inst = TspInstance::from_distances(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .unwrap();
/// let tour = nearest_neighbor(&inst);
/// assert_eq!(tour.path, vec![0, 1, 3, 2, 0]);
/// assert_eq!(tour.total_distance, 80.0);
/// ```
pub fn nearest_neighbor(instance: &TspInstance) -> Tour {
    let n = instance.num_cities();
    if n == 0 {
        return Tour::from_path(Vec::new(), instance);
    }

    let mut visited = vec![false; n];
    visited[0] = true;
    let mut path = Vec::with_capacity(n + 1);
    path.push(0);
    let mut current = 0;

    loop {
        let mut best: Option<(usize, f64)> = None;
        for (city, &seen) in visited.iter().enumerate() {
            if seen {
                continue;
            }
            let d = instance.distance(current, city);
            if best.map_or(true, |(_, b)| d < b) {
                best = Some((city, d));
            }
        }

        match best {
            Some((next, _)) => {
                visited[next] = true;
                path.push(next);
                current = next;
            }
            None => break,
        }
    }
    path.push(0);

    let tour = Tour::from_path(path, instance);
    debug!(cities = n, distance = tour.total_distance, "nearest-neighbor tour");
    tour
}
