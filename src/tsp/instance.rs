//! TSP instance and tour types.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_finite, SolveError, SolveResult};
use crate::matrix::Matrix;

const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Cities with a pairwise distance matrix.
///
/// The matrix must be square, finite and non-negative; it need not be
/// symmetric.
///
/// # Examples
///
/// ```
/// use u_mathprog::tsp::TspInstance;
///
/// let inst = TspInstance::from_distances(vec![
///     vec![0.0, 2.0],
///     vec![2.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(inst.labels(), ["A", "B"]);
/// assert_eq!(inst.distance(0, 1), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TspInstance {
    labels: Vec<String>,
    distances: Matrix,
}

impl TspInstance {
    /// Creates an instance with explicit city labels.
    pub fn new(labels: Vec<String>, distances: Vec<Vec<f64>>) -> SolveResult<Self> {
        let n = distances.len();
        if labels.len() != n {
            return Err(SolveError::dimension("city labels", n, labels.len()));
        }
        for (i, row) in distances.iter().enumerate() {
            if row.len() != n {
                return Err(SolveError::dimension(format!("distance row {}", i + 1), n, row.len()));
            }
        }
        let distances = Matrix::from_rows(&distances)?;
        ensure_finite(distances.as_slice(), "distance matrix")?;
        if distances.as_slice().iter().any(|&d| d < 0.0) {
            return Err(SolveError::invalid("distances must be non-negative"));
        }
        if !distances.is_symmetric(SYMMETRY_TOLERANCE) {
            debug!(cities = n, "asymmetric distance matrix");
        }
        Ok(Self { labels, distances })
    }

    /// Creates an instance labelled `A`, `B`, ..., `Z`, `AA`, ...
    pub fn from_distances(distances: Vec<Vec<f64>>) -> SolveResult<Self> {
        let labels = (0..distances.len()).map(city_label).collect();
        Self::new(labels, distances)
    }

    /// Number of cities.
    pub fn num_cities(&self) -> usize {
        self.labels.len()
    }

    /// City labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Distance matrix.
    pub fn distances(&self) -> &Matrix {
        &self.distances
    }

    /// Distance from `from` to `to`.
    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Returns `true` if `d(i, j) == d(j, i)` for every pair, within 1e-10.
    pub fn is_symmetric(&self) -> bool {
        self.distances.is_symmetric(SYMMETRY_TOLERANCE)
    }

    /// Length of the closed walk `path[0] -> path[1] -> ... -> path[last]`.
    pub fn path_length(&self, path: &[usize]) -> f64 {
        path.windows(2).map(|w| self.distance(w[0], w[1])).sum()
    }
}

/// Spreadsheet-style label for index `i` (0 → `A`, 26 → `AA`).
fn city_label(mut i: usize) -> String {
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (i % 26) as u8);
        if i < 26 {
            break;
        }
        i = i / 26 - 1;
    }
    label.iter().rev().map(|&b| b as char).collect()
}

/// One leg of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TourStep {
    /// 1-based leg number.
    pub step: usize,
    /// Departure city index.
    pub from: usize,
    /// Arrival city index.
    pub to: usize,
    /// Leg distance.
    pub distance: f64,
}

/// A closed tour starting and ending at city 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    /// City indices, with the start repeated at the end.
    pub path: Vec<usize>,
    /// Sum of leg distances.
    pub total_distance: f64,
    /// Legs in order.
    pub steps: Vec<TourStep>,
}

impl Tour {
    /// Builds a tour from a closed `path`, computing legs and total.
    pub fn from_path(path: Vec<usize>, instance: &TspInstance) -> Self {
        let steps: Vec<TourStep> = path
            .windows(2)
            .enumerate()
            .map(|(k, w)| TourStep {
                step: k + 1,
                from: w[0],
                to: w[1],
                distance: instance.distance(w[0], w[1]),
            })
            .collect();
        let total_distance = steps.iter().map(|s| s.distance).sum();
        Self {
            path,
            total_distance,
            steps,
        }
    }

    /// Labels of the visited cities, in path order.
    pub fn labels<'a>(&self, instance: &'a TspInstance) -> Vec<&'a str> {
        self.path
            .iter()
            .filter_map(|&i| instance.labels().get(i))
            .map(String::as_str)
            .collect()
    }

    /// Number of distinct cities visited.
    pub fn num_cities(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}
