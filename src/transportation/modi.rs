//! MODI (u-v) optimization of a transportation allocation.
//!
//! # Algorithm
//!
//! 1. Complete the basis to `m + n - 1` cells: positive allocations first,
//!    then zero cells cheapest first, skipping any cell that would close a
//!    cycle.
//! 2. Fix `u[0] = 0` and solve `u[i] + v[j] = c[i][j]` over basic cells.
//! 3. Entering cell: non-basic cell with the most negative opportunity cost
//!    `c[i][j] - u[i] - v[j]`. Stop when none is below `-tolerance`.
//! 4. Find the stepping-stone cycle through the entering cell, shift
//!    `theta` (smallest allocation on a minus position) around it, and swap
//!    exactly one leaving cell out of the basis.
//!
//! # Complexity
//!
//! O(iterations · m · n) per pivot for multipliers and opportunity costs.
//!
//! # Reference
//!
//! Dantzig (1951), "Application of the Simplex Method to a Transportation Problem"

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::matrix::Matrix;

use super::problem::{TransportationProblem, TRANSPORT_TOLERANCE};

/// Cell coordinates `(source, destination)`.
pub type Cell = (usize, usize);

/// Settings for [`modi_optimize`].
///
/// # Examples
///
/// ```
/// use u_mathprog::transportation::ModiConfig;
///
/// let config = ModiConfig::default().with_max_iterations(25);
/// assert_eq!(config.max_iterations, 25);
/// assert_eq!(config.tolerance, 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModiConfig {
    /// Maximum number of improving pivots.
    pub max_iterations: usize,
    /// Opportunity costs above `-tolerance` count as non-improving.
    pub tolerance: f64,
}

impl Default for ModiConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: TRANSPORT_TOLERANCE,
        }
    }
}

impl ModiConfig {
    /// Sets the pivot cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the improvement tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Why the MODI loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModiTermination {
    /// No cell has a negative opportunity cost.
    Optimal,
    /// The pivot cap was reached while an improving cell remained.
    IterationLimit,
    /// No stepping-stone cycle exists for the entering cell.
    NoCycle,
}

/// One improving pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModiStep {
    /// 1-based pivot number.
    pub iteration: usize,
    /// Cell brought into the basis.
    pub entering: Cell,
    /// Cell removed from the basis.
    pub leaving: Cell,
    /// Opportunity cost of the entering cell (negative).
    pub opportunity_cost: f64,
    /// Quantity shifted around the cycle.
    pub theta: f64,
    /// Total cost after the pivot.
    pub cost_after: f64,
}

/// Result of [`modi_optimize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModiResult {
    /// Final allocation.
    pub allocation: Matrix,
    /// Final total cost.
    pub cost: f64,
    /// Row multipliers of the final basis.
    pub u: Vec<f64>,
    /// Column multipliers of the final basis.
    pub v: Vec<f64>,
    /// Pivot history.
    pub steps: Vec<ModiStep>,
    /// Stop reason.
    pub termination: ModiTermination,
}

/// Improves `allocation` with the MODI method.
///
/// `allocation` must be feasible for `problem` (rows and columns summing to
/// supply and demand). Every pivot keeps it feasible and never increases
/// the cost.
pub fn modi_optimize(problem: &TransportationProblem, allocation: &Matrix, config: &ModiConfig) -> ModiResult {
    let costs = problem.costs();
    let (m, n) = (problem.num_sources(), problem.num_destinations());
    let tol = config.tolerance;
    let mut allocation = allocation.clone();
    let mut basis = complete_basis(&allocation, costs, tol);
    let mut steps = Vec::new();

    let (termination, u, v) = loop {
        let (u, v) = multipliers(&basis, costs, config.max_iterations.max(m + n));

        let mut entering: Option<(Cell, f64)> = None;
        for i in 0..m {
            for j in 0..n {
                if basis[i][j] {
                    continue;
                }
                let delta = costs.get(i, j) - u[i] - v[j];
                if delta < -tol && entering.map_or(true, |(_, best)| delta < best) {
                    entering = Some(((i, j), delta));
                }
            }
        }
        let Some((cell, delta)) = entering else {
            break (ModiTermination::Optimal, u, v);
        };
        if steps.len() >= config.max_iterations {
            warn!(cap = config.max_iterations, "MODI stopped at iteration cap");
            break (ModiTermination::IterationLimit, u, v);
        }

        let Some(cycle) = find_cycle(&basis, cell, m * n) else {
            warn!(?cell, "no stepping-stone cycle for entering cell");
            break (ModiTermination::NoCycle, u, v);
        };

        let mut theta = f64::INFINITY;
        let mut leaving = cell;
        for &(i, j) in cycle.iter().skip(1).step_by(2) {
            if allocation.get(i, j) < theta {
                theta = allocation.get(i, j);
                leaving = (i, j);
            }
        }
        for (k, &(i, j)) in cycle.iter().enumerate() {
            let shifted = if k % 2 == 0 {
                allocation.get(i, j) + theta
            } else {
                allocation.get(i, j) - theta
            };
            allocation.set(i, j, if shifted.abs() < tol { 0.0 } else { shifted });
        }
        basis[cell.0][cell.1] = true;
        basis[leaving.0][leaving.1] = false;

        let cost_after = problem.total_cost(&allocation);
        trace!(?cell, ?leaving, delta, theta, cost_after, "MODI pivot");
        steps.push(ModiStep {
            iteration: steps.len() + 1,
            entering: cell,
            leaving,
            opportunity_cost: delta,
            theta,
            cost_after,
        });
    };

    let cost = problem.total_cost(&allocation);
    debug!(pivots = steps.len(), cost, ?termination, "MODI finished");
    ModiResult {
        allocation,
        cost,
        u,
        v,
        steps,
        termination,
    }
}

/// Marks positive cells basic, then adds zero cells cheapest first until the
/// basis spans all `m + n` rows and columns, skipping cells that would
/// close a cycle.
fn complete_basis(allocation: &Matrix, costs: &Matrix, tol: f64) -> Vec<Vec<bool>> {
    let (m, n) = (allocation.rows(), allocation.cols());
    let mut basis = vec![vec![false; n]; m];
    let mut components = DisjointSet::new(m + n);
    let mut count = 0;

    for (i, row) in basis.iter_mut().enumerate() {
        for (j, slot) in row.iter_mut().enumerate() {
            if allocation.get(i, j) > tol {
                *slot = true;
                components.union(i, m + j);
                count += 1;
            }
        }
    }

    let mut candidates: Vec<Cell> = (0..m)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|&(i, j)| !basis[i][j])
        .collect();
    candidates.sort_by(|a, b| costs.get(a.0, a.1).total_cmp(&costs.get(b.0, b.1)));

    for (i, j) in candidates {
        if count >= m + n - 1 {
            break;
        }
        if components.union(i, m + j) {
            basis[i][j] = true;
            count += 1;
        }
    }
    basis
}

/// Solves `u[i] + v[j] = c[i][j]` over basic cells with `u[0] = 0`.
/// Multipliers left undetermined after `max_passes` default to zero.
fn multipliers(basis: &[Vec<bool>], costs: &Matrix, max_passes: usize) -> (Vec<f64>, Vec<f64>) {
    let (m, n) = (costs.rows(), costs.cols());
    let mut u: Vec<Option<f64>> = vec![None; m];
    let mut v: Vec<Option<f64>> = vec![None; n];
    u[0] = Some(0.0);

    for _ in 0..max_passes {
        let mut changed = false;
        for i in 0..m {
            for j in 0..n {
                if !basis[i][j] {
                    continue;
                }
                match (u[i], v[j]) {
                    (Some(ui), None) => {
                        v[j] = Some(costs.get(i, j) - ui);
                        changed = true;
                    }
                    (None, Some(vj)) => {
                        u[i] = Some(costs.get(i, j) - vj);
                        changed = true;
                    }
                    _ => {}
                }
            }
        }
        if !changed {
            break;
        }
    }

    if u.iter().chain(&v).any(Option::is_none) {
        warn!("basis does not determine every multiplier; defaulting to 0");
    }
    (
        u.into_iter().map(|x| x.unwrap_or(0.0)).collect(),
        v.into_iter().map(|x| x.unwrap_or(0.0)).collect(),
    )
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    cell: Cell,
    horizontal: bool,
    next: usize,
}

/// Finds the closed path that starts at `entering`, alternates horizontal
/// and vertical moves through basic cells, and returns to the entering
/// column. Even positions gain `theta`, odd positions lose it.
fn find_cycle(basis: &[Vec<bool>], entering: Cell, max_steps: usize) -> Option<Vec<Cell>> {
    let m = basis.len();
    let n = basis.first().map_or(0, Vec::len);
    let mut visited = vec![vec![false; n]; m];
    let mut path = vec![entering];
    let mut stack = vec![Frame {
        cell: entering,
        horizontal: true,
        next: 0,
    }];
    let mut steps = 0usize;

    while let Some(top) = stack.len().checked_sub(1) {
        let Frame {
            cell: (r, c),
            horizontal,
            next,
        } = stack[top];

        if !horizontal && c == entering.1 && path.len() >= 4 {
            return Some(path);
        }

        let found = if horizontal {
            (next..n)
                .find(|&k| k != c && basis[r][k] && !visited[r][k])
                .map(|k| (k, (r, k)))
        } else {
            (next..m)
                .find(|&k| k != r && basis[k][c] && !visited[k][c])
                .map(|k| (k, (k, c)))
        };

        match found {
            Some((k, cell)) => {
                steps += 1;
                if steps > max_steps {
                    return None;
                }
                stack[top].next = k + 1;
                visited[cell.0][cell.1] = true;
                path.push(cell);
                stack.push(Frame {
                    cell,
                    horizontal: !horizontal,
                    next: 0,
                });
            }
            None => {
                stack.pop();
                path.pop();
            }
        }
    }
    None
}

/// Union-find over row and column nodes.
#[derive(Debug, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Joins the sets of `a` and `b`; `false` if already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}
