//! Transportation problem and initial-solution types.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, SolveError, SolveResult};
use crate::matrix::Matrix;

/// Tolerance for balance checks, exhausted rows/columns and zero allocations.
pub const TRANSPORT_TOLERANCE: f64 = 1e-4;

/// A balanced transportation problem.
///
/// Supply `i` ships to destination `j` at `costs[i][j]` per unit. Total
/// supply must equal total demand (within [`TRANSPORT_TOLERANCE`]); the
/// check happens here, before any heuristic runs.
///
/// # Examples
///
/// ```
/// use u_mathprog::transportation::TransportationProblem;
///
/// let p = TransportationProblem::new(
///     vec![20.0, 30.0],
///     vec![25.0, 25.0],
///     vec![vec![4.0, 6.0], vec![5.0, 3.0]],
/// )
/// .unwrap();
/// assert_eq!(p.num_sources(), 2);
/// assert_eq!(p.total_supply(), 50.0);
///
/// let unbalanced = TransportationProblem::new(vec![10.0], vec![5.0], vec![vec![1.0]]);
/// assert!(unbalanced.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationProblem {
    supply: Vec<f64>,
    demand: Vec<f64>,
    costs: Matrix,
}

impl TransportationProblem {
    /// Creates a problem, validating shapes, values and balance.
    pub fn new(supply: Vec<f64>, demand: Vec<f64>, costs: Vec<Vec<f64>>) -> SolveResult<Self> {
        if supply.is_empty() || demand.is_empty() {
            return Err(SolveError::invalid("transportation problem needs at least one source and one destination"));
        }
        ensure_finite(&supply, "supply")?;
        ensure_finite(&demand, "demand")?;
        if supply.iter().chain(&demand).any(|&q| q < 0.0) {
            return Err(SolveError::invalid("supply and demand must be non-negative"));
        }
        if costs.len() != supply.len() {
            return Err(SolveError::dimension("cost matrix rows", supply.len(), costs.len()));
        }
        for (i, row) in costs.iter().enumerate() {
            if row.len() != demand.len() {
                return Err(SolveError::dimension(
                    format!("cost matrix row {}", i + 1),
                    demand.len(),
                    row.len(),
                ));
            }
        }
        let costs = Matrix::from_rows(&costs)?;
        ensure_finite(costs.as_slice(), "cost matrix")?;

        let total_supply: f64 = supply.iter().sum();
        let total_demand: f64 = demand.iter().sum();
        if (total_supply - total_demand).abs() > TRANSPORT_TOLERANCE {
            return Err(SolveError::Unbalanced {
                supply: total_supply,
                demand: total_demand,
            });
        }

        Ok(Self {
            supply,
            demand,
            costs,
        })
    }

    /// Capacity of each source.
    pub fn supply(&self) -> &[f64] {
        &self.supply
    }

    /// Requirement of each destination.
    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    /// Unit cost matrix (sources × destinations).
    pub fn costs(&self) -> &Matrix {
        &self.costs
    }

    /// Number of sources.
    pub fn num_sources(&self) -> usize {
        self.supply.len()
    }

    /// Number of destinations.
    pub fn num_destinations(&self) -> usize {
        self.demand.len()
    }

    /// Sum of all supplies.
    pub fn total_supply(&self) -> f64 {
        self.supply.iter().sum()
    }

    /// Total shipping cost `Σ allocation × cost` of an allocation.
    pub fn total_cost(&self, allocation: &Matrix) -> f64 {
        self.costs.dot(allocation).unwrap_or(f64::NAN)
    }

    /// Returns `true` if every row of `allocation` sums to its supply and
    /// every column to its demand, within `tol`.
    pub fn is_balanced_allocation(&self, allocation: &Matrix, tol: f64) -> bool {
        allocation.rows() == self.num_sources()
            && allocation.cols() == self.num_destinations()
            && allocation.as_slice().iter().all(|&q| q >= -tol)
            && self
                .supply
                .iter()
                .enumerate()
                .all(|(i, &s)| (allocation.row_sum(i) - s).abs() <= tol)
            && self
                .demand
                .iter()
                .enumerate()
                .all(|(j, &d)| (allocation.col_sum(j) - d).abs() <= tol)
    }
}

/// Heuristic used to build an initial allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialMethod {
    /// Northwest-Corner rule.
    NorthwestCorner,
    /// Least-Cost (matrix minimum) method.
    LeastCost,
    /// Vogel's Approximation Method.
    Vogel,
}

/// An initial feasible allocation and its cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialSolution {
    /// Heuristic that produced it.
    pub method: InitialMethod,
    /// Flow per (source, destination).
    pub allocation: Matrix,
    /// Total shipping cost.
    pub cost: f64,
}

impl InitialSolution {
    pub(crate) fn new(problem: &TransportationProblem, method: InitialMethod, allocation: Matrix) -> Self {
        let cost = problem.total_cost(&allocation);
        Self {
            method,
            allocation,
            cost,
        }
    }
}

/// Remaining supply and demand while a heuristic allocates.
#[derive(Debug, Clone)]
pub(crate) struct Remaining {
    pub supply: Vec<f64>,
    pub demand: Vec<f64>,
}

impl Remaining {
    pub fn new(problem: &TransportationProblem) -> Self {
        Self {
            supply: problem.supply().to_vec(),
            demand: problem.demand().to_vec(),
        }
    }

    pub fn row_open(&self, i: usize) -> bool {
        self.supply[i] > TRANSPORT_TOLERANCE
    }

    pub fn col_open(&self, j: usize) -> bool {
        self.demand[j] > TRANSPORT_TOLERANCE
    }

    pub fn open_rows(&self) -> Vec<usize> {
        (0..self.supply.len()).filter(|&i| self.row_open(i)).collect()
    }

    pub fn open_cols(&self) -> Vec<usize> {
        (0..self.demand.len()).filter(|&j| self.col_open(j)).collect()
    }

    /// Ships as much as possible through `(i, j)` and closes whichever side
    /// runs out.
    pub fn ship(&mut self, allocation: &mut Matrix, i: usize, j: usize) -> f64 {
        let q = self.supply[i].min(self.demand[j]);
        allocation.set(i, j, allocation.get(i, j) + q);
        self.supply[i] -= q;
        self.demand[j] -= q;
        if self.supply[i] <= TRANSPORT_TOLERANCE {
            self.supply[i] = 0.0;
        }
        if self.demand[j] <= TRANSPORT_TOLERANCE {
            self.demand[j] = 0.0;
        }
        q
    }

    /// Cheapest open cell, first in row-major order on ties.
    pub fn cheapest_open_cell(&self, costs: &Matrix) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f64)> = None;
        for i in self.open_rows() {
            for j in self.open_cols() {
                let c = costs.get(i, j);
                if best.map_or(true, |(_, b)| c < b) {
                    best = Some(((i, j), c));
                }
            }
        }
        best.map(|(cell, _)| cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransportationProblem {
        TransportationProblem::new(
            vec![20.0, 30.0],
            vec![10.0, 40.0],
            vec![vec![2.0, 3.0], vec![4.0, 1.0]],
        )
        .expect("valid")
    }

    #[test]
    fn test_valid_problem() {
        let p = sample();
        assert_eq!(p.num_sources(), 2);
        assert_eq!(p.num_destinations(), 2);
        assert_eq!(p.costs().get(1, 1), 1.0);
    }

    #[test]
    fn test_unbalanced_rejected() {
        let err = TransportationProblem::new(vec![10.0, 5.0], vec![20.0], vec![vec![1.0], vec![2.0]])
            .unwrap_err();
        assert_eq!(
            err,
            SolveError::Unbalanced {
                supply: 15.0,
                demand: 20.0
            }
        );
    }

    #[test]
    fn test_balance_within_tolerance() {
        assert!(TransportationProblem::new(vec![10.00005], vec![10.0], vec![vec![1.0]]).is_ok());
    }

    #[test]
    fn test_missing_cost_rejected() {
        let err = TransportationProblem::new(
            vec![10.0, 10.0],
            vec![20.0],
            vec![vec![1.0], vec![f64::NAN]],
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::NonFinite { .. }));

        let err = TransportationProblem::new(vec![10.0], vec![5.0, 5.0], vec![vec![1.0]]).unwrap_err();
        assert_eq!(err, SolveError::dimension("cost matrix row 1", 2, 1));
    }

    #[test]
    fn test_negative_or_empty_rejected() {
        assert!(TransportationProblem::new(vec![], vec![], vec![]).is_err());
        assert!(TransportationProblem::new(vec![-1.0, 2.0], vec![1.0], vec![vec![1.0], vec![1.0]]).is_err());
    }

    #[test]
    fn test_remaining_ship() {
        let p = sample();
        let mut rem = Remaining::new(&p);
        let mut alloc = Matrix::zeros(2, 2);
        assert_eq!(rem.ship(&mut alloc, 0, 0), 10.0);
        assert!(!rem.col_open(0));
        assert!(rem.row_open(0));
        assert_eq!(rem.open_cols(), vec![1]);
        assert_eq!(rem.cheapest_open_cell(p.costs()), Some((1, 1)));
    }

    #[test]
    fn test_cost_and_balance() {
        let p = sample();
        let alloc = Matrix::from_rows(&[vec![10.0, 10.0], vec![0.0, 30.0]]).expect("valid");
        assert_eq!(p.total_cost(&alloc), 20.0 + 30.0 + 30.0);
        assert!(p.is_balanced_allocation(&alloc, 1e-4));
        let bad = Matrix::from_rows(&[vec![10.0, 0.0], vec![0.0, 30.0]]).expect("valid");
        assert!(!p.is_balanced_allocation(&bad, 1e-4));
    }
}
