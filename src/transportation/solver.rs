//! Full transportation pipeline: three initial heuristics, then MODI from
//! the cheapest start.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SolveError, SolveResult};
use crate::matrix::Matrix;

use super::least_cost::least_cost;
use super::modi::{modi_optimize, ModiConfig, ModiStep, ModiTermination};
use super::northwest::northwest_corner;
use super::problem::{InitialMethod, InitialSolution, TransportationProblem};
use super::vogel::vogel;

/// Optimized allocation produced by MODI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalTransport {
    /// Final allocation.
    pub allocation: Matrix,
    /// Final total cost.
    pub cost: f64,
    /// Heuristic whose allocation MODI started from.
    pub started_from: InitialMethod,
    /// Pivot history.
    pub steps: Vec<ModiStep>,
    /// Stop reason.
    pub termination: ModiTermination,
}

/// Everything [`solve_transportation`] computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationSolution {
    /// Northwest-Corner, Least-Cost and Vogel results, in that order.
    pub initial_solutions: Vec<InitialSolution>,
    /// MODI result.
    pub optimal: OptimalTransport,
}

impl TransportationSolution {
    /// The initial solution produced by `method`.
    pub fn initial(&self, method: InitialMethod) -> Option<&InitialSolution> {
        self.initial_solutions.iter().find(|s| s.method == method)
    }
}

/// Runs all three initial heuristics, picks the cheapest (earlier method on
/// ties) and optimizes it with MODI.
///
/// # Errors
///
/// [`SolveError::NonFinite`] if a computed cost overflows.
///
/// # Examples
///
/// ```
/// use u_mathprog::transportation::{solve_transportation, ModiConfig, TransportationProblem};
///
/// let p = TransportationProblem::new(
///     vec![300.0, 400.0, 500.0],
///     vec![250.0, 350.0, 400.0, 200.0],
///     vec![
///         vec![3.0, 1.0, 7.0, 4.0],
///         vec![2.0, 6.0, 5.0, 9.0],
///         vec![8.0, 3.0, 3.0, 2.0],
///     ],
/// )
/// .unwrap();
/// let s = solve_transportation(&p, &ModiConfig::default()).unwrap();
/// assert_eq!(s.initial_solutions[0].cost, 4400.0);
/// assert_eq!(s.optimal.cost, 2850.0);
/// ```
pub fn solve_transportation(
    problem: &TransportationProblem,
    config: &ModiConfig,
) -> SolveResult<TransportationSolution> {
    let initial_solutions = vec![northwest_corner(problem), least_cost(problem), vogel(problem)];
    for s in &initial_solutions {
        if !s.cost.is_finite() {
            return Err(SolveError::non_finite(format!("{:?} allocation cost", s.method)));
        }
        debug!(method = ?s.method, cost = s.cost, "initial solution");
    }

    let mut best = &initial_solutions[0];
    for s in &initial_solutions[1..] {
        if s.cost < best.cost {
            best = s;
        }
    }

    let result = modi_optimize(problem, &best.allocation, config);
    if !result.cost.is_finite() {
        return Err(SolveError::non_finite("optimized allocation cost"));
    }

    let optimal = OptimalTransport {
        allocation: result.allocation,
        cost: result.cost,
        started_from: best.method,
        steps: result.steps,
        termination: result.termination,
    };
    Ok(TransportationSolution {
        initial_solutions,
        optimal,
    })
}
