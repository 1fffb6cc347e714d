//! Big-M simplex driver.
//!
//! Repeats Dantzig pivoting (most negative reduced cost, minimum ratio) on a
//! [`Tableau`] until no entering column remains, no leaving row exists, or
//! the pivot cap is reached. No anti-cycling rule is applied; the cap is
//! the only guard against cycling on degenerate tableaus.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{SolveError, SolveResult, SolveStatus};
use crate::matrix::Matrix;
use crate::models::LpProblem;

use super::tableau::{ColumnKind, Tableau};

/// Tunables of the simplex engine.
///
/// # Examples
///
/// ```
/// use u_mathprog::linear::SimplexConfig;
///
/// let config = SimplexConfig::default().with_max_iterations(50);
/// assert_eq!(config.big_m, 1000.0);
/// assert_eq!(config.max_iterations, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplexConfig {
    /// Penalty applied to artificial variables.
    pub big_m: f64,
    /// Maximum number of pivots.
    pub max_iterations: usize,
    /// Threshold for reduced costs and pivot entries.
    pub tolerance: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            big_m: 1000.0,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl SimplexConfig {
    /// Sets the Big-M penalty.
    pub fn with_big_m(mut self, big_m: f64) -> Self {
        self.big_m = big_m;
        self
    }

    /// Sets the pivot cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the numeric tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// One pivot of a simplex run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplexIteration {
    /// 1-based pivot number.
    pub iteration: usize,
    /// Leaving row.
    pub pivot_row: usize,
    /// Entering column.
    pub pivot_column: usize,
    /// Role of the entering column.
    pub entering: ColumnKind,
    /// Objective value after the pivot (Big-M penalty included).
    pub objective_value: f64,
    /// Tableau after the pivot.
    pub tableau: Matrix,
}

/// Result of a simplex run.
///
/// The engine itself only distinguishes optimal, unbounded and
/// not-converged runs. Whether an "optimal" tableau still carries a
/// positive artificial variable (an infeasible problem) is left to the
/// caller via [`SimplexOutcome::is_feasible`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplexOutcome {
    /// How the run ended.
    pub status: SolveStatus,
    /// Structural variable values, when optimal.
    pub solution: Option<Vec<f64>>,
    /// Objective value in the problem's sense, when optimal.
    pub objective_value: Option<f64>,
    /// Tableau before the first pivot.
    pub initial_tableau: Matrix,
    /// Every pivot performed.
    pub iterations: Vec<SimplexIteration>,
    /// Tableau at termination.
    pub final_tableau: Tableau,
    tolerance: f64,
}

impl SimplexOutcome {
    /// Returns `false` if an artificial variable is still basic at a
    /// positive value, meaning the input constraints cannot all hold.
    pub fn is_feasible(&self) -> bool {
        !self.final_tableau.has_positive_artificial(self.tolerance)
    }

    /// Number of pivots performed.
    pub fn num_iterations(&self) -> usize {
        self.iterations.len()
    }
}

/// Solves `problem` with the Big-M simplex method.
///
/// Fails only if the final objective value is not finite.
///
/// # Examples
///
/// ```
/// use u_mathprog::error::SolveStatus;
/// use u_mathprog::linear::{solve_simplex, SimplexConfig};
/// use u_mathprog::models::{Constraint, LpProblem, Objective};
///
/// let lp = LpProblem::new(
///     Objective::maximize(vec![3.0, 2.0]),
///     vec![Constraint::le(vec![1.0, 1.0], 4.0), Constraint::le(vec![1.0, 0.0], 3.0)],
/// )
/// .unwrap();
/// let outcome = solve_simplex(&lp, &SimplexConfig::default()).unwrap();
/// assert_eq!(outcome.status, SolveStatus::Optimal);
/// assert_eq!(outcome.solution, Some(vec![3.0, 1.0]));
/// assert!((outcome.objective_value.unwrap() - 11.0).abs() < 1e-9);
/// ```
pub fn solve_simplex(problem: &LpProblem, config: &SimplexConfig) -> SolveResult<SimplexOutcome> {
    let tol = config.tolerance;
    let mut tableau = Tableau::build(problem, config.big_m);
    let initial_tableau = tableau.matrix().clone();
    let mut iterations: Vec<SimplexIteration> = Vec::new();

    debug!(
        rows = tableau.num_rows(),
        columns = tableau.num_columns(),
        "starting simplex"
    );

    let status = loop {
        let Some(col) = tableau.pivot_column(tol) else {
            break SolveStatus::Optimal;
        };
        if iterations.len() >= config.max_iterations {
            warn!(
                max_iterations = config.max_iterations,
                "simplex stopped at the pivot cap"
            );
            break SolveStatus::NotConverged;
        }
        let Some(row) = tableau.pivot_row(col, tol) else {
            break SolveStatus::Unbounded;
        };
        tableau.pivot(row, col);
        let iteration = iterations.len() + 1;
        trace!(iteration, row, col, z = tableau.objective_value(), "pivot");
        iterations.push(SimplexIteration {
            iteration,
            pivot_row: row,
            pivot_column: col,
            entering: tableau.columns()[col],
            objective_value: tableau.objective_value(),
            tableau: tableau.matrix().clone(),
        });
    };

    let (solution, objective_value) = if status == SolveStatus::Optimal {
        let value = tableau.objective_value();
        if !value.is_finite() {
            return Err(SolveError::non_finite("simplex objective value"));
        }
        (Some(tableau.solution()), Some(value))
    } else {
        (None, None)
    };

    debug!(?status, pivots = iterations.len(), "simplex finished");

    Ok(SimplexOutcome {
        status,
        solution,
        objective_value,
        initial_tableau,
        iterations,
        final_tableau: tableau,
        tolerance: tol,
    })
}
