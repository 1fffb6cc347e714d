//! Branch-and-bound for (mixed) integer linear programs.
//!
//! # Algorithm
//!
//! Breadth-first over a FIFO queue of nodes, each carrying per-variable
//! bounds. For every node:
//!
//! 1. Solve the LP relaxation under the node's bounds (corner points for two
//!    variables, Big-M simplex otherwise).
//! 2. Prune (mark infeasible) if the relaxation is infeasible or its value
//!    does not exceed the incumbent.
//! 3. If every integer variable is integral, the point becomes the new
//!    incumbent.
//! 4. Otherwise branch on the first fractional integer variable: a child
//!    with `x_j <= floor` and a child with `x_j >= ceil`, in that order.
//!
//! Pruning compares against the incumbent only, not against sibling or
//! parent bounds.
//!
//! # Reference
//!
//! Land & Doig (1960), "An Automatic Method of Solving Discrete Programming Problems"

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{SolveError, SolveResult, SolveStatus};
use crate::linear::{solve_corner_points, solve_simplex, SimplexConfig};
use crate::models::{Constraint, LpProblem, Objective, ObjectiveSense, VariableBounds};

use super::tree::{BranchDecision, BranchDirection, NodeStatus, SearchTree};

/// Settings for [`branch_and_bound`].
///
/// # Examples
///
/// ```
/// use u_mathprog::integer::BranchAndBoundConfig;
///
/// let config = BranchAndBoundConfig::default().with_max_nodes(500);
/// assert_eq!(config.max_nodes, Some(500));
/// assert_eq!(config.integrality_tolerance, 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchAndBoundConfig {
    /// Distance from the nearest integer still treated as integral.
    pub integrality_tolerance: f64,
    /// Optional cap on processed nodes; `None` runs until the queue empties.
    pub max_nodes: Option<usize>,
    /// Settings for simplex relaxations (problems with more than two variables).
    pub simplex: SimplexConfig,
}

impl Default for BranchAndBoundConfig {
    fn default() -> Self {
        Self {
            integrality_tolerance: 1e-10,
            max_nodes: None,
            simplex: SimplexConfig::default(),
        }
    }
}

impl BranchAndBoundConfig {
    /// Sets the integrality tolerance.
    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }

    /// Caps the number of processed nodes.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Sets the simplex settings used for relaxations.
    pub fn with_simplex(mut self, simplex: SimplexConfig) -> Self {
        self.simplex = simplex;
        self
    }
}

/// A linear program with an integrality mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegerProgram {
    problem: LpProblem,
    integer: Vec<bool>,
}

impl IntegerProgram {
    /// Creates a program where `integer[j]` marks `x_j` as integer.
    pub fn new(problem: LpProblem, integer: Vec<bool>) -> SolveResult<Self> {
        if integer.len() != problem.num_vars() {
            return Err(SolveError::dimension("integrality mask", problem.num_vars(), integer.len()));
        }
        Ok(Self { problem, integer })
    }

    /// Creates a pure integer program.
    pub fn all_integer(problem: LpProblem) -> Self {
        let integer = vec![true; problem.num_vars()];
        Self { problem, integer }
    }

    /// `maximize 2x1 + 3x2` subject to `6x1 + 5x2 <= 25`, `x1 + 3x2 <= 10`,
    /// integer `x >= 0`.
    pub fn reference_scenario() -> SolveResult<Self> {
        let problem = LpProblem::new(
            Objective::maximize(vec![2.0, 3.0]),
            vec![
                Constraint::le(vec![6.0, 5.0], 25.0),
                Constraint::le(vec![1.0, 3.0], 10.0),
            ],
        )?;
        Ok(Self::all_integer(problem))
    }

    /// The underlying linear program.
    pub fn problem(&self) -> &LpProblem {
        &self.problem
    }

    /// Integrality mask.
    pub fn integer(&self) -> &[bool] {
        &self.integer
    }
}

/// One solved node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLog {
    /// Node id in the search tree.
    pub node_id: usize,
    /// Relaxed solution.
    pub solution: Vec<f64>,
    /// Relaxation objective in the problem's own sense.
    pub value: f64,
}

/// Result of [`branch_and_bound`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchAndBoundResult {
    /// `Optimal`, `Infeasible` (no integer point), `Unbounded` (relaxation
    /// unbounded) or `NotConverged` (node cap or relaxation cap hit).
    pub status: SolveStatus,
    /// Best integer solution found.
    pub solution: Option<Vec<f64>>,
    /// Its objective value.
    pub objective_value: Option<f64>,
    /// Full search tree.
    pub tree: SearchTree,
    /// Solved nodes in processing order.
    pub iterations: Vec<NodeLog>,
}

enum Relaxation {
    Solved { solution: Vec<f64>, value: f64 },
    Infeasible,
    Unbounded,
    NotConverged,
}

/// Solves `program` by LP-based branch-and-bound.
///
/// # Examples
///
/// ```
/// use u_mathprog::error::SolveStatus;
/// use u_mathprog::integer::{branch_and_bound, BranchAndBoundConfig, IntegerProgram};
///
/// let program = IntegerProgram::reference_scenario().unwrap();
/// let result = branch_and_bound(&program, &BranchAndBoundConfig::default()).unwrap();
/// assert_eq!(result.status, SolveStatus::Optimal);
/// assert_eq!(result.solution, Some(vec![1.0, 3.0]));
/// assert_eq!(result.objective_value, Some(11.0));
/// ```
pub fn branch_and_bound(
    program: &IntegerProgram,
    config: &BranchAndBoundConfig,
) -> SolveResult<BranchAndBoundResult> {
    let problem = program.problem();
    let sense = problem.objective().sense();
    let sign = match sense {
        ObjectiveSense::Maximize => 1.0,
        ObjectiveSense::Minimize => -1.0,
    };
    let max_objective = problem.objective().as_maximization();
    let tol = config.integrality_tolerance;

    let mut tree = SearchTree::with_root(vec![VariableBounds::default(); problem.num_vars()]);
    let mut queue = VecDeque::from([0usize]);
    let mut iterations = Vec::new();
    let mut incumbent: Option<(Vec<f64>, f64)> = None;
    let mut processed = 0usize;
    let mut interrupted = false;
    let mut unbounded = false;

    debug!(vars = problem.num_vars(), constraints = problem.num_constraints(), "starting branch-and-bound");

    while let Some(id) = queue.pop_front() {
        if config.max_nodes.is_some_and(|cap| processed >= cap) {
            warn!(processed, "branch-and-bound stopped at the node cap");
            interrupted = true;
            break;
        }
        processed += 1;

        let Some(bounds) = tree.node(id).map(|n| n.bounds.clone()) else {
            continue;
        };
        let relaxation = solve_relaxation(problem, &max_objective, &bounds, &config.simplex)?;
        let Some(node) = tree.node_mut(id) else {
            continue;
        };

        let (solution, value) = match relaxation {
            Relaxation::Solved { solution, value } => (solution, value),
            Relaxation::Infeasible => {
                trace!(node = id, "relaxation infeasible");
                node.status = NodeStatus::Infeasible;
                continue;
            }
            Relaxation::Unbounded => {
                debug!(node = id, "relaxation unbounded");
                unbounded = true;
                break;
            }
            Relaxation::NotConverged => {
                warn!(node = id, "relaxation hit the pivot cap");
                interrupted = true;
                continue;
            }
        };

        node.solution = Some(solution.clone());
        node.objective_value = Some(sign * value);
        iterations.push(NodeLog {
            node_id: id,
            solution: solution.clone(),
            value: sign * value,
        });

        if incumbent.as_ref().is_some_and(|(_, best)| value <= *best) {
            trace!(node = id, value, "pruned by bound");
            node.status = NodeStatus::Infeasible;
            continue;
        }

        let fractional = solution
            .iter()
            .zip(program.integer())
            .position(|(&x, &is_int)| is_int && (x - x.round()).abs() > tol);

        match fractional {
            None => {
                trace!(node = id, value, "new incumbent");
                node.status = NodeStatus::Optimal;
                incumbent = Some((snap_integers(&solution, program.integer()), value));
            }
            Some(j) => {
                node.status = NodeStatus::Bounded;
                let x = solution[j];
                trace!(node = id, variable = j, x, "branching");
                for (direction, threshold) in [(BranchDirection::Down, x.floor()), (BranchDirection::Up, x.ceil())] {
                    let decision = BranchDecision {
                        variable: j,
                        direction,
                        threshold,
                    };
                    // A child that would re-solve its parent's region never terminates.
                    if decision.apply(&bounds) == bounds {
                        warn!(node = id, %decision, "branch leaves bounds unchanged, skipped");
                        continue;
                    }
                    queue.push_back(tree.add_child(id, decision));
                }
            }
        }
    }

    let status = if unbounded {
        SolveStatus::Unbounded
    } else if interrupted {
        SolveStatus::NotConverged
    } else if incumbent.is_some() {
        SolveStatus::Optimal
    } else {
        SolveStatus::Infeasible
    };

    let (solution, objective_value) = match incumbent {
        Some((x, _)) if !unbounded => {
            let value = problem.objective().value(&x);
            if !value.is_finite() {
                return Err(SolveError::non_finite("integer objective value"));
            }
            (Some(x), Some(value))
        }
        _ => (None, None),
    };

    debug!(?status, nodes = tree.len(), "branch-and-bound finished");
    Ok(BranchAndBoundResult {
        status,
        solution,
        objective_value,
        tree,
        iterations,
    })
}

/// Maximizes `objective` over the problem's constraints and `bounds`.
fn solve_relaxation(
    problem: &LpProblem,
    objective: &[f64],
    bounds: &[VariableBounds],
    simplex: &SimplexConfig,
) -> SolveResult<Relaxation> {
    if bounds.iter().any(VariableBounds::is_empty) {
        return Ok(Relaxation::Infeasible);
    }

    if problem.num_vars() == 2 {
        let result = solve_corner_points(objective, problem.constraints(), bounds)?;
        return Ok(match (result.status, result.solution, result.objective_value) {
            (SolveStatus::Optimal, Some(solution), Some(value)) => Relaxation::Solved { solution, value },
            (SolveStatus::Unbounded, ..) => Relaxation::Unbounded,
            _ => Relaxation::Infeasible,
        });
    }

    let mut constraints = problem.constraints().to_vec();
    for (j, b) in bounds.iter().enumerate() {
        let mut unit = vec![0.0; bounds.len()];
        unit[j] = 1.0;
        if b.lower > 0.0 {
            constraints.push(Constraint::ge(unit.clone(), b.lower));
        }
        if let Some(upper) = b.upper {
            constraints.push(Constraint::le(unit, upper));
        }
    }
    let relaxed = LpProblem::new(Objective::maximize(objective.to_vec()), constraints)?;
    let outcome = solve_simplex(&relaxed, simplex)?;

    Ok(match outcome.status {
        SolveStatus::Optimal if !outcome.is_feasible() => Relaxation::Infeasible,
        SolveStatus::Optimal => match (outcome.solution, outcome.objective_value) {
            (Some(solution), Some(value)) => Relaxation::Solved { solution, value },
            _ => Relaxation::Infeasible,
        },
        SolveStatus::Unbounded => Relaxation::Unbounded,
        SolveStatus::NotConverged => Relaxation::NotConverged,
        SolveStatus::Infeasible => Relaxation::Infeasible,
    })
}

/// Rounds integer variables to their nearest integer (normalizing `-0.0`).
fn snap_integers(solution: &[f64], integer: &[bool]) -> Vec<f64> {
    solution
        .iter()
        .zip(integer)
        .map(|(&x, &is_int)| {
            if !is_int {
                return x;
            }
            let r = x.round();
            if r == 0.0 {
                0.0
            } else {
                r
            }
        })
        .collect()
}
