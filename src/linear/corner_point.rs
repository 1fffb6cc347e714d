//! Corner-point (vertex enumeration) solver for two-variable LPs.
//!
//! # Algorithm
//!
//! Every constraint and every finite variable bound defines a line in the
//! plane. Candidate vertices are the pairwise intersections of those lines
//! (which include the origin, the axis intercepts and the constraint/bound
//! crossings). Candidates outside the bounds or violating any constraint are
//! discarded, and the objective is maximized over the remaining vertices.
//!
//! For an unbounded region the recession directions are checked as well:
//! in two dimensions the extreme rays of the recession cone run along
//! boundary lines, so testing both directions of every line is exact.
//!
//! # Complexity
//!
//! O(L² · m) where L = constraints + finite bounds and m = constraints.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ensure_finite, SolveError, SolveResult, SolveStatus};
use crate::models::{Constraint, ConstraintSign, LpProblem, ObjectiveSense, VariableBounds};

/// Tolerance for parallel-line detection and feasibility checks.
pub const CORNER_TOLERANCE: f64 = 1e-10;

/// Vertices closer than this are reported once.
const DUPLICATE_TOLERANCE: f64 = 1e-9;

/// Result of a corner-point solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerPointResult {
    /// Outcome of the solve.
    pub status: SolveStatus,
    /// Best vertex, if the status is optimal.
    pub solution: Option<Vec<f64>>,
    /// Objective at the best vertex, in the sense requested by the caller.
    pub objective_value: Option<f64>,
    /// All feasible vertices found, without duplicates.
    pub corner_points: Vec<Vec<f64>>,
}

impl CornerPointResult {
    fn failed(status: SolveStatus, corner_points: Vec<Vec<f64>>) -> Self {
        Self {
            status,
            solution: None,
            objective_value: None,
            corner_points,
        }
    }
}

/// Line `a · x = b` in the plane.
#[derive(Debug, Clone, Copy)]
struct Line {
    a: [f64; 2],
    b: f64,
}

impl Line {
    fn intersect(&self, other: &Line) -> Option<[f64; 2]> {
        let det = self.a[0] * other.a[1] - self.a[1] * other.a[0];
        if det.abs() < CORNER_TOLERANCE {
            return None;
        }
        let x = (self.b * other.a[1] - other.b * self.a[1]) / det;
        let y = (self.a[0] * other.b - other.a[0] * self.b) / det;
        Some([x, y])
    }

    /// Unit direction along the line, `None` for a degenerate `0 = b` row.
    fn direction(&self) -> Option<[f64; 2]> {
        let norm = self.a[0].hypot(self.a[1]);
        if norm < CORNER_TOLERANCE {
            return None;
        }
        Some([-self.a[1] / norm, self.a[0] / norm])
    }
}

/// Maximizes `objective · x` over a two-variable region.
///
/// `bounds` holds one interval per variable. The caller negates the objective
/// to minimize; the returned `objective_value` is always `objective · x`.
///
/// Returns [`SolveStatus::Infeasible`] when no candidate vertex is feasible
/// and [`SolveStatus::Unbounded`] when the objective grows along a feasible
/// recession direction.
///
/// # Examples
///
/// ```
/// use u_mathprog::linear::solve_corner_points;
/// use u_mathprog::models::{Constraint, VariableBounds};
///
/// let constraints = vec![
///     Constraint::le(vec![1.0, 1.0], 4.0),
///     Constraint::le(vec![1.0, 0.0], 3.0),
/// ];
/// let bounds = [VariableBounds::default(); 2];
/// let result = solve_corner_points(&[3.0, 2.0], &constraints, &bounds).unwrap();
/// assert_eq!(result.solution, Some(vec![3.0, 1.0]));
/// assert!((result.objective_value.unwrap() - 11.0).abs() < 1e-10);
/// ```
pub fn solve_corner_points(
    objective: &[f64],
    constraints: &[Constraint],
    bounds: &[VariableBounds],
) -> SolveResult<CornerPointResult> {
    validate(objective, constraints, bounds)?;

    let mut lines: Vec<Line> = constraints
        .iter()
        .map(|c| Line {
            a: [c.coefficients[0], c.coefficients[1]],
            b: c.rhs,
        })
        .collect();
    for (j, bound) in bounds.iter().enumerate() {
        let mut a = [0.0; 2];
        a[j] = 1.0;
        lines.push(Line { a, b: bound.lower });
        if let Some(upper) = bound.upper {
            lines.push(Line { a, b: upper });
        }
    }

    let mut corner_points: Vec<Vec<f64>> = Vec::new();
    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            let Some(point) = lines[i].intersect(&lines[j]) else {
                continue;
            };
            if !is_point_feasible(&point, constraints, bounds) {
                continue;
            }
            let duplicate = corner_points.iter().any(|p| {
                (p[0] - point[0]).abs() < DUPLICATE_TOLERANCE
                    && (p[1] - point[1]).abs() < DUPLICATE_TOLERANCE
            });
            if !duplicate {
                trace!(x1 = point[0], x2 = point[1], "feasible corner point");
                corner_points.push(point.to_vec());
            }
        }
    }

    if corner_points.is_empty() {
        debug!(lines = lines.len(), "no feasible corner point");
        return Ok(CornerPointResult::failed(SolveStatus::Infeasible, corner_points));
    }

    if has_improving_ray(objective, &lines, constraints, bounds) {
        debug!("objective improves along a feasible ray");
        return Ok(CornerPointResult::failed(SolveStatus::Unbounded, corner_points));
    }

    let mut best: Option<(usize, f64)> = None;
    for (idx, point) in corner_points.iter().enumerate() {
        let value = objective[0] * point[0] + objective[1] * point[1];
        if best.map_or(true, |(_, v)| value > v) {
            best = Some((idx, value));
        }
    }

    Ok(match best {
        Some((idx, value)) => CornerPointResult {
            status: SolveStatus::Optimal,
            solution: Some(corner_points[idx].clone()),
            objective_value: Some(value),
            corner_points,
        },
        None => CornerPointResult::failed(SolveStatus::Infeasible, corner_points),
    })
}

/// Solves a two-variable [`LpProblem`] graphically, honoring its sense.
///
/// Variables get the default `[0, ∞)` bounds. Fails with
/// [`SolveError::InvalidInput`] unless the problem has exactly two variables.
///
/// # Examples
///
/// ```
/// use u_mathprog::linear::solve_graphical;
/// use u_mathprog::models::{Constraint, LpProblem, Objective};
///
/// let lp = LpProblem::new(
///     Objective::minimize(vec![2.0, 3.0]),
///     vec![Constraint::ge(vec![1.0, 1.0], 4.0)],
/// )
/// .unwrap();
/// let result = solve_graphical(&lp).unwrap();
/// assert_eq!(result.solution, Some(vec![4.0, 0.0]));
/// assert!((result.objective_value.unwrap() - 8.0).abs() < 1e-10);
/// ```
pub fn solve_graphical(problem: &LpProblem) -> SolveResult<CornerPointResult> {
    let objective = problem.objective();
    let mut result = solve_corner_points(
        &objective.as_maximization(),
        problem.constraints(),
        &[VariableBounds::default(); 2][..problem.num_vars().min(2)],
    )?;
    if objective.sense() == ObjectiveSense::Minimize {
        result.objective_value = result.objective_value.map(|v| -v);
    }
    Ok(result)
}

fn validate(
    objective: &[f64],
    constraints: &[Constraint],
    bounds: &[VariableBounds],
) -> SolveResult<()> {
    if objective.len() != 2 {
        return Err(SolveError::invalid(format!(
            "corner-point method needs exactly 2 variables, got {}",
            objective.len()
        )));
    }
    if bounds.len() != 2 {
        return Err(SolveError::dimension("variable bounds", 2, bounds.len()));
    }
    ensure_finite(objective, "objective coefficients")?;
    for (i, c) in constraints.iter().enumerate() {
        if c.coefficients.len() != 2 {
            return Err(SolveError::dimension(
                format!("constraint {}", i + 1),
                2,
                c.coefficients.len(),
            ));
        }
        ensure_finite(&c.coefficients, "constraint coefficients")?;
        ensure_finite(&[c.rhs], "constraint right-hand side")?;
    }
    for b in bounds {
        ensure_finite(&[b.lower], "variable lower bound")?;
        if let Some(u) = b.upper {
            ensure_finite(&[u], "variable upper bound")?;
        }
    }
    Ok(())
}

fn is_point_feasible(point: &[f64; 2], constraints: &[Constraint], bounds: &[VariableBounds]) -> bool {
    bounds
        .iter()
        .zip(point)
        .all(|(b, &v)| b.contains(v, CORNER_TOLERANCE))
        && constraints
            .iter()
            .all(|c| c.is_satisfied(point, CORNER_TOLERANCE))
}

fn is_recession_direction(d: &[f64; 2], constraints: &[Constraint], bounds: &[VariableBounds]) -> bool {
    let bounds_ok = bounds.iter().zip(d).all(|(b, &dj)| {
        let upper_ok = b.upper.is_none() || dj <= CORNER_TOLERANCE;
        dj >= -CORNER_TOLERANCE && upper_ok
    });
    bounds_ok
        && constraints.iter().all(|c| {
            let ad = c.coefficients[0] * d[0] + c.coefficients[1] * d[1];
            match c.sign {
                ConstraintSign::LessEqual => ad <= CORNER_TOLERANCE,
                ConstraintSign::GreaterEqual => ad >= -CORNER_TOLERANCE,
                ConstraintSign::Equal => ad.abs() <= CORNER_TOLERANCE,
            }
        })
}

fn has_improving_ray(
    objective: &[f64],
    lines: &[Line],
    constraints: &[Constraint],
    bounds: &[VariableBounds],
) -> bool {
    lines.iter().filter_map(Line::direction).any(|d| {
        [d, [-d[0], -d[1]]].iter().any(|dir| {
            objective[0] * dir[0] + objective[1] * dir[1] > CORNER_TOLERANCE
                && is_recession_direction(dir, constraints, bounds)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Objective;

    fn default_bounds() -> [VariableBounds; 2] {
        [VariableBounds::default(); 2]
    }

    #[test]
    fn test_reference_lp() {
        // maximize 3x1 + 2x2 s.t. x1 + x2 <= 4, x1 <= 3
        let constraints = vec![
            Constraint::le(vec![1.0, 1.0], 4.0),
            Constraint::le(vec![1.0, 0.0], 3.0),
        ];
        let r = solve_corner_points(&[3.0, 2.0], &constraints, &default_bounds()).expect("valid");
        assert_eq!(r.status, SolveStatus::Optimal);
        let x = r.solution.expect("optimal");
        assert!((x[0] - 3.0).abs() < 1e-10);
        assert!((x[1] - 1.0).abs() < 1e-10);
        assert!((r.objective_value.expect("optimal") - 11.0).abs() < 1e-10);
        // (0,0), (0,4), (3,0), (3,1)
        assert_eq!(r.corner_points.len(), 4);
    }

    #[test]
    fn test_branch_and_bound_relaxation() {
        // maximize 2x1 + 3x2 s.t. 6x1 + 5x2 <= 25, x1 + 3x2 <= 10
        let constraints = vec![
            Constraint::le(vec![6.0, 5.0], 25.0),
            Constraint::le(vec![1.0, 3.0], 10.0),
        ];
        let r = solve_corner_points(&[2.0, 3.0], &constraints, &default_bounds()).expect("valid");
        let x = r.solution.expect("optimal");
        // Intersection: x1 = 25/13, x2 = 35/13
        assert!((x[0] - 25.0 / 13.0).abs() < 1e-9);
        assert!((x[1] - 35.0 / 13.0).abs() < 1e-9);
        assert!((r.objective_value.expect("optimal") - 155.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_tighten_region() {
        let constraints = vec![Constraint::le(vec![1.0, 1.0], 4.0)];
        let bounds = [
            VariableBounds::new(0.0, Some(1.0)),
            VariableBounds::new(2.0, None),
        ];
        let r = solve_corner_points(&[1.0, 0.5], &constraints, &bounds).expect("valid");
        // Vertices: (0,2), (1,2), (1,3), (0,4) -> best is (1,3) with 2.5
        assert_eq!(r.solution, Some(vec![1.0, 3.0]));
        assert!((r.objective_value.expect("optimal") - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_infeasible() {
        let constraints = vec![
            Constraint::le(vec![1.0, 1.0], 2.0),
            Constraint::ge(vec![1.0, 1.0], 5.0),
        ];
        let r = solve_corner_points(&[1.0, 1.0], &constraints, &default_bounds()).expect("valid");
        assert_eq!(r.status, SolveStatus::Infeasible);
        assert!(r.solution.is_none());
        assert!(r.objective_value.is_none());
    }

    #[test]
    fn test_empty_bounds_infeasible() {
        let constraints = vec![Constraint::le(vec![1.0, 1.0], 10.0)];
        let bounds = [VariableBounds::new(3.0, Some(2.0)), VariableBounds::default()];
        let r = solve_corner_points(&[1.0, 1.0], &constraints, &bounds).expect("valid");
        assert_eq!(r.status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_large_rhs_gap_is_infeasible() {
        // The two rows leave a 5e-5 gap, far above the 1e-10 tolerance.
        let constraints = vec![
            Constraint::le(vec![1.0, 1.0], 1e6),
            Constraint::ge(vec![1.0, 1.0], 1e6 + 5e-5),
        ];
        let r = solve_corner_points(&[1.0, 0.0], &constraints, &default_bounds()).expect("valid");
        assert_eq!(r.status, SolveStatus::Infeasible);
        assert!(r.corner_points.is_empty());
    }

    #[test]
    fn test_bound_tolerance_is_absolute() {
        // x1 = 3 - 2e-10 sits 2e-10 below the lower bound of 3.
        let constraints = vec![Constraint::le(vec![1.0, 0.0], 3.0 - 2e-10)];
        let bounds = [VariableBounds::new(3.0, None), VariableBounds::new(0.0, Some(1.0))];
        let r = solve_corner_points(&[1.0, 1.0], &constraints, &bounds).expect("valid");
        assert_eq!(r.status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        let constraints = vec![Constraint::ge(vec![1.0, 1.0], 2.0)];
        let r = solve_corner_points(&[1.0, 1.0], &constraints, &default_bounds()).expect("valid");
        assert_eq!(r.status, SolveStatus::Unbounded);
        assert!(r.solution.is_none());
    }

    #[test]
    fn test_unbounded_region_bounded_objective() {
        // Region is unbounded but minimizing x1 + x2 (maximizing the negation) is not.
        let constraints = vec![Constraint::ge(vec![1.0, 1.0], 2.0)];
        let r = solve_corner_points(&[-1.0, -1.0], &constraints, &default_bounds()).expect("valid");
        assert_eq!(r.status, SolveStatus::Optimal);
        assert!((r.objective_value.expect("optimal") + 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_parallel_lines_skipped() {
        let constraints = vec![
            Constraint::le(vec![1.0, 1.0], 4.0),
            Constraint::le(vec![2.0, 2.0], 10.0),
        ];
        let r = solve_corner_points(&[1.0, 2.0], &constraints, &default_bounds()).expect("valid");
        assert_eq!(r.solution, Some(vec![0.0, 4.0]));
    }

    #[test]
    fn test_equality_constraint() {
        let constraints = vec![
            Constraint::eq(vec![1.0, 1.0], 3.0),
            Constraint::le(vec![1.0, 0.0], 2.0),
        ];
        let r = solve_corner_points(&[2.0, 1.0], &constraints, &default_bounds()).expect("valid");
        assert_eq!(r.solution, Some(vec![2.0, 1.0]));
    }

    #[test]
    fn test_rejects_wrong_dimension() {
        let constraints = vec![Constraint::le(vec![1.0, 1.0, 1.0], 4.0)];
        let err = solve_corner_points(&[1.0, 1.0, 1.0], &constraints, &default_bounds()).unwrap_err();
        assert!(matches!(err, SolveError::InvalidInput { .. }));

        let err = solve_corner_points(&[1.0, 1.0], &constraints, &default_bounds()).unwrap_err();
        assert_eq!(err, SolveError::dimension("constraint 1", 2, 3));
    }

    #[test]
    fn test_graphical_minimize() {
        let lp = LpProblem::new(
            Objective::minimize(vec![2.0, 3.0]),
            vec![
                Constraint::ge(vec![1.0, 1.0], 4.0),
                Constraint::ge(vec![0.0, 1.0], 1.0),
            ],
        )
        .expect("valid");
        let r = solve_graphical(&lp).expect("valid");
        assert_eq!(r.status, SolveStatus::Optimal);
        assert_eq!(r.solution, Some(vec![3.0, 1.0]));
        assert!((r.objective_value.expect("optimal") - 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_graphical_rejects_three_vars() {
        let lp = LpProblem::new(
            Objective::maximize(vec![1.0, 1.0, 1.0]),
            vec![Constraint::le(vec![1.0, 1.0, 1.0], 1.0)],
        )
        .expect("valid");
        assert!(matches!(
            solve_graphical(&lp),
            Err(SolveError::InvalidInput { .. })
        ));
    }
}
