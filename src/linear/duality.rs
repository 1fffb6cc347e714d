//! Primal → dual transformation and strong-duality check.
//!
//! For a primal over non-negative variables `x`:
//!
//! | primal        | dual                                   |
//! |---------------|----------------------------------------|
//! | max / min     | min / max                              |
//! | rhs `b_i`     | objective coefficient of `y_i`         |
//! | column `j`    | constraint `Σ a_ij y_i (≥ if max, ≤ if min) c_j` |
//! | row sign      | sign restriction of `y_i` (see [`SignRestriction::for_row`]) |
//!
//! Both problems are solved with the simplex engine. Dual variables that are
//! non-positive or unrestricted are substituted (`y = -y'`, `y = y⁺ - y⁻`)
//! before solving and mapped back afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SolveError, SolveResult, SolveStatus};
use crate::models::{Constraint, ConstraintSign, LpProblem, Objective, ObjectiveSense};

use super::simplex::{solve_simplex, SimplexConfig, SimplexOutcome};

/// Primal and dual optimal values closer than this count as equal.
pub const DUALITY_TOLERANCE: f64 = 1e-3;

/// Sign restriction on a dual variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignRestriction {
    /// `y >= 0`
    NonNegative,
    /// `y <= 0`
    NonPositive,
    /// No restriction.
    Unrestricted,
}

impl SignRestriction {
    /// Restriction of the dual variable paired with a primal row of sign
    /// `sign` in a primal of sense `sense`.
    pub fn for_row(sense: ObjectiveSense, sign: ConstraintSign) -> Self {
        match (sense, sign) {
            (_, ConstraintSign::Equal) => Self::Unrestricted,
            (ObjectiveSense::Maximize, ConstraintSign::LessEqual)
            | (ObjectiveSense::Minimize, ConstraintSign::GreaterEqual) => Self::NonNegative,
            (ObjectiveSense::Maximize, ConstraintSign::GreaterEqual)
            | (ObjectiveSense::Minimize, ConstraintSign::LessEqual) => Self::NonPositive,
        }
    }
}

impl fmt::Display for SignRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonNegative => write!(f, ">= 0"),
            Self::NonPositive => write!(f, "<= 0"),
            Self::Unrestricted => write!(f, "unrestricted"),
        }
    }
}

/// The dual of a linear program.
///
/// `Display` renders the formulation, e.g.:
///
/// ```text
/// Minimize W = 4y1 + 12y2 + 18y3
/// subject to:
///   y1 + 3y3 >= 3
///   2y2 + 2y3 >= 5
/// y1 >= 0, y2 >= 0, y3 >= 0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualProblem {
    /// Objective over the dual variables `y`.
    pub objective: Objective,
    /// One constraint per primal variable.
    pub constraints: Vec<Constraint>,
    /// One restriction per dual variable.
    pub sign_restrictions: Vec<SignRestriction>,
}

impl DualProblem {
    /// Forms the dual of `primal`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_mathprog::linear::{DualProblem, SignRestriction};
    /// use u_mathprog::models::{Constraint, ConstraintSign, LpProblem, Objective, ObjectiveSense};
    ///
    /// let primal = LpProblem::new(
    ///     Objective::maximize(vec![3.0, 5.0]),
    ///     vec![Constraint::le(vec![1.0, 0.0], 4.0), Constraint::ge(vec![3.0, 2.0], 6.0)],
    /// )
    /// .unwrap();
    /// let dual = DualProblem::from_primal(&primal);
    /// assert_eq!(dual.objective.sense(), ObjectiveSense::Minimize);
    /// assert_eq!(dual.objective.coefficients(), &[4.0, 6.0]);
    /// assert_eq!(dual.constraints[1].coefficients, vec![0.0, 2.0]);
    /// assert_eq!(dual.constraints[1].sign, ConstraintSign::GreaterEqual);
    /// assert_eq!(
    ///     dual.sign_restrictions,
    ///     vec![SignRestriction::NonNegative, SignRestriction::NonPositive]
    /// );
    /// ```
    pub fn from_primal(primal: &LpProblem) -> Self {
        let sense = primal.objective().sense();
        let rows = primal.constraints();
        let sign = match sense {
            ObjectiveSense::Maximize => ConstraintSign::GreaterEqual,
            ObjectiveSense::Minimize => ConstraintSign::LessEqual,
        };

        let objective = Objective::new(rows.iter().map(|c| c.rhs).collect(), sense.flipped());
        let constraints = primal
            .objective()
            .coefficients()
            .iter()
            .enumerate()
            .map(|(j, &c_j)| {
                Constraint::new(rows.iter().map(|c| c.coefficients[j]).collect(), sign, c_j)
            })
            .collect();
        let sign_restrictions = rows
            .iter()
            .map(|c| SignRestriction::for_row(sense, c.sign))
            .collect();

        Self {
            objective,
            constraints,
            sign_restrictions,
        }
    }

    /// Number of dual variables.
    pub fn num_vars(&self) -> usize {
        self.sign_restrictions.len()
    }

    /// Rewrites the dual over non-negative variables only.
    fn to_standard_form(&self) -> SolveResult<(LpProblem, Vec<DualColumn>)> {
        let mut columns = Vec::new();
        for (i, r) in self.sign_restrictions.iter().enumerate() {
            match r {
                SignRestriction::NonNegative => columns.push(DualColumn { var: i, scale: 1.0 }),
                SignRestriction::NonPositive => columns.push(DualColumn { var: i, scale: -1.0 }),
                SignRestriction::Unrestricted => {
                    columns.push(DualColumn { var: i, scale: 1.0 });
                    columns.push(DualColumn { var: i, scale: -1.0 });
                }
            }
        }
        let expand = |coeffs: &[f64]| -> Vec<f64> {
            columns.iter().map(|c| c.scale * coeffs[c.var]).collect()
        };
        let objective = Objective::new(
            expand(self.objective.coefficients()),
            self.objective.sense(),
        );
        let constraints = self
            .constraints
            .iter()
            .map(|c| Constraint::new(expand(&c.coefficients), c.sign, c.rhs))
            .collect();
        let lp = LpProblem::new(objective, constraints)?;
        Ok((lp, columns))
    }
}

/// A standard-form column standing for `scale * y[var]`.
#[derive(Debug, Clone, Copy)]
struct DualColumn {
    var: usize,
    scale: f64,
}

impl fmt::Display for DualProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} W = {}",
            self.objective.sense(),
            format_terms(self.objective.coefficients(), "y")
        )?;
        writeln!(f, "subject to:")?;
        for c in &self.constraints {
            writeln!(f, "  {} {} {}", format_terms(&c.coefficients, "y"), c.sign, c.rhs)?;
        }
        let restrictions: Vec<String> = self
            .sign_restrictions
            .iter()
            .enumerate()
            .map(|(i, r)| format!("y{} {}", i + 1, r))
            .collect();
        write!(f, "{}", restrictions.join(", "))
    }
}

/// Renders `Σ coeff_i · {prefix}{i+1}`, skipping zero terms.
fn format_terms(coefficients: &[f64], prefix: &str) -> String {
    let mut out = String::new();
    for (i, &c) in coefficients.iter().enumerate() {
        if c == 0.0 {
            continue;
        }
        let magnitude = c.abs();
        let term = if magnitude == 1.0 {
            format!("{prefix}{}", i + 1)
        } else {
            format!("{magnitude}{prefix}{}", i + 1)
        };
        match (out.is_empty(), c < 0.0) {
            (true, false) => out.push_str(&term),
            (true, true) => out.push_str(&format!("-{term}")),
            (false, false) => out.push_str(&format!(" + {term}")),
            (false, true) => out.push_str(&format!(" - {term}")),
        }
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

/// Solution of one side (primal or dual) of a duality run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSolution {
    /// Outcome, with leftover artificials reported as infeasible.
    pub status: SolveStatus,
    /// Variable values, when optimal.
    pub solution: Option<Vec<f64>>,
    /// Objective value, when optimal.
    pub objective_value: Option<f64>,
    /// Number of simplex pivots.
    pub iterations: usize,
}

impl LinearSolution {
    fn from_outcome(outcome: &SimplexOutcome) -> Self {
        let status = if outcome.status == SolveStatus::Optimal && !outcome.is_feasible() {
            SolveStatus::Infeasible
        } else {
            outcome.status
        };
        let optimal = status == SolveStatus::Optimal;
        Self {
            status,
            solution: outcome.solution.clone().filter(|_| optimal),
            objective_value: outcome.objective_value.filter(|_| optimal),
            iterations: outcome.num_iterations(),
        }
    }
}

/// Primal and dual solutions plus the strong-duality check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualityReport {
    /// Primal solution.
    pub primal: LinearSolution,
    /// Dual formulation.
    pub dual_problem: DualProblem,
    /// Dual solution, in terms of the unsubstituted dual variables.
    pub dual: LinearSolution,
    /// `|primal - dual|` when both sides are optimal.
    pub duality_gap: Option<f64>,
    /// Whether both optimal values agree within [`DUALITY_TOLERANCE`].
    ///
    /// `false` is reported as-is; nothing is corrected.
    pub objectives_match: bool,
}

/// Forms the dual of `primal`, solves both, and compares the optima.
///
/// Fails if the primal has no constraints (its dual would have no
/// variables) or if a solve produces a non-finite objective.
///
/// # Examples
///
/// ```
/// use u_mathprog::linear::{solve_duality, SimplexConfig};
/// use u_mathprog::models::{Constraint, LpProblem, Objective};
///
/// let primal = LpProblem::new(
///     Objective::maximize(vec![3.0, 5.0]),
///     vec![
///         Constraint::le(vec![1.0, 0.0], 4.0),
///         Constraint::le(vec![0.0, 2.0], 12.0),
///         Constraint::le(vec![3.0, 2.0], 18.0),
///     ],
/// )
/// .unwrap();
/// let report = solve_duality(&primal, &SimplexConfig::default()).unwrap();
/// assert!(report.objectives_match);
/// assert!((report.dual.objective_value.unwrap() - 36.0).abs() < 1e-6);
/// ```
pub fn solve_duality(primal: &LpProblem, config: &SimplexConfig) -> SolveResult<DualityReport> {
    if primal.num_constraints() == 0 {
        return Err(SolveError::invalid("primal has no constraints to dualize"));
    }

    let dual_problem = DualProblem::from_primal(primal);
    debug!(
        primal_vars = primal.num_vars(),
        dual_vars = dual_problem.num_vars(),
        "solving primal and dual"
    );

    let primal_outcome = solve_simplex(primal, config)?;
    let primal_solution = LinearSolution::from_outcome(&primal_outcome);

    let (standard, columns) = dual_problem.to_standard_form()?;
    let dual_outcome = solve_simplex(&standard, config)?;
    let mut dual_solution = LinearSolution::from_outcome(&dual_outcome);
    dual_solution.solution = dual_solution.solution.map(|values| {
        let mut y = vec![0.0; dual_problem.num_vars()];
        for (col, v) in columns.iter().zip(values) {
            y[col.var] += col.scale * v;
        }
        y
    });

    for value in [primal_solution.objective_value, dual_solution.objective_value]
        .into_iter()
        .flatten()
    {
        if value.is_nan() {
            return Err(SolveError::non_finite("duality objective value"));
        }
    }

    let duality_gap = match (primal_solution.objective_value, dual_solution.objective_value) {
        (Some(p), Some(d)) => Some((p - d).abs()),
        _ => None,
    };
    let objectives_match = duality_gap.is_some_and(|gap| gap <= DUALITY_TOLERANCE);
    if let Some(gap) = duality_gap.filter(|_| !objectives_match) {
        warn!(gap, "primal and dual optima differ");
    }

    Ok(DualityReport {
        primal: primal_solution,
        dual_problem,
        dual: dual_solution,
        duality_gap,
        objectives_match,
    })
}
