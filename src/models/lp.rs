//! Linear program, objective and constraint types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, SolveError, SolveResult};

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveSense {
    /// Maximize the objective.
    Maximize,
    /// Minimize the objective.
    Minimize,
}

impl ObjectiveSense {
    /// The opposite sense (used when forming a dual).
    pub fn flipped(self) -> Self {
        match self {
            Self::Maximize => Self::Minimize,
            Self::Minimize => Self::Maximize,
        }
    }
}

impl fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Maximize => write!(f, "Maximize"),
            Self::Minimize => write!(f, "Minimize"),
        }
    }
}

/// A linear objective `c · x` with a sense.
///
/// # Examples
///
/// ```
/// use u_mathprog::models::{Objective, ObjectiveSense};
///
/// let obj = Objective::minimize(vec![2.0, 3.0]);
/// assert_eq!(obj.sense(), ObjectiveSense::Minimize);
/// assert_eq!(obj.value(&[1.0, 1.0]), 5.0);
/// assert_eq!(obj.as_maximization(), vec![-2.0, -3.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    coefficients: Vec<f64>,
    sense: ObjectiveSense,
}

impl Objective {
    /// Creates an objective with the given coefficients and sense.
    pub fn new(coefficients: Vec<f64>, sense: ObjectiveSense) -> Self {
        Self {
            coefficients,
            sense,
        }
    }

    /// Creates a maximization objective.
    pub fn maximize(coefficients: Vec<f64>) -> Self {
        Self::new(coefficients, ObjectiveSense::Maximize)
    }

    /// Creates a minimization objective.
    pub fn minimize(coefficients: Vec<f64>) -> Self {
        Self::new(coefficients, ObjectiveSense::Minimize)
    }

    /// Objective coefficients, one per variable.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Optimization direction.
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Number of decision variables.
    pub fn num_vars(&self) -> usize {
        self.coefficients.len()
    }

    /// Evaluates `c · x`.
    pub fn value(&self, x: &[f64]) -> f64 {
        self.coefficients.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Coefficients of the equivalent maximization (sign-flipped for minimize).
    pub fn as_maximization(&self) -> Vec<f64> {
        match self.sense {
            ObjectiveSense::Maximize => self.coefficients.clone(),
            ObjectiveSense::Minimize => self.coefficients.iter().map(|c| -c).collect(),
        }
    }
}

/// Relation between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSign {
    /// `a · x <= b`
    LessEqual,
    /// `a · x >= b`
    GreaterEqual,
    /// `a · x = b`
    Equal,
}

impl ConstraintSign {
    /// The relation obtained by multiplying both sides by −1.
    pub fn negated(self) -> Self {
        match self {
            Self::LessEqual => Self::GreaterEqual,
            Self::GreaterEqual => Self::LessEqual,
            Self::Equal => Self::Equal,
        }
    }

    /// Textual operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
        }
    }
}

impl fmt::Display for ConstraintSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single linear constraint `a · x (<=|>=|=) b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Coefficients `a`, one per variable.
    pub coefficients: Vec<f64>,
    /// Relation.
    pub sign: ConstraintSign,
    /// Right-hand side `b`.
    pub rhs: f64,
}

impl Constraint {
    /// Creates a constraint.
    pub fn new(coefficients: Vec<f64>, sign: ConstraintSign, rhs: f64) -> Self {
        Self {
            coefficients,
            sign,
            rhs,
        }
    }

    /// Creates `a · x <= rhs`.
    pub fn le(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, ConstraintSign::LessEqual, rhs)
    }

    /// Creates `a · x >= rhs`.
    pub fn ge(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, ConstraintSign::GreaterEqual, rhs)
    }

    /// Creates `a · x = rhs`.
    pub fn eq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, ConstraintSign::Equal, rhs)
    }

    /// Evaluates `a · x`.
    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coefficients.iter().zip(x).map(|(a, v)| a * v).sum()
    }

    /// Returns `true` if `x` satisfies the constraint within `tol`.
    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        let lhs = self.lhs(x);
        match self.sign {
            ConstraintSign::LessEqual => lhs <= self.rhs + tol,
            ConstraintSign::GreaterEqual => lhs >= self.rhs - tol,
            ConstraintSign::Equal => (lhs - self.rhs).abs() <= tol,
        }
    }

    /// Returns an equivalent constraint with a non-negative right-hand side.
    pub fn with_nonnegative_rhs(&self) -> Self {
        if self.rhs >= 0.0 {
            return self.clone();
        }
        Self {
            coefficients: self.coefficients.iter().map(|a| -a).collect(),
            sign: self.sign.negated(),
            rhs: -self.rhs,
        }
    }
}

/// Per-variable interval `[lower, upper]`; `upper = None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableBounds {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound, if any.
    pub upper: Option<f64>,
}

impl VariableBounds {
    /// Creates `[lower, upper]`.
    pub fn new(lower: f64, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    /// Default non-negativity bound `[0, ∞)`.
    pub fn non_negative() -> Self {
        Self::new(0.0, None)
    }

    /// Returns `true` if `value` lies in the interval within `tol`.
    pub fn contains(&self, value: f64, tol: f64) -> bool {
        value >= self.lower - tol && self.upper.map_or(true, |u| value <= u + tol)
    }

    /// Returns `true` if `lower > upper`.
    pub fn is_empty(&self) -> bool {
        self.upper.is_some_and(|u| self.lower > u)
    }
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

/// A validated linear program over implicitly non-negative variables.
///
/// # Examples
///
/// ```
/// use u_mathprog::models::{Constraint, LpProblem, Objective};
///
/// let lp = LpProblem::new(
///     Objective::maximize(vec![3.0, 2.0]),
///     vec![Constraint::le(vec![1.0, 1.0], 4.0), Constraint::le(vec![1.0, 0.0], 3.0)],
/// )
/// .unwrap();
/// assert_eq!(lp.num_vars(), 2);
/// assert!(lp.is_feasible(&[3.0, 1.0], 1e-9));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpProblem {
    objective: Objective,
    constraints: Vec<Constraint>,
}

impl LpProblem {
    /// Creates a linear program.
    ///
    /// Fails if there are no variables, a constraint has the wrong number of
    /// coefficients, or any value is non-finite.
    pub fn new(objective: Objective, constraints: Vec<Constraint>) -> SolveResult<Self> {
        let n = objective.num_vars();
        if n == 0 {
            return Err(SolveError::invalid("objective has no variables"));
        }
        ensure_finite(objective.coefficients(), "objective coefficients")?;
        for (i, c) in constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(SolveError::dimension(
                    format!("constraint {}", i + 1),
                    n,
                    c.coefficients.len(),
                ));
            }
            ensure_finite(&c.coefficients, "constraint coefficients")?;
            ensure_finite(&[c.rhs], "constraint right-hand side")?;
        }
        Ok(Self {
            objective,
            constraints,
        })
    }

    /// The objective.
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// The constraints, in input order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of decision variables.
    pub fn num_vars(&self) -> usize {
        self.objective.num_vars()
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if `x` is non-negative and satisfies every constraint.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        x.len() == self.num_vars()
            && x.iter().all(|&v| v >= -tol)
            && self.constraints.iter().all(|c| c.is_satisfied(x, tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_value_and_max_form() {
        let obj = Objective::maximize(vec![3.0, 2.0]);
        assert_eq!(obj.value(&[3.0, 1.0]), 11.0);
        assert_eq!(obj.as_maximization(), vec![3.0, 2.0]);
        assert_eq!(ObjectiveSense::Maximize.flipped(), ObjectiveSense::Minimize);
    }

    #[test]
    fn test_constraint_satisfaction() {
        let le = Constraint::le(vec![1.0, 1.0], 4.0);
        assert!(le.is_satisfied(&[2.0, 2.0], 1e-10));
        assert!(!le.is_satisfied(&[3.0, 2.0], 1e-10));

        let ge = Constraint::ge(vec![1.0, 0.0], 1.0);
        assert!(ge.is_satisfied(&[1.0, 0.0], 1e-10));
        assert!(!ge.is_satisfied(&[0.5, 9.0], 1e-10));

        let eq = Constraint::eq(vec![1.0, -1.0], 0.0);
        assert!(eq.is_satisfied(&[2.0, 2.0], 1e-10));
        assert!(!eq.is_satisfied(&[2.0, 1.0], 1e-10));
    }

    #[test]
    fn test_nonnegative_rhs() {
        let c = Constraint::le(vec![1.0, -2.0], -3.0).with_nonnegative_rhs();
        assert_eq!(c.coefficients, vec![-1.0, 2.0]);
        assert_eq!(c.sign, ConstraintSign::GreaterEqual);
        assert_eq!(c.rhs, 3.0);

        let same = Constraint::eq(vec![1.0], 2.0);
        assert_eq!(same.with_nonnegative_rhs(), same);
    }

    #[test]
    fn test_bounds() {
        let b = VariableBounds::default();
        assert!(b.contains(0.0, 1e-10));
        assert!(b.contains(1e9, 1e-10));
        assert!(!b.contains(-0.1, 1e-10));

        let tight = VariableBounds::new(3.0, Some(2.0));
        assert!(tight.is_empty());
        assert!(!VariableBounds::new(2.0, Some(2.0)).is_empty());
    }

    #[test]
    fn test_problem_validation() {
        let err = LpProblem::new(Objective::maximize(vec![]), vec![]).unwrap_err();
        assert!(matches!(err, SolveError::InvalidInput { .. }));

        let err = LpProblem::new(
            Objective::maximize(vec![1.0, 1.0]),
            vec![Constraint::le(vec![1.0], 1.0)],
        )
        .unwrap_err();
        assert_eq!(err, SolveError::dimension("constraint 1", 2, 1));

        let err = LpProblem::new(
            Objective::maximize(vec![1.0, f64::NAN]),
            vec![Constraint::le(vec![1.0, 1.0], 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::NonFinite { .. }));
    }

    #[test]
    fn test_problem_feasibility() {
        let lp = LpProblem::new(
            Objective::maximize(vec![1.0, 1.0]),
            vec![Constraint::le(vec![1.0, 1.0], 4.0)],
        )
        .expect("valid");
        assert!(lp.is_feasible(&[1.0, 3.0], 1e-9));
        assert!(!lp.is_feasible(&[-1.0, 3.0], 1e-9));
        assert!(!lp.is_feasible(&[1.0], 1e-9));
    }

    #[test]
    fn test_sign_display() {
        assert_eq!(ConstraintSign::GreaterEqual.to_string(), ">=");
        assert_eq!(ObjectiveSense::Minimize.to_string(), "Minimize");
    }
}
