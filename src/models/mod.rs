//! Linear-program model types shared by the LP, duality and
//! branch-and-bound solvers.
//!
//! Variables are implicitly non-negative unless explicit
//! [`VariableBounds`] are supplied.

mod lp;

pub use lp::{Constraint, ConstraintSign, LpProblem, Objective, ObjectiveSense, VariableBounds};
