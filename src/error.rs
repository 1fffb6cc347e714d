//! Error and status types shared by all solvers.
//!
//! Invalid input is an [`Err`]; the outcome of a well-formed solve
//! (optimal, infeasible, unbounded, iteration cap) is a [`SolveStatus`]
//! carried on the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for solver entry points.
pub type SolveResult<T> = Result<T, SolveError>;

/// Errors raised when a problem cannot be solved as given.
///
/// Every variant is a kind of invalid input. That includes
/// [`SolveError::NonFinite`] raised after a solve, when finite inputs
/// still produce a NaN or infinite objective (e.g. transportation costs
/// whose total overflows); such a value is never returned as a result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Structurally invalid input (empty objective, unsupported size, ...).
    #[error("invalid input: {context}")]
    InvalidInput {
        /// What was wrong.
        context: String,
    },

    /// A vector or matrix has the wrong length.
    #[error("{context}: expected {expected} entries, found {found}")]
    DimensionMismatch {
        /// Which input was mis-sized.
        context: String,
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// NaN or infinity where a finite number is required.
    #[error("non-finite value in {context}")]
    NonFinite {
        /// Where the value was found.
        context: String,
    },

    /// Transportation problem whose total supply differs from total demand.
    #[error("unbalanced transportation problem: supply {supply} != demand {demand}")]
    Unbalanced {
        /// Total supply.
        supply: f64,
        /// Total demand.
        demand: f64,
    },
}

impl SolveError {
    pub(crate) fn invalid(context: impl Into<String>) -> Self {
        Self::InvalidInput {
            context: context.into(),
        }
    }

    pub(crate) fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFinite {
            context: context.into(),
        }
    }

    pub(crate) fn dimension(context: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            found,
        }
    }
}

/// Outcome of a solve on well-formed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// An optimal solution was found.
    Optimal,
    /// No point satisfies all constraints and bounds.
    Infeasible,
    /// The objective improves without limit.
    Unbounded,
    /// The iteration (or node) cap was reached first.
    NotConverged,
}

impl SolveStatus {
    /// Returns `true` for [`SolveStatus::Optimal`].
    pub fn is_optimal(self) -> bool {
        self == Self::Optimal
    }
}

/// Rejects NaN/inf values in `values`, naming `context` in the error.
pub(crate) fn ensure_finite(values: &[f64], context: &str) -> SolveResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SolveError::non_finite(context))
    }
}
