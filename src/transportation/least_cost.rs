//! Least-Cost (matrix minimum) method.
//!
//! Repeatedly ships as much as possible through the cheapest cell whose
//! source and destination are both still open. Ties go to the first cell in
//! row-major order.
//!
//! # Complexity
//!
//! O((m + n) · m · n).

use crate::matrix::Matrix;

use super::problem::{InitialMethod, InitialSolution, Remaining, TransportationProblem};

/// Builds an initial allocation with the Least-Cost method.
pub fn least_cost(problem: &TransportationProblem) -> InitialSolution {
    let mut remaining = Remaining::new(problem);
    let mut allocation = Matrix::zeros(problem.num_sources(), problem.num_destinations());

    while let Some((i, j)) = remaining.cheapest_open_cell(problem.costs()) {
        remaining.ship(&mut allocation, i, j);
    }

    InitialSolution::new(problem, InitialMethod::LeastCost, allocation)
}
