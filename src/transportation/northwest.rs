//! Northwest-Corner rule.
//!
//! Starts at cell (0, 0) and ships as much as possible, moving down when
//! the source is exhausted and right when the destination is exhausted
//! (both when both run out). Ignores costs entirely.
//!
//! # Complexity
//!
//! O(m + n).

use crate::matrix::Matrix;

use super::problem::{InitialMethod, InitialSolution, Remaining, TransportationProblem};

/// Builds an initial allocation with the Northwest-Corner rule.
///
/// # Examples
///
/// ```
/// use u_mathprog::transportation::{northwest_corner, TransportationProblem};
///
/// let p = TransportationProblem::new(
///     vec![20.0, 30.0],
///     vec![10.0, 40.0],
///     vec![vec![2.0, 3.0], vec![4.0, 1.0]],
/// )
/// .unwrap();
/// let s = northwest_corner(&p);
/// assert_eq!(s.allocation.to_rows(), vec![vec![10.0, 10.0], vec![0.0, 30.0]]);
/// assert_eq!(s.cost, 80.0);
/// ```
pub fn northwest_corner(problem: &TransportationProblem) -> InitialSolution {
    let (m, n) = (problem.num_sources(), problem.num_destinations());
    let mut remaining = Remaining::new(problem);
    let mut allocation = Matrix::zeros(m, n);

    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        remaining.ship(&mut allocation, i, j);
        let row_done = !remaining.row_open(i);
        let col_done = !remaining.col_open(j);
        if row_done {
            i += 1;
        }
        if col_done {
            j += 1;
        }
    }

    InitialSolution::new(problem, InitialMethod::NorthwestCorner, allocation)
}
