//! Vogel's Approximation Method (VAM).
//!
//! # Algorithm
//!
//! 1. For every open row and column with at least two open cells, the
//!    penalty is the gap between its two smallest open costs.
//! 2. Pick the line with the largest penalty (rows before columns, lower
//!    index first on ties) and ship through its cheapest open cell.
//! 3. When no line has two open cells, ship through the globally cheapest
//!    open cell.
//! 4. Repeat until every row or every column is exhausted.
//!
//! # Complexity
//!
//! O((m + n)² · max(m, n)) with the sort-free two-minimum scan.
//!
//! # Reference
//!
//! Reinfeld & Vogel (1958), "Mathematical Programming"

use crate::matrix::Matrix;

use super::problem::{InitialMethod, InitialSolution, Remaining, TransportationProblem};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Line {
    Row(usize),
    Col(usize),
}

/// Builds an initial allocation with Vogel's Approximation Method.
///
/// # Examples
///
/// ```
/// use u_mathprog::transportation::{vogel, TransportationProblem};
///
/// let p = TransportationProblem::new(
///     vec![6.0, 7.0, 7.0],
///     vec![3.0, 10.0, 7.0],
///     vec![
///         vec![10.0, 8.0, 14.0],
///         vec![1.0, 3.0, 6.0],
///         vec![8.0, 6.0, 14.0],
///     ],
/// )
/// .unwrap();
/// assert_eq!(vogel(&p).cost, 138.0);
/// ```
pub fn vogel(problem: &TransportationProblem) -> InitialSolution {
    let costs = problem.costs();
    let mut remaining = Remaining::new(problem);
    let mut allocation = Matrix::zeros(problem.num_sources(), problem.num_destinations());

    loop {
        let rows = remaining.open_rows();
        let cols = remaining.open_cols();
        if rows.is_empty() || cols.is_empty() {
            break;
        }

        let mut best: Option<(Line, f64)> = None;
        let mut consider = |line: Line, penalty: Option<f64>| {
            if let Some(p) = penalty {
                if best.map_or(true, |(_, b)| p > b) {
                    best = Some((line, p));
                }
            }
        };
        for &i in &rows {
            consider(Line::Row(i), penalty(cols.iter().map(|&j| costs.get(i, j))));
        }
        for &j in &cols {
            consider(Line::Col(j), penalty(rows.iter().map(|&i| costs.get(i, j))));
        }

        let cell = match best {
            Some((Line::Row(i), _)) => cheapest_in(&cols, |j| costs.get(i, j)).map(|j| (i, j)),
            Some((Line::Col(j), _)) => cheapest_in(&rows, |i| costs.get(i, j)).map(|i| (i, j)),
            None => remaining.cheapest_open_cell(costs),
        };
        let Some((i, j)) = cell else {
            break;
        };
        remaining.ship(&mut allocation, i, j);
    }

    InitialSolution::new(problem, InitialMethod::Vogel, allocation)
}

/// Difference between the two smallest costs, or `None` with fewer than two.
fn penalty(costs: impl Iterator<Item = f64>) -> Option<f64> {
    let mut lowest = f64::INFINITY;
    let mut second = f64::INFINITY;
    let mut count = 0usize;
    for c in costs {
        count += 1;
        if c < lowest {
            second = lowest;
            lowest = c;
        } else if c < second {
            second = c;
        }
    }
    (count >= 2).then(|| second - lowest)
}

fn cheapest_in(candidates: &[usize], cost: impl Fn(usize) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &k in candidates {
        let c = cost(k);
        if best.map_or(true, |(_, b)| c < b) {
            best = Some((k, c));
        }
    }
    best.map(|(k, _)| k)
}
