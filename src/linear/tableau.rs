//! Big-M simplex tableau.
//!
//! Layout, for `m` constraints and `n` structural variables:
//!
//! ```text
//! columns: x1..xn | slacks (≤ rows, then ≥ rows) | artificials (≥ rows, then = rows) | RHS
//! rows:    one per constraint (input order), objective row last
//! ```
//!
//! The objective row holds reduced costs of the maximization form. Each
//! artificial column starts at `+M` and every ≥/= row is subtracted `M`
//! times from the objective row, which leaves the artificials basic and
//! penalized.
//!
//! The basic column of every row is tracked explicitly; a column that merely
//! looks like a unit column without being basic is never read as basic.

use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;
use crate::models::{ConstraintSign, LpProblem, ObjectiveSense};

/// Role of a tableau column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Decision variable `x_j` (0-based).
    Structural(usize),
    /// Slack or surplus variable of constraint `i` (0-based).
    Slack(usize),
    /// Artificial variable of constraint `i` (0-based).
    Artificial(usize),
}

/// A simplex tableau in Big-M form.
///
/// # Examples
///
/// ```
/// use u_mathprog::linear::Tableau;
/// use u_mathprog::models::{Constraint, LpProblem, Objective};
///
/// let lp = LpProblem::new(
///     Objective::maximize(vec![3.0, 2.0]),
///     vec![Constraint::le(vec![1.0, 1.0], 4.0), Constraint::ge(vec![1.0, 0.0], 1.0)],
/// )
/// .unwrap();
/// let t = Tableau::build(&lp, 1000.0);
/// // 2 structural + 2 slack + 1 artificial + RHS
/// assert_eq!(t.num_columns(), 6);
/// assert_eq!(t.num_rows(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tableau {
    matrix: Matrix,
    columns: Vec<ColumnKind>,
    basis: Vec<usize>,
    num_structural: usize,
    sense: ObjectiveSense,
}

impl Tableau {
    /// Builds the initial Big-M tableau for `problem` with penalty `big_m`.
    ///
    /// Constraints with a negative right-hand side are multiplied by −1
    /// first, so every initial basic variable is non-negative.
    pub fn build(problem: &LpProblem, big_m: f64) -> Self {
        let n = problem.num_vars();
        let m = problem.num_constraints();
        let constraints: Vec<_> = problem
            .constraints()
            .iter()
            .map(|c| c.with_nonnegative_rhs())
            .collect();

        let rows_with = |sign: ConstraintSign| -> Vec<usize> {
            constraints
                .iter()
                .enumerate()
                .filter(|(_, c)| c.sign == sign)
                .map(|(i, _)| i)
                .collect()
        };
        let le_rows = rows_with(ConstraintSign::LessEqual);
        let ge_rows = rows_with(ConstraintSign::GreaterEqual);
        let eq_rows = rows_with(ConstraintSign::Equal);

        let mut columns: Vec<ColumnKind> = (0..n).map(ColumnKind::Structural).collect();
        columns.extend(le_rows.iter().chain(&ge_rows).map(|&i| ColumnKind::Slack(i)));
        columns.extend(ge_rows.iter().chain(&eq_rows).map(|&i| ColumnKind::Artificial(i)));

        let width = columns.len() + 1;
        let rhs = width - 1;
        let obj = m;
        let mut matrix = Matrix::zeros(m + 1, width);
        let mut basis = vec![0; m];

        for (i, c) in constraints.iter().enumerate() {
            matrix.row_mut(i)[..n].copy_from_slice(&c.coefficients);
            matrix.set(i, rhs, c.rhs);
        }
        for (col, kind) in columns.iter().enumerate() {
            match *kind {
                ColumnKind::Structural(_) => {}
                ColumnKind::Slack(i) => {
                    let coeff = match constraints[i].sign {
                        ConstraintSign::GreaterEqual => -1.0,
                        _ => {
                            basis[i] = col;
                            1.0
                        }
                    };
                    matrix.set(i, col, coeff);
                }
                ColumnKind::Artificial(i) => {
                    basis[i] = col;
                    matrix.set(i, col, 1.0);
                    matrix.set(obj, col, big_m);
                }
            }
        }

        for (j, &c) in problem.objective().as_maximization().iter().enumerate() {
            matrix.set(obj, j, -c);
        }
        for &i in ge_rows.iter().chain(&eq_rows) {
            for col in 0..width {
                let v = matrix.get(obj, col) - big_m * matrix.get(i, col);
                matrix.set(obj, col, v);
            }
        }

        Self {
            matrix,
            columns,
            basis,
            num_structural: n,
            sense: problem.objective().sense(),
        }
    }

    /// Number of rows, including the objective row.
    pub fn num_rows(&self) -> usize {
        self.matrix.rows()
    }

    /// Number of columns, including the RHS column.
    pub fn num_columns(&self) -> usize {
        self.matrix.cols()
    }

    /// Role of each non-RHS column.
    pub fn columns(&self) -> &[ColumnKind] {
        &self.columns
    }

    /// Basic column of each constraint row.
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// The raw tableau entries.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    fn objective_row(&self) -> usize {
        self.matrix.rows() - 1
    }

    fn rhs_column(&self) -> usize {
        self.matrix.cols() - 1
    }

    /// Entering column: most negative reduced cost below `-tol`.
    ///
    /// Ties go to the first column. `None` means the tableau is optimal.
    pub fn pivot_column(&self, tol: f64) -> Option<usize> {
        let row = self.matrix.row(self.objective_row());
        let mut best: Option<(usize, f64)> = None;
        for (col, &v) in row[..self.rhs_column()].iter().enumerate() {
            if best.map_or(true, |(_, b)| v < b) {
                best = Some((col, v));
            }
        }
        best.filter(|&(_, v)| v < -tol).map(|(col, _)| col)
    }

    /// Leaving row by the minimum ratio test over entries above `tol`.
    ///
    /// Ties go to the first row. `None` means the problem is unbounded.
    pub fn pivot_row(&self, col: usize, tol: f64) -> Option<usize> {
        let rhs = self.rhs_column();
        let mut best: Option<(usize, f64)> = None;
        for row in 0..self.objective_row() {
            let entry = self.matrix.get(row, col);
            if entry <= tol {
                continue;
            }
            let ratio = self.matrix.get(row, rhs) / entry;
            if best.map_or(true, |(_, r)| ratio < r) {
                best = Some((row, ratio));
            }
        }
        best.map(|(row, _)| row)
    }

    /// Pivots on `(row, col)`: scales the row to a unit pivot and clears the
    /// column from every other row, objective row included.
    pub fn pivot(&mut self, row: usize, col: usize) {
        let pivot = self.matrix.get(row, col);
        for v in self.matrix.row_mut(row) {
            *v /= pivot;
        }
        let pivot_row = self.matrix.row(row).to_vec();
        for r in 0..self.matrix.rows() {
            if r == row {
                continue;
            }
            let factor = self.matrix.get(r, col);
            if factor == 0.0 {
                continue;
            }
            for (v, p) in self.matrix.row_mut(r).iter_mut().zip(&pivot_row) {
                *v -= factor * p;
            }
        }
        self.basis[row] = col;
    }

    /// Row in which `col` is basic, if any.
    pub fn basic_row(&self, col: usize) -> Option<usize> {
        self.basis.iter().position(|&b| b == col)
    }

    /// Returns `true` if `col` is a unit column over the constraint rows
    /// (one entry ≈ 1, the rest ≈ 0).
    pub fn is_unit_column(&self, col: usize, tol: f64) -> bool {
        let mut ones = 0;
        for row in 0..self.objective_row() {
            let v = self.matrix.get(row, col);
            if (v - 1.0).abs() <= tol {
                ones += 1;
            } else if v.abs() > tol {
                return false;
            }
        }
        ones == 1
    }

    /// Current values of the structural variables: the RHS of the row a
    /// variable is basic in, zero for non-basic variables.
    pub fn solution(&self) -> Vec<f64> {
        let rhs = self.rhs_column();
        (0..self.num_structural)
            .map(|col| {
                self.basic_row(col)
                    .map_or(0.0, |row| self.matrix.get(row, rhs))
            })
            .collect()
    }

    /// Current objective value in the problem's own sense.
    pub fn objective_value(&self) -> f64 {
        let z = self.matrix.get(self.objective_row(), self.rhs_column());
        match self.sense {
            ObjectiveSense::Maximize => z,
            ObjectiveSense::Minimize => -z,
        }
    }

    /// Returns `true` if some artificial variable is basic at a value above `tol`.
    pub fn has_positive_artificial(&self, tol: f64) -> bool {
        let rhs = self.rhs_column();
        self.columns.iter().enumerate().any(|(col, kind)| {
            matches!(kind, ColumnKind::Artificial(_))
                && self
                    .basic_row(col)
                    .is_some_and(|row| self.matrix.get(row, rhs) > tol)
        })
    }
}
