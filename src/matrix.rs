//! Dense row-major matrix.

use serde::{Deserialize, Serialize};

use crate::error::{SolveError, SolveResult};

/// A dense `rows × cols` matrix of `f64` stored in row-major order.
///
/// Used for cost matrices, allocations, distance matrices and simplex
/// tableaus.
///
/// # Examples
///
/// ```
/// use u_mathprog::matrix::Matrix;
///
/// let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(m.get(1, 0), 3.0);
/// assert_eq!(m.row_sum(0), 3.0);
/// assert_eq!(m.col_sum(1), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Creates a `rows × cols` matrix initialized to zero.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Builds a matrix from a slice of rows.
    ///
    /// Fails if the rows have different lengths.
    pub fn from_rows(rows: &[Vec<f64>]) -> SolveResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(SolveError::dimension(format!("matrix row {i}"), cols, row.len()));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Returns the entry at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Sets the entry at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Returns row `row` as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Returns row `row` as a mutable slice.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if the matrix is square.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Sum of row `row`.
    pub fn row_sum(&self, row: usize) -> f64 {
        self.row(row).iter().sum()
    }

    /// Sum of column `col`.
    pub fn col_sum(&self, col: usize) -> f64 {
        (0..self.rows).map(|r| self.get(r, col)).sum()
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows {
            for j in (i + 1)..self.cols {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Element-wise product summed over all cells.
    ///
    /// Returns `None` if the shapes differ.
    pub fn dot(&self, other: &Matrix) -> Option<f64> {
        if self.rows != other.rows || self.cols != other.cols {
            return None;
        }
        Some(self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum())
    }

    /// Returns the entries as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    /// Flat row-major view of the entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_and_set() {
        let mut m = Matrix::zeros(2, 3);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        m.set(1, 2, 42.0);
        assert_eq!(m.get(1, 2), 42.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert!(!m.is_square());
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err, SolveError::dimension("matrix row 1", 2, 1));
    }

    #[test]
    fn test_from_rows_empty() {
        let m = Matrix::from_rows(&[]).expect("empty is valid");
        assert_eq!(m.rows(), 0);
        assert_eq!(m.cols(), 0);
    }

    #[test]
    fn test_sums_and_rows() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).expect("valid");
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.row_sum(1), 15.0);
        assert_eq!(m.col_sum(2), 9.0);
        assert_eq!(m.to_rows()[0], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_symmetric() {
        let sym = Matrix::from_rows(&[vec![0.0, 5.0], vec![5.0, 0.0]]).expect("valid");
        assert!(sym.is_symmetric(1e-10));
        let asym = Matrix::from_rows(&[vec![0.0, 10.0], vec![15.0, 0.0]]).expect("valid");
        assert!(!asym.is_symmetric(1e-10));
    }

    #[test]
    fn test_dot() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("valid");
        let b = Matrix::from_rows(&[vec![2.0, 0.0], vec![1.0, 1.0]]).expect("valid");
        assert_eq!(a.dot(&b), Some(9.0));
        assert_eq!(a.dot(&Matrix::zeros(1, 2)), None);
    }

    #[test]
    fn test_row_mut() {
        let mut m = Matrix::zeros(2, 2);
        m.row_mut(0).copy_from_slice(&[7.0, 8.0]);
        assert_eq!(m.as_slice(), &[7.0, 8.0, 0.0, 0.0]);
    }
}
