//! Cost matrices and restriction masks.
//!
//! Both types are plain row-major value objects. Every transformation
//! (padding, maximization transform, reduction) produces a new matrix,
//! so earlier phases stay available for comparison and for computing
//! the final cost on the original values.

use serde::{Deserialize, Serialize};

/// A rectangular matrix of real-valued costs (rows × columns).
///
/// Construction does not validate the shape; use
/// [`crate::validation::validate_matrix`] (or any solver entry point,
/// which validates first) to reject ragged or empty input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostMatrix {
    cells: Vec<Vec<f64>>,
}

impl CostMatrix {
    /// Creates a matrix from row vectors.
    pub fn new(cells: Vec<Vec<f64>>) -> Self {
        Self { cells }
    }

    /// Creates a `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![0.0; cols]; rows],
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns (length of the first row, 0 if empty).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Whether the matrix has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    /// Whether rows == cols.
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the index is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row][col]
    }

    /// Sets the value at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row][col] = value;
    }

    /// A single row.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row]
    }

    /// A copy of a single column.
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.cells.iter().map(|r| r[col]).collect()
    }

    /// All rows.
    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.cells
    }

    /// Consumes the matrix and returns its rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.cells
    }

    /// Iterates `(row, col, value)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &v)| (r, c, v)))
    }

    /// Largest value in the matrix. `None` if empty.
    pub fn max_value(&self) -> Option<f64> {
        self.iter_cells().map(|(_, _, v)| v).reduce(f64::max)
    }

    /// Applies `f` to every cell and returns the new matrix.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|row| row.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }

    /// Returns a new matrix padded with zero-valued rows/columns up to
    /// `rows × cols`. Existing cells keep their positions.
    pub fn padded(&self, rows: usize, cols: usize) -> Self {
        let mut cells = Vec::with_capacity(rows.max(self.rows()));
        for row in &self.cells {
            let mut new_row = row.clone();
            new_row.resize(cols.max(row.len()), 0.0);
            cells.push(new_row);
        }
        while cells.len() < rows {
            cells.push(vec![0.0; cols.max(self.cols())]);
        }
        Self { cells }
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let (rows, cols) = (self.rows(), self.cols());
        let mut cells = vec![vec![0.0; rows]; cols];
        for (r, c, v) in self.iter_cells() {
            cells[c][r] = v;
        }
        Self { cells }
    }
}

impl From<Vec<Vec<f64>>> for CostMatrix {
    fn from(cells: Vec<Vec<f64>>) -> Self {
        Self::new(cells)
    }
}

macro_rules! impl_from_integer_rows {
    ($($t:ty),*) => {$(
        impl From<Vec<Vec<$t>>> for CostMatrix {
            fn from(cells: Vec<Vec<$t>>) -> Self {
                Self::new(
                    cells
                        .into_iter()
                        .map(|row| row.into_iter().map(|v| v as f64).collect())
                        .collect(),
                )
            }
        }
    )*};
}

impl_from_integer_rows!(i32, i64);

/// Forbidden pairings for an assignment problem.
///
/// `true` marks a cell that can never be part of a feasible assignment.
/// Cells outside the stored shape count as unrestricted, so a mask can
/// be reused after the cost matrix is padded with dummy lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestrictionMask {
    cells: Vec<Vec<bool>>,
}

impl RestrictionMask {
    /// Creates a mask from row vectors.
    pub fn new(cells: Vec<Vec<bool>>) -> Self {
        Self { cells }
    }

    /// Creates an all-unrestricted mask.
    pub fn none(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![false; cols]; rows],
        }
    }

    /// Marks a cell as restricted.
    pub fn with_restricted(mut self, row: usize, col: usize) -> Self {
        if row >= self.cells.len() {
            let cols = self.cols();
            self.cells.resize(row + 1, vec![false; cols]);
        }
        if col >= self.cells[row].len() {
            self.cells[row].resize(col + 1, false);
        }
        self.cells[row][col] = true;
        self
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns (length of the first row, 0 if empty).
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Whether `(row, col)` is restricted.
    #[inline]
    pub fn is_restricted(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Whether every cell of `row` within `cols` columns is restricted.
    pub fn is_row_blocked(&self, row: usize, cols: usize) -> bool {
        cols > 0 && (0..cols).all(|c| self.is_restricted(row, c))
    }

    /// Number of restricted cells.
    pub fn restricted_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&b| b).count()
    }

    /// All rows.
    pub fn as_rows(&self) -> &[Vec<bool>] {
        &self.cells
    }
}

impl From<Vec<Vec<bool>>> for RestrictionMask {
    fn from(cells: Vec<Vec<bool>>) -> Self {
        Self::new(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_dimensions() {
        let m = CostMatrix::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert!(!m.is_square());
        assert!(!m.is_empty());
        assert_eq!(m.get(1, 2), 6.0);
        assert_eq!(m.column(1), vec![2.0, 5.0]);
    }

    #[test]
    fn test_matrix_empty() {
        let m = CostMatrix::default();
        assert!(m.is_empty());
        assert_eq!(m.cols(), 0);
        assert_eq!(m.max_value(), None);
    }

    #[test]
    fn test_matrix_max_value() {
        let m = CostMatrix::from(vec![vec![85, 132], vec![-4, 66]]);
        assert_eq!(m.max_value(), Some(132.0));
    }

    #[test]
    fn test_padded_adds_zero_rows() {
        let m = CostMatrix::from(vec![vec![1, 2, 3]]);
        let p = m.padded(3, 3);
        assert_eq!(p.rows(), 3);
        assert_eq!(p.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(p.row(2), &[0.0, 0.0, 0.0]);
        // Source matrix untouched
        assert_eq!(m.rows(), 1);
    }

    #[test]
    fn test_padded_adds_zero_columns() {
        let m = CostMatrix::from(vec![vec![1], vec![2]]);
        let p = m.padded(2, 2);
        assert_eq!(p.as_rows(), &[vec![1.0, 0.0], vec![2.0, 0.0]]);
    }

    #[test]
    fn test_transpose() {
        let m = CostMatrix::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let t = m.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.row(2), &[3.0, 6.0]);
    }

    #[test]
    fn test_mask_out_of_range_is_unrestricted() {
        let mask = RestrictionMask::none(2, 2).with_restricted(0, 1);
        assert!(mask.is_restricted(0, 1));
        assert!(!mask.is_restricted(1, 1));
        assert!(!mask.is_restricted(5, 5));
        assert_eq!(mask.restricted_count(), 1);
    }

    #[test]
    fn test_mask_row_blocked() {
        let mask = RestrictionMask::new(vec![vec![true, true], vec![true, false]]);
        assert!(mask.is_row_blocked(0, 2));
        assert!(!mask.is_row_blocked(1, 2));
        assert!(!mask.is_row_blocked(0, 0));
    }
}
