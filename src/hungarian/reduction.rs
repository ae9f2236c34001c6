//! Matrix transformations of the Hungarian method.
//!
//! Each function returns a new matrix; the input is never modified.
//! Restricted cells never supply a minimum, but they are shifted along
//! with their row or column so that every line stays consistent.

use crate::models::{CostMatrix, LineCover, ProblemType, RestrictionMask};

/// Converts a maximization matrix to minimization by `v -> max - v`.
///
/// Returns the matrix and the maximum used, or an unchanged copy and
/// `None` for minimization.
pub fn normalize(costs: &CostMatrix, problem_type: ProblemType) -> (CostMatrix, Option<f64>) {
    match problem_type {
        ProblemType::Minimization => (costs.clone(), None),
        ProblemType::Maximization => {
            let max = costs.max_value().unwrap_or(0.0);
            (costs.map(|v| max - v), Some(max))
        }
    }
}

/// Pads the smaller dimension with zero-cost dummy lines.
///
/// Returns the square matrix and the number of dummy rows and columns.
pub fn square(matrix: &CostMatrix) -> (CostMatrix, usize, usize) {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    let n = rows.max(cols);
    (matrix.padded(n, n), n - rows, n - cols)
}

/// Subtracts from each row its minimum over non-restricted cells.
///
/// A row whose cells are all restricted has no valid minimum and is
/// left as is (`None` in the returned minima).
pub fn reduce_rows(
    matrix: &CostMatrix,
    restrictions: Option<&RestrictionMask>,
) -> (CostMatrix, Vec<Option<f64>>) {
    let mut reduced = matrix.clone();
    let mut minima = Vec::with_capacity(matrix.rows());

    for r in 0..matrix.rows() {
        let min = if restrictions.is_some_and(|m| m.is_row_blocked(r, matrix.cols())) {
            None
        } else {
            admissible_min((0..matrix.cols()).map(|c| (r, c)), matrix, restrictions)
        };
        if let Some(min) = min {
            for c in 0..matrix.cols() {
                reduced.set(r, c, matrix.get(r, c) - min);
            }
        }
        minima.push(min);
    }

    (reduced, minima)
}

/// Subtracts from each column without an admissible zero its minimum
/// over non-restricted cells.
///
/// Columns that already contain a zero are left unchanged (`None`).
pub fn reduce_columns(
    matrix: &CostMatrix,
    restrictions: Option<&RestrictionMask>,
    epsilon: f64,
) -> (CostMatrix, Vec<Option<f64>>) {
    let mut reduced = matrix.clone();
    let mut minima = Vec::with_capacity(matrix.cols());

    for c in 0..matrix.cols() {
        let has_zero = (0..matrix.rows())
            .any(|r| matrix.get(r, c).abs() <= epsilon && !is_restricted(restrictions, r, c));
        if has_zero {
            minima.push(None);
            continue;
        }

        let min = admissible_min((0..matrix.rows()).map(|r| (r, c)), matrix, restrictions);
        if let Some(min) = min {
            for r in 0..matrix.rows() {
                reduced.set(r, c, matrix.get(r, c) - min);
            }
        }
        minima.push(min);
    }

    (reduced, minima)
}

/// Shifts the matrix by the smallest uncovered admissible value `m`:
/// uncovered cells lose `m`, cells on both a covered row and a covered
/// column gain `m`, cells on exactly one line are unchanged.
///
/// Returns `None` when no uncovered admissible cell exists.
pub fn adjust(
    matrix: &CostMatrix,
    cover: &LineCover,
    restrictions: Option<&RestrictionMask>,
) -> Option<(CostMatrix, f64)> {
    let uncovered = matrix
        .iter_cells()
        .filter(|&(r, c, _)| cover.coverage(r, c) == 0)
        .map(|(r, c, _)| (r, c));
    let min = admissible_min(uncovered, matrix, restrictions)?;

    let mut adjusted = matrix.clone();
    for (r, c, v) in matrix.iter_cells() {
        match cover.coverage(r, c) {
            0 => adjusted.set(r, c, v - min),
            2 => adjusted.set(r, c, v + min),
            _ => {}
        }
    }
    Some((adjusted, min))
}

fn admissible_min(
    cells: impl Iterator<Item = (usize, usize)>,
    matrix: &CostMatrix,
    restrictions: Option<&RestrictionMask>,
) -> Option<f64> {
    cells
        .filter(|&(r, c)| !is_restricted(restrictions, r, c))
        .map(|(r, c)| matrix.get(r, c))
        .reduce(f64::min)
}

#[inline]
fn is_restricted(restrictions: Option<&RestrictionMask>, row: usize, col: usize) -> bool {
    restrictions.is_some_and(|m| m.is_restricted(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn m(cells: Vec<Vec<i64>>) -> CostMatrix {
        CostMatrix::from(cells)
    }

    #[test]
    fn test_normalize_minimization_unchanged() {
        let costs = m(vec![vec![3, 1], vec![2, 5]]);
        let (out, max) = normalize(&costs, ProblemType::Minimization);
        assert_eq!(out, costs);
        assert_eq!(max, None);
    }

    #[test]
    fn test_normalize_maximization_subtracts_from_max() {
        let costs = m(vec![
            vec![85, 75, 65, 125, 75],
            vec![90, 78, 66, 132, 78],
        ]);
        let (out, max) = normalize(&costs, ProblemType::Maximization);
        assert_eq!(max, Some(132.0));
        assert_eq!(out.row(0), &[47.0, 57.0, 67.0, 7.0, 57.0]);
        assert_eq!(out.get(1, 3), 0.0);
    }

    #[test]
    fn test_square_adds_dummy_rows() {
        let (out, dummy_rows, dummy_cols) = square(&m(vec![vec![1, 2, 3, 4, 5]; 3]));
        assert_eq!((out.rows(), out.cols()), (5, 5));
        assert_eq!((dummy_rows, dummy_cols), (2, 0));
        assert!(out.row(4).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_square_adds_dummy_columns() {
        let (out, dummy_rows, dummy_cols) = square(&m(vec![vec![1], vec![2], vec![3]]));
        assert_eq!((dummy_rows, dummy_cols), (0, 2));
        assert_eq!(out.row(1), &[2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reduce_rows() {
        let (out, minima) = reduce_rows(&m(vec![vec![9, 2, 7], vec![6, 4, 3]]), None);
        assert_eq!(out.row(0), &[7.0, 0.0, 5.0]);
        assert_eq!(out.row(1), &[3.0, 1.0, 0.0]);
        assert_eq!(minima, vec![Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_reduce_rows_ignores_restricted_minimum() {
        let mask = RestrictionMask::none(1, 3).with_restricted(0, 1);
        let (out, minima) = reduce_rows(&m(vec![vec![9, 2, 7]]), Some(&mask));
        // Minimum taken over {9, 7}; the restricted cell is still shifted.
        assert_eq!(minima, vec![Some(7.0)]);
        assert_eq!(out.row(0), &[2.0, -5.0, 0.0]);
    }

    #[test]
    fn test_reduce_rows_skips_fully_restricted_row() {
        let mask = RestrictionMask::new(vec![vec![true, true], vec![false, false]]);
        let (out, minima) = reduce_rows(&m(vec![vec![4, 5], vec![6, 8]]), Some(&mask));
        assert_eq!(minima, vec![None, Some(6.0)]);
        assert_eq!(out.row(0), &[4.0, 5.0]);
        assert_eq!(out.row(1), &[0.0, 2.0]);
    }

    #[test]
    fn test_reduce_rows_dummy_column_unblocks_row() {
        // The mask covers the 2 real columns; the padded third column is free.
        let mask = RestrictionMask::new(vec![vec![true, true], vec![false, false]]);
        let (out, minima) = reduce_rows(&m(vec![vec![4, 5, 0], vec![6, 8, 0]]), Some(&mask));
        assert_eq!(minima, vec![Some(0.0), Some(0.0)]);
        assert_eq!(out.row(0), &[4.0, 5.0, 0.0]);
    }

    #[test]
    fn test_reduce_columns_only_without_zero() {
        let input = m(vec![vec![7, 0, 5], vec![3, 1, 0], vec![4, 7, 0]]);
        let (out, minima) = reduce_columns(&input, None, EPS);
        assert_eq!(minima, vec![Some(3.0), None, None]);
        assert_eq!(out.column(0), vec![4.0, 0.0, 1.0]);
        assert_eq!(out.column(1), input.column(1));
    }

    #[test]
    fn test_reduce_columns_restricted_zero_does_not_count() {
        let input = m(vec![vec![0, 1], vec![2, 0]]);
        let mask = RestrictionMask::none(2, 2).with_restricted(0, 0);
        let (out, minima) = reduce_columns(&input, Some(&mask), EPS);
        assert_eq!(minima, vec![Some(2.0), None]);
        assert_eq!(out.column(0), vec![-2.0, 0.0]);
    }

    #[test]
    fn test_adjust() {
        // Cover: row 0 and column 0.
        let input = m(vec![vec![0, 0, 4], vec![0, 3, 2], vec![0, 5, 6]]);
        let cover = LineCover::from_lines([0], [0]);
        let (out, min) = adjust(&input, &cover, None).unwrap();
        assert_eq!(min, 2.0);
        assert_eq!(out.row(0), &[2.0, 0.0, 4.0]); // (0,0) doubly covered
        assert_eq!(out.row(1), &[0.0, 1.0, 0.0]);
        assert_eq!(out.row(2), &[0.0, 3.0, 4.0]);
        // Input untouched
        assert_eq!(input.get(0, 0), 0.0);
    }

    #[test]
    fn test_adjust_nothing_uncovered() {
        let input = m(vec![vec![0, 1], vec![1, 0]]);
        let cover = LineCover::from_lines([0, 1], []);
        assert!(adjust(&input, &cover, None).is_none());
    }

    #[test]
    fn test_adjust_skips_restricted_minimum() {
        let input = m(vec![vec![0, 1], vec![5, 3]]);
        let cover = LineCover::from_lines([0], []);
        let mask = RestrictionMask::none(2, 2).with_restricted(1, 1);
        let (out, min) = adjust(&input, &cover, Some(&mask)).unwrap();
        assert_eq!(min, 5.0);
        assert_eq!(out.row(1), &[0.0, -2.0]);
    }
}
