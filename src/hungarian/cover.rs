//! Minimum line cover of the zeros of a matrix.
//!
//! The zeros of a matrix form a bipartite graph (rows vs. columns, one
//! edge per zero cell). A minimum set of lines covering every zero is a
//! minimum vertex cover of that graph, whose size equals the size of a
//! maximum matching.
//!
//! # Algorithm
//! 1. Maximum matching by breadth-first augmenting paths.
//! 2. Alternating search from every unmatched row: row → any zero
//!    column, column → its matched row. Mark everything reached.
//! 3. Cover = unmarked rows ∪ marked columns.
//!
//! # Complexity
//! O(V · E) where V = rows + cols and E = number of zeros.
//!
//! # Reference
//! König (1931); Kuhn (1955), "The Hungarian Method for the Assignment Problem"

use std::collections::VecDeque;

use crate::models::{CostMatrix, LineCover, RestrictionMask};

/// Bipartite graph of the zero cells of a matrix.
#[derive(Debug, Clone)]
pub(crate) struct ZeroGraph {
    cols: usize,
    /// Zero columns per row, ascending.
    adj: Vec<Vec<usize>>,
}

/// A matching between rows and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Matching {
    pub row_to_col: Vec<Option<usize>>,
    pub col_to_row: Vec<Option<usize>>,
}

impl Matching {
    fn empty(rows: usize, cols: usize) -> Self {
        Self {
            row_to_col: vec![None; rows],
            col_to_row: vec![None; cols],
        }
    }

    /// Number of matched pairs.
    pub fn size(&self) -> usize {
        self.row_to_col.iter().flatten().count()
    }
}

impl ZeroGraph {
    /// Builds the graph of cells with `|v| <= epsilon`. Restricted cells
    /// never become edges. Columns span the widest row.
    pub fn from_matrix(
        matrix: &CostMatrix,
        restrictions: Option<&RestrictionMask>,
        epsilon: f64,
    ) -> Self {
        let adj = matrix
            .as_rows()
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(c, v)| {
                        v.abs() <= epsilon && !restrictions.is_some_and(|m| m.is_restricted(r, c))
                    })
                    .map(|(c, _)| c)
                    .collect()
            })
            .collect();

        // Widest row, so ragged input cannot index past the column arrays.
        let cols = matrix.as_rows().iter().map(Vec::len).max().unwrap_or(0);
        Self { cols, adj }
    }

    /// Zero columns of `row`.
    pub fn zeros_in_row(&self, row: usize) -> &[usize] {
        &self.adj[row]
    }

    /// Maximum matching.
    pub fn maximum_matching(&self) -> Matching {
        let mut matching = Matching::empty(self.adj.len(), self.cols);
        self.extend_matching(&mut matching);
        matching
    }

    /// Grows `matching` to a maximum matching with augmenting paths.
    ///
    /// Existing pairs must be edges of this graph; they may be rerouted
    /// but every matched row stays matched.
    pub fn extend_matching(&self, matching: &mut Matching) {
        for root in 0..self.adj.len() {
            if matching.row_to_col[root].is_none() {
                self.augment_from(root, matching);
            }
        }
    }

    /// Breadth-first search for an augmenting path from a free row.
    fn augment_from(&self, root: usize, matching: &mut Matching) -> bool {
        let mut reached_from = vec![None; self.cols];
        let mut queue = VecDeque::from([root]);
        let mut free_col = None;

        'search: while let Some(row) = queue.pop_front() {
            for &col in &self.adj[row] {
                if reached_from[col].is_some() {
                    continue;
                }
                reached_from[col] = Some(row);
                match matching.col_to_row[col] {
                    None => {
                        free_col = Some(col);
                        break 'search;
                    }
                    Some(next) => queue.push_back(next),
                }
            }
        }

        let Some(mut col) = free_col else {
            return false;
        };

        // Flip the path back to the root.
        while let Some(row) = reached_from[col] {
            let previous = matching.row_to_col[row];
            matching.row_to_col[row] = Some(col);
            matching.col_to_row[col] = Some(row);
            match previous {
                Some(prev_col) => col = prev_col,
                None => break,
            }
        }
        true
    }

    /// Minimum vertex cover derived from a maximum matching.
    pub fn minimum_cover(&self, matching: &Matching) -> LineCover {
        let rows = self.adj.len();
        let mut row_marked = vec![false; rows];
        let mut col_marked = vec![false; self.cols];
        let mut queue: VecDeque<usize> = (0..rows)
            .filter(|&r| matching.row_to_col[r].is_none())
            .collect();
        for &r in &queue {
            row_marked[r] = true;
        }

        while let Some(row) = queue.pop_front() {
            for &col in &self.adj[row] {
                if col_marked[col] {
                    continue;
                }
                col_marked[col] = true;
                if let Some(next) = matching.col_to_row[col] {
                    if !row_marked[next] {
                        row_marked[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        LineCover::from_lines(
            (0..rows).filter(|&r| !row_marked[r]),
            (0..self.cols).filter(|&c| col_marked[c]),
        )
    }
}

/// Finds a minimum set of rows and columns covering every zero of `matrix`.
///
/// Only whether a cell is zero (`|v| <= epsilon`) matters. An empty
/// matrix, or one without zeros, yields an empty cover.
///
/// # Example
/// ```
/// use u_allocation::hungarian::find_min_cover;
/// use u_allocation::models::CostMatrix;
///
/// let m = CostMatrix::from(vec![vec![0, 0, 5], vec![0, 3, 4], vec![0, 2, 1]]);
/// let cover = find_min_cover(&m, 1e-9);
/// assert_eq!(cover.line_count(), 2); // column A + row 1
/// ```
pub fn find_min_cover(matrix: &CostMatrix, epsilon: f64) -> LineCover {
    find_admissible_cover(matrix, None, epsilon)
}

/// Like [`find_min_cover`], but restricted cells never count as zeros.
pub fn find_admissible_cover(
    matrix: &CostMatrix,
    restrictions: Option<&RestrictionMask>,
    epsilon: f64,
) -> LineCover {
    let graph = ZeroGraph::from_matrix(matrix, restrictions, epsilon);
    let matching = graph.maximum_matching();
    let cover = graph.minimum_cover(&matching);
    debug_assert_eq!(cover.line_count(), matching.size());
    cover
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-9;

    fn covers_all_zeros(m: &CostMatrix, cover: &LineCover) -> bool {
        m.iter_cells()
            .filter(|&(_, _, v)| v.abs() <= EPS)
            .all(|(r, c, _)| cover.covers_row(r) || cover.covers_col(c))
    }

    /// Smallest cover by enumerating every row subset; the columns are
    /// then forced (every zero outside the chosen rows).
    fn brute_force_cover_size(m: &CostMatrix) -> usize {
        let (rows, cols) = (m.rows(), m.cols());
        let mut best = usize::MAX;
        for mask in 0u32..(1 << rows) {
            let mut needed_cols = vec![false; cols];
            for (r, c, v) in m.iter_cells() {
                if v.abs() <= EPS && mask & (1 << r) == 0 {
                    needed_cols[c] = true;
                }
            }
            let size = mask.count_ones() as usize + needed_cols.iter().filter(|&&b| b).count();
            best = best.min(size);
        }
        best
    }

    #[test]
    fn test_empty_matrix() {
        let cover = find_min_cover(&CostMatrix::default(), EPS);
        assert_eq!(cover.line_count(), 0);
    }

    #[test]
    fn test_no_zeros() {
        let m = CostMatrix::from(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(find_min_cover(&m, EPS).line_count(), 0);
    }

    #[test]
    fn test_single_row_of_zeros() {
        // Several zeros in one row: one row line, not one line per zero.
        let m = CostMatrix::from(vec![vec![0, 0, 0], vec![1, 2, 3], vec![4, 5, 6]]);
        let cover = find_min_cover(&m, EPS);
        assert_eq!(cover.line_count(), 1);
        assert!(cover.covers_row(0));
    }

    #[test]
    fn test_identity_needs_full_cover() {
        let m = CostMatrix::from(vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]]);
        assert_eq!(find_min_cover(&m, EPS).line_count(), 3);
    }

    #[test]
    fn test_known_pattern() {
        // Row 3 shares its zero columns with rows 1 and 2.
        let m = CostMatrix::from(vec![
            vec![0, 0, 0, 2, 0],
            vec![4, 2, 0, 8, 2],
            vec![0, 1, 2, 1, 4],
            vec![0, 2, 0, 2, 2],
            vec![2, 0, 2, 0, 4],
        ]);
        let cover = find_min_cover(&m, EPS);
        assert!(covers_all_zeros(&m, &cover));
        assert_eq!(cover.line_count(), brute_force_cover_size(&m));
        assert_eq!(cover.line_count(), 4);
    }

    #[test]
    fn test_near_zero_counts_as_zero() {
        let m = CostMatrix::new(vec![vec![1e-12, 1.0], vec![1.0, 1.0]]);
        assert_eq!(find_min_cover(&m, EPS).line_count(), 1);
    }

    #[test]
    fn test_restricted_zero_ignored() {
        let m = CostMatrix::from(vec![vec![0, 1], vec![1, 0]]);
        let mask = RestrictionMask::none(2, 2).with_restricted(0, 0);
        let cover = find_admissible_cover(&m, Some(&mask), EPS);
        assert_eq!(cover.line_count(), 1);
        assert!(cover.covers_row(1) || cover.covers_col(1));
    }

    #[test]
    fn test_rectangular_matrix() {
        let m = CostMatrix::from(vec![vec![0, 0, 0, 0], vec![0, 1, 1, 1]]);
        let cover = find_min_cover(&m, EPS);
        assert!(covers_all_zeros(&m, &cover));
        assert_eq!(cover.line_count(), 2);
    }

    #[test]
    fn test_matching_size_equals_cover_size() {
        let m = CostMatrix::from(vec![
            vec![0, 3, 0, 1],
            vec![0, 0, 2, 5],
            vec![4, 0, 6, 0],
            vec![7, 8, 0, 9],
        ]);
        let graph = ZeroGraph::from_matrix(&m, None, EPS);
        let matching = graph.maximum_matching();
        assert_eq!(matching.size(), 4);
        assert_eq!(graph.minimum_cover(&matching).line_count(), 4);
    }

    #[test]
    fn test_cover_ragged_rows_use_widest_row() {
        let m = CostMatrix::new(vec![vec![1.0], vec![5.0, 0.0]]);
        let cover = find_min_cover(&m, EPS);
        assert_eq!(cover, LineCover::from_lines([1], Vec::new()));
    }

    #[test]
    fn test_cover_minimal_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..300 {
            let rows = rng.random_range(1..=5);
            let cols = rng.random_range(1..=5);
            let cells: Vec<Vec<i64>> = (0..rows)
                .map(|_| (0..cols).map(|_| rng.random_range(0..3)).collect())
                .collect();
            let m = CostMatrix::from(cells);

            let cover = find_min_cover(&m, EPS);
            assert!(covers_all_zeros(&m, &cover), "cover misses a zero in {m:?}");
            assert_eq!(
                cover.line_count(),
                brute_force_cover_size(&m),
                "cover not minimal for {m:?}"
            );
        }
    }
}
