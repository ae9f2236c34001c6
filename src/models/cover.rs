//! Line cover model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of covered rows and columns.
///
/// Together the lines cover every zero of the matrix they were computed
/// for. Indices are kept sorted for deterministic output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineCover {
    /// Covered row indices.
    pub rows: BTreeSet<usize>,
    /// Covered column indices.
    pub cols: BTreeSet<usize>,
}

impl LineCover {
    /// Creates an empty cover.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cover from explicit row and column indices.
    pub fn from_lines(
        rows: impl IntoIterator<Item = usize>,
        cols: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            cols: cols.into_iter().collect(),
        }
    }

    /// Total number of lines (`|rows| + |cols|`).
    #[inline]
    pub fn line_count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    /// Whether the row is covered.
    #[inline]
    pub fn covers_row(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Whether the column is covered.
    #[inline]
    pub fn covers_col(&self, col: usize) -> bool {
        self.cols.contains(&col)
    }

    /// Number of lines through `(row, col)`: 0, 1 or 2.
    pub fn coverage(&self, row: usize, col: usize) -> u8 {
        u8::from(self.covers_row(row)) + u8::from(self.covers_col(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_counts() {
        let cover = LineCover::from_lines([0], [2]);
        assert_eq!(cover.line_count(), 2);
        assert_eq!(cover.coverage(0, 2), 2);
        assert_eq!(cover.coverage(0, 1), 1);
        assert_eq!(cover.coverage(1, 2), 1);
        assert_eq!(cover.coverage(1, 1), 0);
    }
}
