//! Solution models.
//!
//! Solutions are returned by value and never mutated by the solvers
//! afterwards. Costs are always computed on the caller's original
//! matrix, before any maximization transform, padding or reduction.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{CostMatrix, DummyLine, HungarianStep, ModiStep, ProblemType, VamStep};

/// A one-to-one set of `(row, column)` pairs.
///
/// At most one pair per row and per column. Pairs are kept sorted by row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assignment {
    pairs: Vec<(usize, usize)>,
}

impl Assignment {
    /// Creates an assignment from pairs (sorted by row on construction).
    pub fn new(mut pairs: Vec<(usize, usize)>) -> Self {
        pairs.sort_unstable();
        Self { pairs }
    }

    /// The pairs, sorted by row.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether `(row, col)` is part of the assignment.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.pairs.binary_search(&(row, col)).is_ok()
    }

    /// Column assigned to `row`.
    pub fn column_for(&self, row: usize) -> Option<usize> {
        self.pairs.iter().find(|p| p.0 == row).map(|p| p.1)
    }

    /// Row assigned to `col`.
    pub fn row_for(&self, col: usize) -> Option<usize> {
        self.pairs.iter().find(|p| p.1 == col).map(|p| p.0)
    }

    /// Whether no row or column appears twice.
    pub fn is_one_to_one(&self) -> bool {
        let mut rows = HashSet::new();
        let mut cols = HashSet::new();
        self.pairs
            .iter()
            .all(|&(r, c)| rows.insert(r) && cols.insert(c))
    }

    /// Sum of `costs[r][c]` over all pairs.
    pub fn cost(&self, costs: &CostMatrix) -> f64 {
        self.pairs.iter().map(|&(r, c)| costs.get(r, c)).sum()
    }
}

/// A recoverable irregularity observed during a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolveWarning {
    /// Every cell of the row is restricted; row reduction was skipped.
    AllCellsRestricted { row: usize },
    /// The zero-scan passes assigned fewer pairs than required.
    IncompleteExtraction { assigned: usize, required: usize },
    /// Pair chosen without a zero behind it.
    FallbackPair {
        row: usize,
        col: usize,
        restricted: bool,
    },
    /// Zero-allocation cells added to complete a degenerate basis.
    BasisCompleted { cells: Vec<(usize, usize)> },
}

/// Result of an assignment solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSolution {
    /// Pairs between real rows and real columns.
    pub assignment: Assignment,
    /// Pairs involving a dummy row or column (indices in the squared matrix).
    pub dummy_pairs: Vec<(usize, usize)>,
    /// Sum of original costs over `assignment`.
    pub total_cost: f64,
    /// Objective direction the problem was solved for.
    pub problem_type: ProblemType,
    /// Number of real rows.
    pub rows: usize,
    /// Number of real columns.
    pub cols: usize,
    /// Number of adjust iterations performed.
    pub iterations: usize,
    /// Recoverable irregularities.
    pub warnings: Vec<SolveWarning>,
    /// Intermediate states (empty unless step recording is enabled).
    pub steps: Vec<HungarianStep>,
}

impl AssignmentSolution {
    /// Whether the solve finished without any warning.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Label of a row: `1, 2, ...`, or `Dummy k` past the real rows.
    pub fn row_label(&self, row: usize) -> String {
        if row < self.rows {
            (row + 1).to_string()
        } else {
            format!("Dummy {}", row - self.rows + 1)
        }
    }

    /// Label of a column: `A, B, ..., Z, AA, ...`, or `Dummy k` past the
    /// real columns.
    pub fn col_label(&self, col: usize) -> String {
        if col < self.cols {
            column_letters(col)
        } else {
            format!("Dummy {}", col - self.cols + 1)
        }
    }

    /// One line per real pair, e.g. `1 -> B`.
    pub fn summary(&self) -> Vec<String> {
        self.assignment
            .pairs()
            .iter()
            .map(|&(r, c)| format!("{} -> {}", self.row_label(r), self.col_label(c)))
            .collect()
    }
}

fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Quantities shipped from each source to each destination (m × n).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Allocation {
    cells: Vec<Vec<f64>>,
}

impl Allocation {
    /// Creates an all-zero allocation.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![0.0; cols]; rows],
        }
    }

    /// Creates an allocation from row vectors.
    pub fn new(cells: Vec<Vec<f64>>) -> Self {
        Self { cells }
    }

    /// Number of sources.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of destinations.
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Quantity at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row][col]
    }

    /// Sets the quantity at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, quantity: f64) {
        self.cells[row][col] = quantity;
    }

    /// Adds `delta` to `(row, col)`.
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, delta: f64) {
        self.cells[row][col] += delta;
    }

    /// All rows.
    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.cells
    }

    /// Consumes the allocation and returns its rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.cells
    }

    /// Quantity shipped per source.
    pub fn row_sums(&self) -> Vec<f64> {
        self.cells.iter().map(|r| r.iter().sum()).collect()
    }

    /// Quantity received per destination.
    pub fn column_sums(&self) -> Vec<f64> {
        (0..self.cols())
            .map(|c| self.cells.iter().map(|r| r[c]).sum())
            .collect()
    }

    /// Cells with quantity above `epsilon`, row-major.
    pub fn basic_cells(&self, epsilon: f64) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &q) in row.iter().enumerate() {
                if q > epsilon {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    /// Total shipping cost `Σ allocation[i][j] * costs[i][j]`.
    pub fn cost(&self, costs: &CostMatrix) -> f64 {
        let mut total = 0.0;
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &q) in row.iter().enumerate() {
                total += q * costs.get(r, c);
            }
        }
        total
    }

    /// Returns a copy without row `row`.
    pub fn without_row(&self, row: usize) -> Self {
        let mut cells = self.cells.clone();
        if row < cells.len() {
            cells.remove(row);
        }
        Self { cells }
    }

    /// Returns a copy without column `col`.
    pub fn without_column(&self, col: usize) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|r| {
                    let mut r = r.clone();
                    if col < r.len() {
                        r.remove(col);
                    }
                    r
                })
                .collect(),
        }
    }

    /// Returns a copy with the synthetic line removed.
    pub fn without_dummy(&self, dummy: Option<&DummyLine>) -> Self {
        match dummy {
            Some(DummyLine::Source { index, .. }) => self.without_row(*index),
            Some(DummyLine::Destination { index, .. }) => self.without_column(*index),
            None => self.clone(),
        }
    }
}

/// Result of a transportation solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationSolution {
    /// Optimal allocation on the caller's sources and destinations.
    pub allocation: Allocation,
    /// Cost of `allocation` on the original costs.
    pub total_cost: f64,
    /// VAM starting allocation (dummy line stripped).
    pub initial_allocation: Allocation,
    /// Cost of `initial_allocation`.
    pub initial_cost: f64,
    /// Synthetic line added to balance the problem, if any.
    pub dummy: Option<DummyLine>,
    /// Number of MODI pivots.
    pub iterations: usize,
    /// Recoverable irregularities.
    pub warnings: Vec<SolveWarning>,
    /// VAM rounds (empty unless step recording is enabled).
    pub vam_steps: Vec<VamStep>,
    /// MODI pivots (empty unless step recording is enabled).
    pub modi_steps: Vec<ModiStep>,
}

impl TransportationSolution {
    /// Cost saved by MODI over the VAM starting solution.
    pub fn improvement(&self) -> f64 {
        self.initial_cost - self.total_cost
    }
}
