//! Intermediate solver states.
//!
//! Recorded only when [`crate::SolverConfig::record_steps`] is set. Each
//! step owns a copy of the matrix it describes, so a caller can replay
//! the method one state at a time (e.g. to render it).

use serde::{Deserialize, Serialize};

use super::{Allocation, CostMatrix, LineCover};

/// One state transition of the Hungarian method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HungarianStep {
    /// Maximization converted: every cell replaced by `max_value - v`.
    Normalized { max_value: f64, matrix: CostMatrix },
    /// Dummy rows/columns appended to make the matrix square.
    Squared {
        dummy_rows: usize,
        dummy_cols: usize,
        matrix: CostMatrix,
    },
    /// Row minima subtracted. `None` marks a fully restricted row.
    RowReduced {
        minima: Vec<Option<f64>>,
        matrix: CostMatrix,
    },
    /// Column minima subtracted. `None` marks a column that already had a zero.
    ColumnReduced {
        minima: Vec<Option<f64>>,
        matrix: CostMatrix,
    },
    /// Minimum line cover computed.
    Covered { iteration: usize, cover: LineCover },
    /// Uncovered minimum subtracted, intersections increased.
    Adjusted {
        iteration: usize,
        min_value: f64,
        matrix: CostMatrix,
    },
}

/// A row or column picked by Vogel's penalty rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenaltyLine {
    /// Source row.
    Row(usize),
    /// Destination column.
    Column(usize),
}

/// One allocation round of Vogel's approximation method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VamStep {
    /// Row penalties (`None` = row exhausted).
    pub row_penalties: Vec<Option<f64>>,
    /// Column penalties (`None` = column exhausted).
    pub col_penalties: Vec<Option<f64>>,
    /// Line with the highest penalty.
    pub selected: PenaltyLine,
    /// Cheapest active cell on the selected line.
    pub cell: (usize, usize),
    /// Quantity shipped through `cell`.
    pub quantity: f64,
}

/// One pivot of the MODI method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModiStep {
    /// Row potentials.
    pub u: Vec<f64>,
    /// Column potentials.
    pub v: Vec<f64>,
    /// Cell entering the basis.
    pub entering: (usize, usize),
    /// Opportunity cost of the entering cell (negative).
    pub delta: f64,
    /// Closed loop, starting at the entering cell. Even positions gain θ.
    pub cycle: Vec<(usize, usize)>,
    /// Quantity moved around the loop.
    pub theta: f64,
    /// Allocation after the pivot.
    pub allocation: Allocation,
    /// Total cost after the pivot.
    pub cost: f64,
}
