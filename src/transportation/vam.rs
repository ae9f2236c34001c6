//! Vogel's approximation method (VAM).
//!
//! Builds a basic feasible starting allocation for a balanced
//! transportation problem.
//!
//! # Algorithm
//! Each round:
//! 1. Row penalty = difference between the two smallest costs over
//!    active columns (the cost itself if one column is left).
//! 2. Column penalties likewise over active rows.
//! 3. The line with the highest penalty is selected. Ties go to rows
//!    before columns, then to the lowest index.
//! 4. Its cheapest active cell (lowest index on ties) receives
//!    `min(remaining supply, remaining demand)`.
//! 5. Exhausted rows and columns leave the active set.
//!
//! Rounds continue while an active row and an active column remain.
//! Every round exhausts at least one line, so there are at most
//! `m + n - 1` rounds.
//!
//! # Reference
//! Reinfeld & Vogel (1958), "Mathematical Programming"

use tracing::{debug, trace};

use crate::config::{tolerance, DEFAULT_EPSILON};
use crate::models::{Allocation, CostMatrix, PenaltyLine, VamStep};

/// Result of a VAM run.
#[derive(Debug, Clone, PartialEq)]
pub struct VamOutcome {
    /// Starting allocation.
    pub allocation: Allocation,
    /// `Σ allocation[i][j] * costs[i][j]`.
    pub total_cost: f64,
    /// Allocation rounds (empty unless step recording is enabled).
    pub steps: Vec<VamStep>,
}

/// Vogel's approximation method.
///
/// # Example
/// ```
/// use u_allocation::models::CostMatrix;
/// use u_allocation::transportation::VogelAllocator;
///
/// let costs = CostMatrix::from(vec![
///     vec![19, 30, 50, 10],
///     vec![70, 30, 40, 60],
///     vec![40, 8, 70, 20],
/// ]);
/// let supply = [7.0, 9.0, 18.0];
/// let demand = [5.0, 8.0, 7.0, 14.0];
/// let outcome = VogelAllocator::new().allocate(&supply, &demand, &costs);
/// assert_eq!(outcome.total_cost, 779.0);
/// ```
#[derive(Debug, Clone)]
pub struct VogelAllocator {
    epsilon: f64,
    record_steps: bool,
}

impl Default for VogelAllocator {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            record_steps: false,
        }
    }
}

impl VogelAllocator {
    /// Creates an allocator with default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tolerance below which a remaining quantity is exhausted.
    /// Negative values are taken as their magnitude; non-finite values
    /// fall back to [`DEFAULT_EPSILON`].
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = tolerance(epsilon);
        self
    }

    /// Enables or disables step recording.
    pub fn with_record_steps(mut self, record: bool) -> Self {
        self.record_steps = record;
        self
    }

    /// Allocates `supply` to `demand` over `costs` (m × n).
    ///
    /// The problem should be balanced. Otherwise allocation stops once
    /// either side is exhausted and the other keeps a remainder.
    pub fn allocate(&self, supply: &[f64], demand: &[f64], costs: &CostMatrix) -> VamOutcome {
        let eps = self.epsilon;
        let (m, n) = (supply.len(), demand.len());
        let mut remaining_supply = supply.to_vec();
        let mut remaining_demand = demand.to_vec();
        let mut active_rows: Vec<bool> = supply.iter().map(|&s| s > eps).collect();
        let mut active_cols: Vec<bool> = demand.iter().map(|&d| d > eps).collect();
        let mut allocation = Allocation::zeros(m, n);
        let mut steps = Vec::new();

        while active_rows.contains(&true) && active_cols.contains(&true) {
            let row_penalties: Vec<Option<f64>> = (0..m)
                .map(|i| {
                    let line = (0..n).filter(|&j| active_cols[j]).map(|j| costs.get(i, j));
                    if active_rows[i] { penalty(line) } else { None }
                })
                .collect();
            let col_penalties: Vec<Option<f64>> = (0..n)
                .map(|j| {
                    let line = (0..m).filter(|&i| active_rows[i]).map(|i| costs.get(i, j));
                    if active_cols[j] { penalty(line) } else { None }
                })
                .collect();

            let Some(selected) = select_line(&row_penalties, &col_penalties, eps) else {
                break;
            };
            let cell = match selected {
                PenaltyLine::Row(i) => {
                    cheapest((0..n).filter(|&j| active_cols[j]).map(|j| (i, j)), costs)
                }
                PenaltyLine::Column(j) => {
                    cheapest((0..m).filter(|&i| active_rows[i]).map(|i| (i, j)), costs)
                }
            };
            let Some((i, j)) = cell else {
                break;
            };

            let quantity = remaining_supply[i].min(remaining_demand[j]);
            allocation.add(i, j, quantity);
            remaining_supply[i] -= quantity;
            remaining_demand[j] -= quantity;
            if remaining_supply[i] <= eps {
                remaining_supply[i] = 0.0;
                active_rows[i] = false;
            }
            if remaining_demand[j] <= eps {
                remaining_demand[j] = 0.0;
                active_cols[j] = false;
            }

            debug!(?selected, row = i, col = j, quantity, "vam allocation");
            if self.record_steps {
                steps.push(VamStep {
                    row_penalties,
                    col_penalties,
                    selected,
                    cell: (i, j),
                    quantity,
                });
            }
        }

        let total_cost = allocation.cost(costs);
        trace!(allocation = ?allocation, total_cost, "vam finished");
        VamOutcome {
            allocation,
            total_cost,
            steps,
        }
    }
}

/// Gap between the two smallest costs, or the single cost if only one
/// is given. `None` for an empty line.
fn penalty(costs: impl Iterator<Item = f64>) -> Option<f64> {
    let mut lowest: Option<f64> = None;
    let mut second: Option<f64> = None;
    for c in costs {
        match lowest {
            Some(l) if c < l => {
                second = lowest;
                lowest = Some(c);
            }
            Some(_) => {
                if second.map_or(true, |s| c < s) {
                    second = Some(c);
                }
            }
            None => lowest = Some(c),
        }
    }
    match (lowest, second) {
        (Some(l), Some(s)) => Some(s - l),
        (Some(l), None) => Some(l),
        _ => None,
    }
}

/// Highest penalty; rows win ties against columns, lower indices win
/// ties within a side.
fn select_line(
    row_penalties: &[Option<f64>],
    col_penalties: &[Option<f64>],
    epsilon: f64,
) -> Option<PenaltyLine> {
    let rows = row_penalties
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.map(|p| (PenaltyLine::Row(i), p)));
    let cols = col_penalties
        .iter()
        .enumerate()
        .filter_map(|(j, p)| p.map(|p| (PenaltyLine::Column(j), p)));

    let mut best: Option<(PenaltyLine, f64)> = None;
    for (line, p) in rows.chain(cols) {
        if best.map_or(true, |(_, b)| p > b + epsilon) {
            best = Some((line, p));
        }
    }
    best.map(|(line, _)| line)
}

/// Cheapest cell, first one on ties.
fn cheapest(
    cells: impl Iterator<Item = (usize, usize)>,
    costs: &CostMatrix,
) -> Option<(usize, usize)> {
    let mut best: Option<((usize, usize), f64)> = None;
    for (i, j) in cells {
        let c = costs.get(i, j);
        if best.map_or(true, |(_, b)| c < b) {
            best = Some(((i, j), c));
        }
    }
    best.map(|(cell, _)| cell)
}
