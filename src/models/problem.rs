//! Problem definitions.
//!
//! An [`AssignmentProblem`] pairs rows (agents) with columns (jobs) one to
//! one. A [`TransportationProblem`] ships quantities from sources to
//! destinations under supply and demand limits.
//!
//! # Reference
//! Taha (2017), "Operations Research: An Introduction", Ch. 5

use serde::{Deserialize, Serialize};

use super::{CostMatrix, RestrictionMask};

/// Objective direction of an assignment problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProblemType {
    /// Minimize total cost.
    #[default]
    Minimization,
    /// Maximize total value (converted to minimization internally).
    Maximization,
}

/// An assignment problem: cost matrix, direction, optional forbidden cells.
///
/// The matrix may be rectangular; the solver balances it with zero-cost
/// dummy rows or columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentProblem {
    /// Original costs (rows × columns).
    pub costs: CostMatrix,
    /// Minimization or maximization.
    pub problem_type: ProblemType,
    /// Cells that may never be assigned. `None` = no restrictions.
    pub restrictions: Option<RestrictionMask>,
}

impl AssignmentProblem {
    /// Creates a minimization problem without restrictions.
    pub fn new(costs: impl Into<CostMatrix>) -> Self {
        Self {
            costs: costs.into(),
            problem_type: ProblemType::Minimization,
            restrictions: None,
        }
    }

    /// Sets the objective direction.
    pub fn with_problem_type(mut self, problem_type: ProblemType) -> Self {
        self.problem_type = problem_type;
        self
    }

    /// Shorthand for `with_problem_type(ProblemType::Maximization)`.
    pub fn maximize(self) -> Self {
        self.with_problem_type(ProblemType::Maximization)
    }

    /// Sets the restriction mask.
    pub fn with_restrictions(mut self, restrictions: impl Into<RestrictionMask>) -> Self {
        self.restrictions = Some(restrictions.into());
        self
    }

    /// Number of real rows.
    pub fn rows(&self) -> usize {
        self.costs.rows()
    }

    /// Number of real columns.
    pub fn cols(&self) -> usize {
        self.costs.cols()
    }

    /// Whether `(row, col)` is forbidden.
    pub fn is_restricted(&self, row: usize, col: usize) -> bool {
        self.restrictions
            .as_ref()
            .is_some_and(|m| m.is_restricted(row, col))
    }
}

/// A transportation problem.
///
/// `supply[i]` is available at source `i`, `demand[j]` is required at
/// destination `j`, and `costs[i][j]` is the unit shipping cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationProblem {
    /// Quantity available per source (length m).
    pub supply: Vec<f64>,
    /// Quantity required per destination (length n).
    pub demand: Vec<f64>,
    /// Unit costs (m × n).
    pub costs: CostMatrix,
}

impl TransportationProblem {
    /// Creates a transportation problem.
    pub fn new(supply: Vec<f64>, demand: Vec<f64>, costs: impl Into<CostMatrix>) -> Self {
        Self {
            supply,
            demand,
            costs: costs.into(),
        }
    }

    /// Number of sources.
    pub fn sources(&self) -> usize {
        self.supply.len()
    }

    /// Number of destinations.
    pub fn destinations(&self) -> usize {
        self.demand.len()
    }

    /// Sum of all supply.
    pub fn total_supply(&self) -> f64 {
        self.supply.iter().sum()
    }

    /// Sum of all demand.
    pub fn total_demand(&self) -> f64 {
        self.demand.iter().sum()
    }

    /// Whether total supply equals total demand within `epsilon`.
    pub fn is_balanced(&self, epsilon: f64) -> bool {
        (self.total_supply() - self.total_demand()).abs() <= epsilon
    }
}

/// A zero-cost line synthesised to balance supply and demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DummyLine {
    /// Extra source row absorbing unmet demand.
    Source { index: usize, quantity: f64 },
    /// Extra destination column absorbing surplus supply.
    Destination { index: usize, quantity: f64 },
}

impl DummyLine {
    /// Quantity carried by the dummy line.
    pub fn quantity(&self) -> f64 {
        match self {
            Self::Source { quantity, .. } | Self::Destination { quantity, .. } => *quantity,
        }
    }
}
