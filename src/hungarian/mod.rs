//! Hungarian method for the assignment problem.
//!
//! # Algorithm
//!
//! 1. Maximization → minimization (`v -> max - v`).
//! 2. Balance to n × n with zero-cost dummy rows or columns.
//! 3. Row reduction, then column reduction for columns without a zero.
//! 4. Cover all zeros with the minimum number of lines. If the cover has
//!    n lines the matrix holds an optimal assignment; otherwise subtract
//!    the smallest uncovered value from every uncovered cell, add it to
//!    every intersection, and cover again.
//! 5. Read the assignment off the zeros.
//!
//! Restricted cells never act as zeros. The adjust loop is capped (see
//! [`SolverConfig::adjust_cap`]) and fails with
//! [`SolveError::NonConvergence`] when the cap is hit.
//!
//! # Reference
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Munkres (1957), "Algorithms for the Assignment and Transportation Problems"

mod cover;
mod extraction;
mod reduction;

pub use cover::{find_admissible_cover, find_min_cover};
pub use reduction::{adjust, normalize, reduce_columns, reduce_rows, square};

use tracing::{debug, info, trace, warn};

use crate::config::SolverConfig;
use crate::error::{SolveError, SolveResult, SolverPhase};
use crate::models::{
    Assignment, AssignmentProblem, AssignmentSolution, HungarianStep, RestrictionMask,
    SolveWarning,
};
use crate::validation::validate_assignment;

/// Hungarian-method solver.
///
/// # Example
/// ```
/// use u_allocation::hungarian::HungarianSolver;
/// use u_allocation::models::AssignmentProblem;
///
/// let problem = AssignmentProblem::new(vec![
///     vec![9, 2, 7, 8],
///     vec![6, 4, 3, 7],
///     vec![5, 8, 1, 8],
///     vec![7, 6, 9, 4],
/// ]);
/// let solution = HungarianSolver::new().solve(&problem).unwrap();
/// assert_eq!(solution.total_cost, 13.0);
/// assert_eq!(solution.assignment.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HungarianSolver {
    config: SolverConfig,
}

impl HungarianSolver {
    /// Creates a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves an assignment problem.
    ///
    /// # Errors
    /// - [`SolveError::InvalidInput`] for empty, ragged or non-finite
    ///   costs, or a restriction mask of the wrong shape.
    /// - [`SolveError::NonConvergence`] if the adjust loop hits its cap.
    pub fn solve(&self, problem: &AssignmentProblem) -> SolveResult<AssignmentSolution> {
        validate_assignment(problem).map_err(SolveError::InvalidInput)?;

        let eps = self.config.epsilon;
        let record = self.config.record_steps;
        let mask = problem.restrictions.as_ref();
        let (rows, cols) = (problem.rows(), problem.cols());
        let mut steps = Vec::new();
        let mut warnings = Vec::new();

        let (normalized, max_value) = normalize(&problem.costs, problem.problem_type);
        if let Some(max_value) = max_value.filter(|_| record) {
            steps.push(HungarianStep::Normalized {
                max_value,
                matrix: normalized.clone(),
            });
        }

        // Padding needs no mask change: cells outside the mask are unrestricted.
        let (squared, dummy_rows, dummy_cols) = square(&normalized);
        let n = squared.rows();
        if record && (dummy_rows > 0 || dummy_cols > 0) {
            steps.push(HungarianStep::Squared {
                dummy_rows,
                dummy_cols,
                matrix: squared.clone(),
            });
        }

        let (row_reduced, minima) = reduce_rows(&squared, mask);
        for (row, _) in minima.iter().enumerate().filter(|(_, m)| m.is_none()) {
            warn!(row, "every cell of the row is restricted, skipping reduction");
            warnings.push(SolveWarning::AllCellsRestricted { row });
        }
        trace!(matrix = ?row_reduced, "row reduced");
        if record {
            steps.push(HungarianStep::RowReduced {
                minima,
                matrix: row_reduced.clone(),
            });
        }

        let (mut matrix, minima) = reduce_columns(&row_reduced, mask, eps);
        trace!(matrix = ?matrix, "column reduced");
        if record {
            steps.push(HungarianStep::ColumnReduced {
                minima,
                matrix: matrix.clone(),
            });
        }

        let cap = self.config.adjust_cap(n);
        let mut iterations = 0;
        loop {
            let cover = find_admissible_cover(&matrix, mask, eps);
            let lines = cover.line_count();
            debug!(iteration = iterations, lines, dimension = n, "zeros covered");
            if record {
                steps.push(HungarianStep::Covered {
                    iteration: iterations,
                    cover: cover.clone(),
                });
            }
            if lines >= n {
                break;
            }

            let Some((adjusted, min_value)) = adjust(&matrix, &cover, mask) else {
                debug!(lines, dimension = n, "no uncovered admissible cell left");
                break;
            };
            if iterations >= cap {
                return Err(SolveError::NonConvergence {
                    phase: SolverPhase::HungarianAdjust,
                    iterations,
                    detail: format!("last cover has {lines} of {n} lines"),
                });
            }
            iterations += 1;
            trace!(matrix = ?adjusted, min_value, "adjusted");
            if record {
                steps.push(HungarianStep::Adjusted {
                    iteration: iterations,
                    min_value,
                    matrix: adjusted.clone(),
                });
            }
            matrix = adjusted;
        }

        let extraction = extraction::extract(&matrix, mask, eps);
        warnings.extend(extraction.warnings);

        let (real, dummy_pairs): (Vec<_>, Vec<_>) = extraction
            .pairs
            .into_iter()
            .partition(|&(r, c)| r < rows && c < cols);
        let assignment = Assignment::new(real);
        let total_cost = assignment.cost(&problem.costs);

        info!(
            rows,
            cols,
            restricted = mask.map_or(0, RestrictionMask::restricted_count),
            iterations,
            total_cost,
            warnings = warnings.len(),
            "assignment solved"
        );

        Ok(AssignmentSolution {
            assignment,
            dummy_pairs,
            total_cost,
            problem_type: problem.problem_type,
            rows,
            cols,
            iterations,
            warnings,
            steps,
        })
    }
}
