//! Classical allocation solvers for the U-Engine ecosystem.
//!
//! Solves two textbook operations-research problems on plain in-memory
//! matrices:
//!
//! - **Assignment**: one-to-one pairing of rows and columns at minimum
//!   (or maximum) total cost, with optional forbidden pairings, via the
//!   Hungarian method.
//! - **Transportation**: shipping supply to demand at minimum cost via
//!   Vogel's approximation method followed by MODI.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `CostMatrix`, `RestrictionMask`,
//!   `AssignmentProblem`, `TransportationProblem`, solutions and step traces
//! - **`hungarian`**: Line cover (König), reductions, extraction, `HungarianSolver`
//! - **`transportation`**: Balancing, `VogelAllocator`, `ModiOptimizer`,
//!   `TransportationSolver`
//! - **`validation`**: Input shape checks, reporting every problem found
//! - **`config`**: Tolerance, iteration caps, degeneracy handling
//!
//! # Quick Start
//!
//! ```
//! use u_allocation::{solve_assignment, solve_transportation, ProblemType};
//!
//! let costs = vec![
//!     vec![9, 2, 7, 8],
//!     vec![6, 4, 3, 7],
//!     vec![5, 8, 1, 8],
//!     vec![7, 6, 9, 4],
//! ];
//! let solution = solve_assignment(costs, ProblemType::Minimization, None).unwrap();
//! assert_eq!(solution.total_cost, 13.0);
//!
//! let plan = solve_transportation(
//!     vec![7.0, 9.0, 18.0],
//!     vec![5.0, 8.0, 7.0, 14.0],
//!     vec![vec![19, 30, 50, 10], vec![70, 30, 40, 60], vec![40, 8, 70, 20]],
//! )
//! .unwrap();
//! assert_eq!(plan.total_cost, 743.0);
//! ```
//!
//! Every solve is a pure function of its inputs; solvers hold no state
//! between calls and can be shared across threads.
//!
//! # References
//!
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Reinfeld & Vogel (1958), "Mathematical Programming"
//! - Taha (2017), "Operations Research: An Introduction", ch. 5

pub mod config;
pub mod error;
pub mod hungarian;
pub mod models;
pub mod transportation;
pub mod validation;

pub use config::{DegeneracyStrategy, SolverConfig, DEFAULT_EPSILON};
pub use error::{SolveError, SolveResult, SolverPhase};
pub use models::{
    AssignmentSolution, CostMatrix, LineCover, ProblemType, RestrictionMask,
    TransportationSolution,
};

use hungarian::HungarianSolver;
use models::{AssignmentProblem, TransportationProblem};
use transportation::TransportationSolver;

/// Solves an assignment problem with the default configuration.
///
/// Rectangular matrices are padded with zero-cost dummy lines; pairs on
/// dummy lines are reported in [`AssignmentSolution::dummy_pairs`] and
/// excluded from the total.
pub fn solve_assignment(
    costs: impl Into<CostMatrix>,
    problem_type: ProblemType,
    restrictions: Option<RestrictionMask>,
) -> SolveResult<AssignmentSolution> {
    let mut problem = AssignmentProblem::new(costs).with_problem_type(problem_type);
    if let Some(mask) = restrictions {
        problem = problem.with_restrictions(mask);
    }
    HungarianSolver::new().solve(&problem)
}

/// Minimum set of rows and columns covering every zero of `matrix`.
///
/// Values with `|v| <= DEFAULT_EPSILON` count as zero. A matrix without
/// cells yields an empty cover.
///
/// # Errors
/// [`SolveError::InvalidInput`] for a ragged matrix or non-finite values.
pub fn solve_line_cover(matrix: &CostMatrix) -> SolveResult<LineCover> {
    if matrix.as_rows().iter().all(Vec::is_empty) {
        return Ok(LineCover::new());
    }
    validation::validate_matrix(matrix).map_err(SolveError::InvalidInput)?;
    Ok(hungarian::find_min_cover(matrix, DEFAULT_EPSILON))
}

/// Solves a transportation problem with the default configuration.
///
/// Unequal totals are balanced with a zero-cost dummy line, which is
/// stripped from the returned allocation.
pub fn solve_transportation(
    supply: Vec<f64>,
    demand: Vec<f64>,
    costs: impl Into<CostMatrix>,
) -> SolveResult<TransportationSolution> {
    TransportationSolver::new().solve(&TransportationProblem::new(supply, demand, costs))
}
