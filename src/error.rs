//! Solver errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::ValidationError;

/// Loop that exceeded its iteration cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverPhase {
    /// Hungarian cover → adjust loop.
    HungarianAdjust,
    /// MODI pivot loop.
    ModiPivot,
}

impl fmt::Display for SolverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HungarianAdjust => write!(f, "Hungarian adjust loop"),
            Self::ModiPivot => write!(f, "MODI pivot loop"),
        }
    }
}

/// Fatal solver error.
///
/// Recoverable irregularities (fully restricted rows, extraction gaps,
/// basis completion) are reported as [`crate::models::SolveWarning`]
/// on the solution instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Input rejected before any computation.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// An iterative loop hit its cap.
    #[error("{phase} did not converge after {iterations} iterations ({detail})")]
    NonConvergence {
        phase: SolverPhase,
        iterations: usize,
        detail: String,
    },

    /// No alternating loop through the entering cell exists in the
    /// current (degenerate) basis.
    #[error(
        "no closed loop through entering cell ({row}, {col}); basis has {basic_cells} cells"
    )]
    DegenerateLoopSearch {
        row: usize,
        col: usize,
        basic_cells: usize,
    },
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (+{} more)", first.message, rest.len()),
    }
}

/// Result alias used across the crate.
pub type SolveResult<T> = Result<T, SolveError>;
