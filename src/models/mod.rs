//! Allocation domain models.
//!
//! Value types shared by both solver families. Every phase of a solve
//! returns fresh values instead of mutating its input.
//!
//! # Domain Mappings
//!
//! | u-allocation | Staffing | Logistics | Manufacturing |
//! |--------------|----------|-----------|---------------|
//! | Row | Worker | Warehouse | Machine |
//! | Column | Job | Store | Order |
//! | Cost | Hours | Freight rate | Setup cost |
//! | Restriction | Missing skill | Closed route | Incompatible tool |

mod cover;
mod matrix;
mod problem;
mod solution;
mod trace;

pub use cover::LineCover;
pub use matrix::{CostMatrix, RestrictionMask};
pub use problem::{AssignmentProblem, DummyLine, ProblemType, TransportationProblem};
pub use solution::{
    Allocation, Assignment, AssignmentSolution, SolveWarning, TransportationSolution,
};
pub use trace::{HungarianStep, ModiStep, PenaltyLine, VamStep};
