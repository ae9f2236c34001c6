//! Input validation for allocation problems.
//!
//! Checks structural integrity of cost matrices, restriction masks and
//! supply/demand vectors before solving. Detects:
//! - Empty matrices
//! - Ragged matrices (rows of differing length)
//! - Non-finite costs or quantities (NaN, ±∞)
//! - Restriction masks whose shape differs from the cost matrix
//! - Supply/demand vectors that do not match the matrix dimensions
//! - Negative supply or demand
//!
//! Every check runs; the caller receives all detected issues at once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{AssignmentProblem, CostMatrix, RestrictionMask, TransportationProblem};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Matrix has no rows or no columns.
    EmptyMatrix,
    /// A row's length differs from the first row's.
    RaggedMatrix,
    /// A cost or quantity is NaN or infinite.
    NonFiniteValue,
    /// Restriction mask shape differs from the cost matrix.
    MaskShapeMismatch,
    /// Supply length differs from the number of cost rows.
    SupplyLengthMismatch,
    /// Demand length differs from the number of cost columns.
    DemandLengthMismatch,
    /// Supply or demand is below zero.
    NegativeQuantity,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates a cost matrix: non-empty, rectangular, finite.
pub fn validate_matrix(costs: &CostMatrix) -> ValidationResult {
    let mut errors = Vec::new();
    check_matrix(costs, &mut errors);
    finish(errors)
}

/// Validates an assignment problem.
///
/// Checks:
/// 1. The cost matrix is non-empty, rectangular and finite
/// 2. The restriction mask, if present, has the cost matrix's shape
pub fn validate_assignment(problem: &AssignmentProblem) -> ValidationResult {
    let mut errors = Vec::new();
    check_matrix(&problem.costs, &mut errors);

    if let Some(mask) = &problem.restrictions {
        check_mask(mask, &problem.costs, &mut errors);
    }

    finish(errors)
}

/// Validates a transportation problem.
///
/// Checks:
/// 1. The cost matrix is non-empty, rectangular and finite
/// 2. `supply.len()` equals the number of cost rows
/// 3. `demand.len()` equals the number of cost columns
/// 4. All quantities are finite and nonnegative
pub fn validate_transportation(problem: &TransportationProblem) -> ValidationResult {
    let mut errors = Vec::new();
    check_matrix(&problem.costs, &mut errors);

    if problem.supply.len() != problem.costs.rows() {
        errors.push(ValidationError::new(
            ValidationErrorKind::SupplyLengthMismatch,
            format!(
                "Supply has {} entries but cost matrix has {} rows",
                problem.supply.len(),
                problem.costs.rows()
            ),
        ));
    }

    if problem.demand.len() != problem.costs.cols() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DemandLengthMismatch,
            format!(
                "Demand has {} entries but cost matrix has {} columns",
                problem.demand.len(),
                problem.costs.cols()
            ),
        ));
    }

    check_quantities("supply", &problem.supply, &mut errors);
    check_quantities("demand", &problem.demand, &mut errors);

    finish(errors)
}

fn check_matrix(costs: &CostMatrix, errors: &mut Vec<ValidationError>) {
    if costs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyMatrix,
            format!(
                "Cost matrix is empty ({} x {})",
                costs.rows(),
                costs.cols()
            ),
        ));
        return;
    }

    let width = costs.cols();
    for (r, row) in costs.as_rows().iter().enumerate() {
        if row.len() != width {
            errors.push(ValidationError::new(
                ValidationErrorKind::RaggedMatrix,
                format!("Row {r} has {} columns, expected {width}", row.len()),
            ));
        }
        for (c, v) in row.iter().enumerate() {
            if !v.is_finite() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonFiniteValue,
                    format!("Cost at ({r}, {c}) is not finite: {v}"),
                ));
            }
        }
    }
}

fn check_mask(mask: &RestrictionMask, costs: &CostMatrix, errors: &mut Vec<ValidationError>) {
    let rows_match = mask.rows() == costs.rows();
    let cols_match = mask.as_rows().iter().all(|r| r.len() == costs.cols());
    if !rows_match || !cols_match {
        errors.push(ValidationError::new(
            ValidationErrorKind::MaskShapeMismatch,
            format!(
                "Restriction mask is {} x {} but cost matrix is {} x {}",
                mask.rows(),
                mask.cols(),
                costs.rows(),
                costs.cols()
            ),
        ));
    }
}

fn check_quantities(name: &str, values: &[f64], errors: &mut Vec<ValidationError>) {
    for (i, &q) in values.iter().enumerate() {
        if !q.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFiniteValue,
                format!("{name}[{i}] is not finite: {q}"),
            ));
        } else if q < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeQuantity,
                format!("{name}[{i}] is negative: {q}"),
            ));
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transportation() -> TransportationProblem {
        TransportationProblem::new(
            vec![100.0, 125.0, 175.0],
            vec![60.0, 80.0, 85.0, 105.0, 70.0],
            vec![
                vec![20, 18, 18, 21, 19],
                vec![21, 22, 23, 20, 24],
                vec![18, 19, 21, 18, 19],
            ],
        )
    }

    #[test]
    fn test_valid_matrix() {
        let m = CostMatrix::from(vec![vec![1, 2], vec![3, 4]]);
        assert!(validate_matrix(&m).is_ok());
    }

    #[test]
    fn test_empty_matrix() {
        let errors = validate_matrix(&CostMatrix::default()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyMatrix);

        let errors = validate_matrix(&CostMatrix::new(vec![vec![]])).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyMatrix);
    }

    #[test]
    fn test_ragged_matrix() {
        let m = CostMatrix::new(vec![vec![1.0, 2.0], vec![3.0]]);
        let errors = validate_matrix(&m).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::RaggedMatrix && e.message.contains("Row 1")));
    }

    #[test]
    fn test_non_finite_cost() {
        let m = CostMatrix::new(vec![vec![1.0, f64::NAN], vec![f64::INFINITY, 4.0]]);
        let errors = validate_matrix(&m).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::NonFiniteValue)
                .count(),
            2
        );
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let problem = AssignmentProblem::new(vec![vec![1, 2], vec![3, 4]])
            .with_restrictions(vec![vec![false, false, true], vec![false, false, false]]);
        let errors = validate_assignment(&problem).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::MaskShapeMismatch);
    }

    #[test]
    fn test_mask_matching_shape() {
        let problem = AssignmentProblem::new(vec![vec![1, 2], vec![3, 4]])
            .with_restrictions(RestrictionMask::none(2, 2).with_restricted(1, 1));
        assert!(validate_assignment(&problem).is_ok());
    }

    #[test]
    fn test_valid_transportation() {
        assert!(validate_transportation(&sample_transportation()).is_ok());
    }

    #[test]
    fn test_supply_length_mismatch() {
        let mut problem = sample_transportation();
        problem.supply.push(10.0);
        let errors = validate_transportation(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::SupplyLengthMismatch));
    }

    #[test]
    fn test_demand_length_mismatch() {
        let mut problem = sample_transportation();
        problem.demand.pop();
        let errors = validate_transportation(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DemandLengthMismatch));
    }

    #[test]
    fn test_negative_quantity() {
        let mut problem = sample_transportation();
        problem.demand[0] = -5.0;
        let errors = validate_transportation(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NegativeQuantity));
    }

    #[test]
    fn test_multiple_errors() {
        // Empty costs + mismatched vectors + NaN supply
        let problem = TransportationProblem::new(vec![f64::NAN], vec![1.0], CostMatrix::default());
        let errors = validate_transportation(&problem).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
