//! Transportation problem: balance → VAM → MODI.
//!
//! # Algorithm
//!
//! 1. [`balance`] adds a zero-cost dummy source or destination when
//!    supply and demand totals differ.
//! 2. [`VogelAllocator`] builds a basic feasible starting allocation.
//! 3. [`ModiOptimizer`] pivots it to optimality.
//! 4. The dummy line is stripped from both allocations.
//!
//! Costs are evaluated on the caller's matrix; dummy cells cost zero,
//! so stripping never changes a total.

mod balance;
mod modi;
mod vam;

pub use balance::balance;
pub use modi::{ModiOptimizer, ModiOutcome};
pub use vam::{VamOutcome, VogelAllocator};

use tracing::info;

use crate::config::SolverConfig;
use crate::error::{SolveError, SolveResult};
use crate::models::{TransportationProblem, TransportationSolution};
use crate::validation::validate_transportation;

/// Transportation solver.
///
/// # Example
/// ```
/// use u_allocation::models::TransportationProblem;
/// use u_allocation::transportation::TransportationSolver;
///
/// let problem = TransportationProblem::new(
///     vec![7.0, 9.0, 18.0],
///     vec![5.0, 8.0, 7.0, 14.0],
///     vec![
///         vec![19, 30, 50, 10],
///         vec![70, 30, 40, 60],
///         vec![40, 8, 70, 20],
///     ],
/// );
/// let solution = TransportationSolver::new().solve(&problem).unwrap();
/// assert_eq!(solution.initial_cost, 779.0);
/// assert_eq!(solution.total_cost, 743.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransportationSolver {
    config: SolverConfig,
}

impl TransportationSolver {
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

    /// Solves a (possibly unbalanced) transportation problem.
    ///
    /// # Errors
    /// - [`SolveError::InvalidInput`] for malformed costs, mismatched
    ///   lengths, or negative quantities.
    /// - [`SolveError::NonConvergence`] /
    ///   [`SolveError::DegenerateLoopSearch`] from MODI.
    pub fn solve(&self, problem: &TransportationProblem) -> SolveResult<TransportationSolution> {
        validate_transportation(problem).map_err(SolveError::InvalidInput)?;

        let eps = self.config.epsilon;
        let (balanced, dummy) = balance(problem, eps);
        if let Some(dummy) = &dummy {
            info!(?dummy, "unbalanced problem, dummy line added");
        }

        let vam = VogelAllocator::new()
            .with_epsilon(eps)
            .with_record_steps(self.config.record_steps)
            .allocate(&balanced.supply, &balanced.demand, &balanced.costs);
        let modi = ModiOptimizer::with_config(self.config.clone())
            .optimize(&balanced.costs, &vam.allocation)?;

        let allocation = modi.allocation.without_dummy(dummy.as_ref());
        let initial_allocation = vam.allocation.without_dummy(dummy.as_ref());
        let total_cost = allocation.cost(&problem.costs);
        let initial_cost = initial_allocation.cost(&problem.costs);

        info!(
            sources = problem.sources(),
            destinations = problem.destinations(),
            initial_cost,
            total_cost,
            iterations = modi.iterations,
            "transportation solved"
        );

        Ok(TransportationSolution {
            allocation,
            total_cost,
            initial_allocation,
            initial_cost,
            dummy,
            iterations: modi.iterations,
            warnings: modi.warnings,
            vam_steps: vam.steps,
            modi_steps: modi.steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DegeneracyStrategy;
    use crate::models::DummyLine;

    const EPS: f64 = 1e-9;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-6, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_balanced_problem() {
        let problem = TransportationProblem::new(
            vec![100.0, 125.0, 175.0],
            vec![60.0, 80.0, 85.0, 105.0, 70.0],
            vec![
                vec![20, 18, 18, 21, 19],
                vec![21, 22, 23, 20, 24],
                vec![18, 19, 21, 18, 19],
            ],
        );
        let s = TransportationSolver::new().solve(&problem).unwrap();

        assert!(s.dummy.is_none());
        assert_close(&s.allocation.row_sums(), &problem.supply);
        assert_close(&s.allocation.column_sums(), &problem.demand);
        assert_close(&s.initial_allocation.row_sums(), &problem.supply);
        assert!(s.total_cost <= s.initial_cost + EPS);
        // Optimum from an independent min-cost-flow solve.
        assert!((s.total_cost - 7605.0).abs() < EPS);
        assert!(s.improvement() >= 0.0);
    }

    #[test]
    fn test_surplus_supply_strips_dummy_destination() {
        let problem = TransportationProblem::new(
            vec![300.0, 400.0, 500.0],
            vec![250.0, 350.0, 400.0, 150.0],
            vec![vec![3, 1, 7, 4], vec![2, 6, 5, 9], vec![8, 3, 3, 2]],
        );
        let s = TransportationSolver::new().solve(&problem).unwrap();

        assert_eq!(
            s.dummy,
            Some(DummyLine::Destination {
                index: 4,
                quantity: 50.0
            })
        );
        assert_eq!((s.allocation.rows(), s.allocation.cols()), (3, 4));
        assert_close(&s.allocation.column_sums(), &problem.demand);
        let shipped = s.allocation.row_sums();
        assert!(shipped.iter().zip(&problem.supply).all(|(a, b)| a <= &(b + 1e-6)));
        assert!((shipped.iter().sum::<f64>() - 1150.0).abs() < 1e-6);
        assert!((s.total_cost - 2650.0).abs() < EPS);
    }

    #[test]
    fn test_surplus_supply_with_pivots() {
        let problem = TransportationProblem::new(
            vec![50.0, 50.0, 30.0],
            vec![20.0, 30.0, 30.0],
            vec![vec![1, 2, 9], vec![7, 1, 5], vec![8, 6, 4]],
        );
        let s = TransportationSolver::new().solve(&problem).unwrap();

        assert!((s.initial_cost - 210.0).abs() < EPS);
        assert!((s.total_cost - 170.0).abs() < EPS);
        assert_eq!(s.iterations, 2);
        assert_eq!(
            s.allocation.as_rows(),
            &[
                vec![20.0, 0.0, 0.0],
                vec![0.0, 30.0, 0.0],
                vec![0.0, 0.0, 30.0],
            ]
        );
    }

    #[test]
    fn test_unmet_demand_strips_dummy_source() {
        let problem = TransportationProblem::new(
            vec![10.0, 15.0],
            vec![20.0, 20.0],
            vec![vec![4, 6], vec![5, 3]],
        );
        let s = TransportationSolver::new().solve(&problem).unwrap();

        assert_eq!(
            s.dummy,
            Some(DummyLine::Source {
                index: 2,
                quantity: 15.0
            })
        );
        assert_close(&s.allocation.row_sums(), &problem.supply);
        assert_eq!(s.allocation.as_rows(), &[vec![10.0, 0.0], vec![0.0, 15.0]]);
        assert!((s.total_cost - 85.0).abs() < EPS);
        assert!((s.initial_cost - 95.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_problem_warns() {
        let problem = TransportationProblem::new(
            vec![30.0, 20.0, 20.0],
            vec![20.0, 30.0, 20.0],
            vec![vec![3, 1, 1], vec![8, 6, 4], vec![3, 3, 7]],
        );
        let s = TransportationSolver::new().solve(&problem).unwrap();
        assert!((s.total_cost - 170.0).abs() < EPS);
        assert!(matches!(
            s.warnings.as_slice(),
            [crate::models::SolveWarning::BasisCompleted { .. }]
        ));

        let config = SolverConfig::new().with_degeneracy(DegeneracyStrategy::Fail);
        let err = TransportationSolver::with_config(config)
            .solve(&problem)
            .unwrap_err();
        assert!(matches!(err, SolveError::DegenerateLoopSearch { .. }));
    }

    #[test]
    fn test_steps_recorded() {
        let problem = TransportationProblem::new(
            vec![7.0, 9.0, 18.0],
            vec![5.0, 8.0, 7.0, 14.0],
            vec![
                vec![19, 30, 50, 10],
                vec![70, 30, 40, 60],
                vec![40, 8, 70, 20],
            ],
        );
        let config = SolverConfig::new().with_record_steps(true);
        let s = TransportationSolver::with_config(config)
            .solve(&problem)
            .unwrap();

        assert!(!s.vam_steps.is_empty());
        assert_eq!(s.modi_steps.len(), s.iterations);
        assert!((s.modi_steps[0].cost - s.total_cost).abs() < EPS);
    }

    #[test]
    fn test_invalid_input() {
        let problem = TransportationProblem::new(
            vec![10.0, -5.0],
            vec![5.0],
            vec![vec![1, 2], vec![3, 4]],
        );
        let err = TransportationSolver::new().solve(&problem).unwrap_err();
        match err {
            SolveError::InvalidInput(errors) => assert!(errors.len() >= 2),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
