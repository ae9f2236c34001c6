//! Supply/demand balancing.
//!
//! A transportation problem whose totals differ gets one zero-cost
//! synthetic line: a dummy destination absorbing surplus supply, or a
//! dummy source covering unmet demand. The dummy is always appended
//! after the real lines, so real indices are unchanged.

use crate::models::{DummyLine, TransportationProblem};

/// Returns a balanced copy of `problem` and the dummy line added, if any.
///
/// Totals that differ by at most `epsilon` count as balanced; such a
/// problem is returned unchanged with `None`.
pub fn balance(
    problem: &TransportationProblem,
    epsilon: f64,
) -> (TransportationProblem, Option<DummyLine>) {
    let surplus = problem.total_supply() - problem.total_demand();
    if surplus.abs() <= epsilon {
        return (problem.clone(), None);
    }

    let (m, n) = (problem.sources(), problem.destinations());
    let mut supply = problem.supply.clone();
    let mut demand = problem.demand.clone();

    let (costs, dummy) = if surplus > 0.0 {
        demand.push(surplus);
        (
            problem.costs.padded(m, n + 1),
            DummyLine::Destination {
                index: n,
                quantity: surplus,
            },
        )
    } else {
        supply.push(-surplus);
        (
            problem.costs.padded(m + 1, n),
            DummyLine::Source {
                index: m,
                quantity: -surplus,
            },
        )
    };

    (TransportationProblem::new(supply, demand, costs), Some(dummy))
}
