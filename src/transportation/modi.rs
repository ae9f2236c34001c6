//! Modified distribution method (MODI, u-v method).
//!
//! Improves a basic feasible allocation to optimality.
//!
//! # Algorithm
//! 1. Potentials: `u[i] + v[j] = c[i][j]` on every basic cell, `u[0] = 0`.
//! 2. Opportunity cost of each non-basic cell: `c[i][j] - u[i] - v[j]`.
//! 3. All non-negative → optimal. Otherwise the most negative cell
//!    (lowest row-major index on ties) enters the basis.
//! 4. The basic cells form a spanning tree over rows and columns, so the
//!    entering cell closes exactly one loop. Cells alternate `+`/`-`
//!    around it, starting with `+` at the entering cell.
//! 5. `θ` = smallest quantity on a `-` cell. `θ` moves around the loop
//!    and one `-` cell at `θ` leaves the basis.
//!
//! # Degeneracy
//! A basic feasible solution needs `m + n - 1` basic cells. With fewer
//! positive cells, [`DegeneracyStrategy::CompleteBasis`] adds zero
//! cells (cheapest first, never closing a loop) until the basis spans
//! every row and column, and allows `θ = 0` pivots.
//! [`DegeneracyStrategy::Fail`] treats positive cells as the basis and
//! reports [`SolveError::DegenerateLoopSearch`] when it does not span.
//!
//! # Complexity
//! O(m·n) per pivot for potentials, opportunity costs and loop search.
//!
//! # Reference
//! Charnes & Cooper (1954), "The Stepping Stone Method of Explaining
//! Linear Programming Calculations in Transportation Problems"

use tracing::{debug, trace, warn};

use crate::config::{DegeneracyStrategy, SolverConfig};
use crate::error::{SolveError, SolveResult, SolverPhase};
use crate::models::{Allocation, CostMatrix, ModiStep, SolveWarning};

/// Result of a MODI run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModiOutcome {
    /// Optimal allocation.
    pub allocation: Allocation,
    /// `Σ allocation[i][j] * costs[i][j]`.
    pub total_cost: f64,
    /// Number of pivots.
    pub iterations: usize,
    /// Basis completion, if any.
    pub warnings: Vec<SolveWarning>,
    /// Pivots (empty unless step recording is enabled).
    pub steps: Vec<ModiStep>,
}

/// MODI optimizer.
#[derive(Debug, Clone, Default)]
pub struct ModiOptimizer {
    config: SolverConfig,
}

impl ModiOptimizer {
    /// Creates an optimizer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an optimizer with the given configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Improves `initial` to an optimal allocation over `costs`.
    ///
    /// `initial` should be a basic feasible solution of a balanced
    /// problem, such as the output of
    /// [`VogelAllocator`](super::VogelAllocator). Row and column sums
    /// are preserved by every pivot.
    ///
    /// # Errors
    /// - [`SolveError::NonConvergence`] if the pivot cap is hit.
    /// - [`SolveError::DegenerateLoopSearch`] if the basis cannot
    ///   determine the potentials or the loop.
    pub fn optimize(&self, costs: &CostMatrix, initial: &Allocation) -> SolveResult<ModiOutcome> {
        let eps = self.config.epsilon;
        let (m, n) = (initial.rows(), initial.cols());
        let mut allocation = initial.clone();
        let mut basis = Basis::from_allocation(&allocation, eps);
        let mut warnings = Vec::new();
        let mut steps = Vec::new();

        if self.config.degeneracy == DegeneracyStrategy::CompleteBasis {
            let added = basis.complete(costs);
            if !added.is_empty() {
                warn!(cells = ?added, "degenerate basis completed with zero cells");
                warnings.push(SolveWarning::BasisCompleted { cells: added });
            }
        }

        let cap = self.config.pivot_cap(m, n);
        let mut iterations = 0;
        loop {
            if self.config.degeneracy == DegeneracyStrategy::Fail {
                basis = Basis::from_allocation(&allocation, eps);
            }

            let Some((u, v)) = basis.potentials(costs) else {
                let (row, col) = basis.first_undetermined(costs);
                return Err(SolveError::DegenerateLoopSearch {
                    row,
                    col,
                    basic_cells: basis.len(),
                });
            };

            let Some((entering, delta)) = entering_cell(costs, &basis, &u, &v, eps) else {
                break;
            };
            if iterations >= cap {
                return Err(SolveError::NonConvergence {
                    phase: SolverPhase::ModiPivot,
                    iterations,
                    detail: format!(
                        "cell ({}, {}) still has opportunity cost {delta}",
                        entering.0, entering.1
                    ),
                });
            }

            let Some(cycle) = basis.find_loop(entering) else {
                return Err(SolveError::DegenerateLoopSearch {
                    row: entering.0,
                    col: entering.1,
                    basic_cells: basis.len(),
                });
            };

            let (theta, leaving) = pivot(&mut allocation, &cycle, eps);
            basis.set(entering, true);
            basis.set(leaving, false);
            iterations += 1;

            let cost = allocation.cost(costs);
            debug!(
                iteration = iterations,
                ?entering,
                delta,
                theta,
                ?leaving,
                cost,
                "modi pivot"
            );
            trace!(allocation = ?allocation, "after pivot");
            if self.config.record_steps {
                steps.push(ModiStep {
                    u,
                    v,
                    entering,
                    delta,
                    cycle,
                    theta,
                    allocation: allocation.clone(),
                    cost,
                });
            }
        }

        let total_cost = allocation.cost(costs);
        Ok(ModiOutcome {
            allocation,
            total_cost,
            iterations,
            warnings,
            steps,
        })
    }
}

/// Basic cells of the current solution.
#[derive(Debug, Clone)]
struct Basis {
    cells: Vec<Vec<bool>>,
    rows: usize,
    cols: usize,
}

impl Basis {
    fn from_allocation(allocation: &Allocation, epsilon: f64) -> Self {
        let (rows, cols) = (allocation.rows(), allocation.cols());
        let mut cells = vec![vec![false; cols]; rows];
        for (r, c) in allocation.basic_cells(epsilon) {
            cells[r][c] = true;
        }
        Self { cells, rows, cols }
    }

    fn contains(&self, (r, c): (usize, usize)) -> bool {
        self.cells[r][c]
    }

    fn set(&mut self, (r, c): (usize, usize), basic: bool) {
        self.cells[r][c] = basic;
    }

    fn len(&self) -> usize {
        self.cells.iter().flatten().filter(|&&b| b).count()
    }

    /// Adds the cheapest non-basic cells that join two components until
    /// the basis spans all rows and columns. Returns the added cells.
    fn complete(&mut self, costs: &CostMatrix) -> Vec<(usize, usize)> {
        // Nodes: rows 0..m, columns m..m+n.
        let mut components = UnionFind::new(self.rows + self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.cells[r][c] {
                    components.union(r, self.rows + c);
                }
            }
        }

        let mut candidates: Vec<(usize, usize)> = (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .filter(|&cell| !self.contains(cell))
            .collect();
        candidates.sort_by(|&a, &b| {
            costs
                .get(a.0, a.1)
                .total_cmp(&costs.get(b.0, b.1))
                .then(a.cmp(&b))
        });

        let mut added = Vec::new();
        for (r, c) in candidates {
            if components.count() == 1 {
                break;
            }
            if components.union(r, self.rows + c) {
                self.cells[r][c] = true;
                added.push((r, c));
            }
        }
        added
    }

    /// Solves `u[i] + v[j] = c[i][j]` over the basis from `u[0] = 0`.
    ///
    /// Returns `None` if the basis leaves some potential undetermined.
    fn potentials(&self, costs: &CostMatrix) -> Option<(Vec<f64>, Vec<f64>)> {
        let (u, v) = self.propagate(costs);
        let u = u.into_iter().collect::<Option<Vec<f64>>>()?;
        let v = v.into_iter().collect::<Option<Vec<f64>>>()?;
        Some((u, v))
    }

    fn propagate(&self, costs: &CostMatrix) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        let mut u = vec![None; self.rows];
        let mut v = vec![None; self.cols];
        if self.rows == 0 {
            return (u, v);
        }
        u[0] = Some(0.0);

        let mut stack = vec![Node::Row(0)];
        while let Some(node) = stack.pop() {
            match node {
                Node::Row(r) => {
                    let Some(ur) = u[r] else { continue };
                    for c in 0..self.cols {
                        if self.cells[r][c] && v[c].is_none() {
                            v[c] = Some(costs.get(r, c) - ur);
                            stack.push(Node::Col(c));
                        }
                    }
                }
                Node::Col(c) => {
                    let Some(vc) = v[c] else { continue };
                    for r in 0..self.rows {
                        if self.cells[r][c] && u[r].is_none() {
                            u[r] = Some(costs.get(r, c) - vc);
                            stack.push(Node::Row(r));
                        }
                    }
                }
            }
        }
        (u, v)
    }

    /// First non-basic cell (row-major) lacking a potential.
    fn first_undetermined(&self, costs: &CostMatrix) -> (usize, usize) {
        let (u, v) = self.propagate(costs);
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .find(|&(r, c)| !self.cells[r][c] && (u[r].is_none() || v[c].is_none()))
            .unwrap_or((0, 0))
    }

    /// Closed loop through `entering`, alternating horizontal and
    /// vertical moves over basic cells.
    ///
    /// Depth-first search from the entering column back to the entering
    /// row. Returns the loop starting at `entering`; odd positions are
    /// the `-` cells.
    fn find_loop(&self, entering: (usize, usize)) -> Option<Vec<(usize, usize)>> {
        let (row, col) = entering;
        let target = Node::Row(row);
        let mut parent_row: Vec<Option<Node>> = vec![None; self.rows];
        let mut parent_col: Vec<Option<Node>> = vec![None; self.cols];
        let mut seen_row = vec![false; self.rows];
        let mut seen_col = vec![false; self.cols];

        seen_col[col] = true;
        let mut stack = vec![Node::Col(col)];
        let mut found = false;
        while let Some(node) = stack.pop() {
            if node == target {
                found = true;
                break;
            }
            match node {
                // Vertical move along the column.
                Node::Col(c) => {
                    for r in 0..self.rows {
                        if self.cells[r][c] && !seen_row[r] {
                            seen_row[r] = true;
                            parent_row[r] = Some(node);
                            stack.push(Node::Row(r));
                        }
                    }
                }
                // Horizontal move along the row.
                Node::Row(r) => {
                    for c in 0..self.cols {
                        if self.cells[r][c] && !seen_col[c] {
                            seen_col[c] = true;
                            parent_col[c] = Some(node);
                            stack.push(Node::Col(c));
                        }
                    }
                }
            }
        }
        if !found {
            return None;
        }

        // Walk back from the entering row to the entering column.
        let mut cycle = vec![entering];
        let mut node = target;
        let mut path = Vec::new();
        while let Some(prev) = match node {
            Node::Row(r) => parent_row[r],
            Node::Col(c) => parent_col[c],
        } {
            path.push(match (node, prev) {
                (Node::Row(r), Node::Col(c)) | (Node::Col(c), Node::Row(r)) => (r, c),
                _ => return None,
            });
            node = prev;
        }
        path.reverse();
        cycle.extend(path);
        Some(cycle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Row(usize),
    Col(usize),
}

/// Disjoint sets over row and column nodes.
struct UnionFind {
    parent: Vec<usize>,
    count: usize,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            count: size,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Joins the sets of `a` and `b`. Returns `false` if already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        self.count -= 1;
        true
    }

    fn count(&self) -> usize {
        self.count
    }
}

/// Most negative opportunity cost below `-epsilon`, lowest row-major
/// index on ties.
fn entering_cell(
    costs: &CostMatrix,
    basis: &Basis,
    u: &[f64],
    v: &[f64],
    epsilon: f64,
) -> Option<((usize, usize), f64)> {
    let mut best: Option<((usize, usize), f64)> = None;
    for (r, ur) in u.iter().enumerate() {
        for (c, vc) in v.iter().enumerate() {
            if basis.contains((r, c)) {
                continue;
            }
            let delta = costs.get(r, c) - ur - vc;
            if delta >= -epsilon {
                continue;
            }
            if best.map_or(true, |(_, b)| delta < b) {
                best = Some(((r, c), delta));
            }
        }
    }
    best
}

/// Moves `θ` around `cycle`. Returns `θ` and the leaving cell: the
/// first `-` cell in loop order holding the minimum.
fn pivot(
    allocation: &mut Allocation,
    cycle: &[(usize, usize)],
    epsilon: f64,
) -> (f64, (usize, usize)) {
    let mut leaving = cycle[1];
    let mut theta = allocation.get(leaving.0, leaving.1);
    for &(r, c) in cycle.iter().skip(3).step_by(2) {
        let q = allocation.get(r, c);
        if q < theta {
            theta = q;
            leaving = (r, c);
        }
    }

    for (k, &(r, c)) in cycle.iter().enumerate() {
        if k % 2 == 0 {
            allocation.add(r, c, theta);
        } else {
            allocation.add(r, c, -theta);
            if allocation.get(r, c).abs() <= epsilon {
                allocation.set(r, c, 0.0);
            }
        }
    }
    (theta, leaving)
}
